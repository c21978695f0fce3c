//! Composite identifier codec.
//!
//! Edge ids produced by the path-trace service overload a single string with
//! topology, device identity and decision-trace correlation:
//!
//! ```text
//! EDGE_ID      := SOURCE ["--" DEST] ["--" PATH_SUFFIX]
//! SOURCE, DEST := DEVICE_TOKEN ["@" INTERFACE]
//! DEVICE_TOKEN := deviceId "!" hostname | deviceId
//! ```
//!
//! A component in `DEST` position that is a reserved marker (`dropped`,
//! `accepted`, `transit`) or starts with `#` opens the suffix instead.
//!
//! This module is the only place that splits raw identifiers. Everything else
//! works with [`DecodedEdge`], [`Endpoint`] and [`DeviceToken`].

use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Separator between source, destination and suffix components.
pub const COMPONENT_SEPARATOR: &str = "--";

/// Separator between a device token and its interface.
pub const INTERFACE_SEPARATOR: char = '@';

/// Separator between a device id and its resolved hostname.
pub const HOSTNAME_SEPARATOR: char = '!';

/// Prefix of path-disambiguation suffixes (`#0`, `#1`, ...).
const PATH_INDEX_PREFIX: char = '#';

/// Pattern of virtual device ids emitted by the path-trace service.
const VDEVICE_PATTERN: &str = r"vDevice/\d+";

/// Composite edge identifier, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Wrap a raw edge id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the id. Never fails; see [`decode_edge_id`].
    pub fn decode(&self) -> DecodedEdge {
        decode_edge_id(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EdgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reserved markers that may follow a source endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Packet dropped at this point.
    Dropped,
    /// Packet accepted (delivered) at this point.
    Accepted,
    /// Edge crosses between network segments.
    Transit,
}

impl Marker {
    /// Parse a single `--`-separated component.
    pub fn from_component(component: &str) -> Option<Self> {
        match component {
            "dropped" => Some(Self::Dropped),
            "accepted" => Some(Self::Accepted),
            c if is_transit_component(c) => Some(Self::Transit),
            _ => None,
        }
    }

    /// Whether the marker ends the trace.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dropped | Self::Accepted)
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dropped => "dropped",
            Self::Accepted => "accepted",
            Self::Transit => "transit",
        }
    }
}

/// `transit` alone or followed by a qualifier such as `transit:vrf1`.
/// Hostnames like `transit-gw` are devices, not markers.
fn is_transit_component(component: &str) -> bool {
    match component.strip_prefix("transit") {
        Some(rest) => rest
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '!' | '/'))),
        None => false,
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device token, `deviceId!hostname` or an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceToken {
    raw: String,
    device_id: Option<String>,
    hostname: Option<String>,
}

impl DeviceToken {
    /// The token exactly as it appeared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Embedded device id, if the token is resolved.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Embedded hostname, if the token is resolved.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Whether a hostname is embedded.
    pub fn is_resolved(&self) -> bool {
        self.hostname.is_some()
    }

    /// Hostname when present, otherwise the raw token.
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.raw)
    }

    /// Identity of the device regardless of resolution.
    ///
    /// An unresolved token is the bare device id.
    pub fn device_key(&self) -> &str {
        self.device_id.as_deref().unwrap_or(&self.raw)
    }

    /// A resolved copy carrying `hostname`.
    pub fn with_hostname(&self, hostname: &str) -> Self {
        let device_id = self.device_key().to_string();
        Self {
            raw: format!("{device_id}{HOSTNAME_SEPARATOR}{hostname}"),
            device_id: Some(device_id),
            hostname: Some(hostname.to_string()),
        }
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Device token plus optional interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Device part.
    pub token: DeviceToken,
    /// Interface name, if any.
    pub interface: Option<String>,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.interface {
            Some(iface) => write!(f, "{}{}{}", self.token, INTERFACE_SEPARATOR, iface),
            None => write!(f, "{}", self.token),
        }
    }
}

/// Structured view of an [`EdgeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedEdge {
    /// Device/interface the packet leaves.
    pub source: Endpoint,
    /// Device/interface the packet enters.
    pub destination: Option<Endpoint>,
    /// Everything after the endpoints, joined with `--`.
    pub suffix: Option<String>,
}

impl DecodedEdge {
    /// Source then destination.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        std::iter::once(&self.source).chain(self.destination.iter())
    }

    /// First reserved marker in the suffix.
    pub fn marker(&self) -> Option<Marker> {
        self.suffix
            .as_deref()?
            .split(COMPONENT_SEPARATOR)
            .find_map(Marker::from_component)
    }

    /// Terminal marker (`dropped`/`accepted`), if the edge ends the trace.
    pub fn outcome(&self) -> Option<Marker> {
        self.marker().filter(Marker::is_terminal)
    }

    /// Whether the edge is a transit edge.
    pub fn is_transit(&self) -> bool {
        self.marker() == Some(Marker::Transit)
    }

    /// Splice `hostname` into every unresolved endpoint naming `device_id`.
    pub fn with_hostname(&self, device_id: &str, hostname: &str) -> Self {
        let splice = |endpoint: &Endpoint| {
            if !endpoint.token.is_resolved() && endpoint.token.raw() == device_id {
                Endpoint {
                    token: endpoint.token.with_hostname(hostname),
                    interface: endpoint.interface.clone(),
                }
            } else {
                endpoint.clone()
            }
        };
        Self {
            source: splice(&self.source),
            destination: self.destination.as_ref().map(splice),
            suffix: self.suffix.clone(),
        }
    }

    /// Re-encode. Exact inverse of [`decode_edge_id`].
    pub fn encode(&self) -> EdgeId {
        EdgeId(self.to_string())
    }
}

impl fmt::Display for DecodedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(destination) = &self.destination {
            write!(f, "{COMPONENT_SEPARATOR}{destination}")?;
        }
        if let Some(suffix) = &self.suffix {
            write!(f, "{COMPONENT_SEPARATOR}{suffix}")?;
        }
        Ok(())
    }
}

/// Decode a device token.
///
/// `"D1!host1"` gives `(Some("D1"), Some("host1"))`; a token without `!` is
/// opaque and gives `(None, None)`.
pub fn decode_token(token: &str) -> DeviceToken {
    let (device_id, hostname) = match token.split_once(HOSTNAME_SEPARATOR) {
        Some((id, host)) => (Some(id.to_string()), Some(host.to_string())),
        None => (None, None),
    };
    DeviceToken {
        raw: token.to_string(),
        device_id,
        hostname,
    }
}

fn decode_endpoint(component: &str) -> Endpoint {
    match component.split_once(INTERFACE_SEPARATOR) {
        Some((token, iface)) => Endpoint {
            token: decode_token(token),
            interface: Some(iface.to_string()),
        },
        None => Endpoint {
            token: decode_token(component),
            interface: None,
        },
    }
}

fn is_destination(component: &str) -> bool {
    !component.is_empty()
        && !component.starts_with(PATH_INDEX_PREFIX)
        && Marker::from_component(component).is_none()
}

/// Decode an edge id. Missing parts are `None`; malformed input degrades to
/// opaque tokens.
pub fn decode_edge_id(id: &str) -> DecodedEdge {
    let mut components = id.split(COMPONENT_SEPARATOR);
    let source = decode_endpoint(components.next().unwrap_or_default());
    let rest: Vec<&str> = components.collect();

    let (destination, remaining) = match rest.split_first() {
        Some((first, tail)) if is_destination(first) => (Some(decode_endpoint(first)), tail),
        _ => (None, rest.as_slice()),
    };

    let suffix = if remaining.is_empty() {
        None
    } else {
        Some(remaining.join(COMPONENT_SEPARATOR))
    };

    DecodedEdge {
        source,
        destination,
        suffix,
    }
}

/// Recover a `vDevice/<n>` id embedded in an otherwise opaque string.
pub fn device_id_hint(text: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(VDEVICE_PATTERN).expect("valid vDevice pattern"));
    pattern.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_resolved_token() {
        let token = decode_token("D1!host1");
        assert_eq!(token.device_id(), Some("D1"));
        assert_eq!(token.hostname(), Some("host1"));
        assert_eq!(token.display_name(), "host1");
    }

    #[test]
    fn test_decode_plain_token_is_opaque() {
        let token = decode_token("host1");
        assert_eq!(token.device_id(), None);
        assert_eq!(token.hostname(), None);
        assert_eq!(token.display_name(), "host1");
        assert_eq!(token.device_key(), "host1");
    }

    #[test]
    fn test_decode_full_edge() {
        let edge = decode_edge_id("D1!r1@eth0--D2!r2@eth1--#0");
        assert_eq!(edge.source.token.hostname(), Some("r1"));
        assert_eq!(edge.source.interface.as_deref(), Some("eth0"));
        let dest = edge.destination.as_ref().unwrap();
        assert_eq!(dest.token.device_id(), Some("D2"));
        assert_eq!(dest.interface.as_deref(), Some("eth1"));
        assert_eq!(edge.suffix.as_deref(), Some("#0"));
        assert_eq!(edge.marker(), None);
    }

    #[test]
    fn test_decode_terminal_edge() {
        let edge = decode_edge_id("vDevice/913624679@ge-0/0/4.200--dropped--#0");
        assert!(edge.destination.is_none());
        assert_eq!(edge.source.interface.as_deref(), Some("ge-0/0/4.200"));
        assert_eq!(edge.suffix.as_deref(), Some("dropped--#0"));
        assert_eq!(edge.outcome(), Some(Marker::Dropped));
    }

    #[test]
    fn test_transit_prefixed_hostname_is_a_device() {
        assert_eq!(Marker::from_component("transit"), Some(Marker::Transit));
        assert_eq!(Marker::from_component("transit:vrf1"), Some(Marker::Transit));
        assert_eq!(Marker::from_component("transit-gw@eth0"), None);
        assert_eq!(Marker::from_component("transit_gw"), None);
        assert_eq!(Marker::from_component("transit01"), None);

        let edge = decode_edge_id("D1!r1@eth0--transit-gw@eth1--#0");
        assert!(!edge.is_transit());
        let destination = edge.destination.unwrap();
        assert_eq!(destination.token.display_name(), "transit-gw");
        assert_eq!(destination.interface.as_deref(), Some("eth1"));
    }

    #[test]
    fn test_decode_transit_edge() {
        let edge = decode_edge_id("D9!fw1@port3--transit--#0");
        assert!(edge.is_transit());
        assert_eq!(edge.outcome(), None);
    }

    #[test]
    fn test_decode_bare_source() {
        let edge = decode_edge_id("just-a-host");
        assert_eq!(edge.source.token.raw(), "just-a-host");
        assert!(edge.source.interface.is_none());
        assert!(edge.destination.is_none());
        assert!(edge.suffix.is_none());
    }

    #[test]
    fn test_with_hostname_splices_unresolved_only() {
        let edge = decode_edge_id("D2@eth1--dropped--#0");
        let spliced = edge.with_hostname("D2", "r2");
        assert_eq!(spliced.encode().as_str(), "D2!r2@eth1--dropped--#0");

        let resolved = decode_edge_id("D2!old@eth1--#0");
        assert_eq!(resolved.with_hostname("D2", "r2"), resolved);
    }

    #[test]
    fn test_device_id_hint() {
        assert_eq!(
            device_id_hint("vDevice/913624679@ge-0/0/4.200").as_deref(),
            Some("vDevice/913624679")
        );
        assert_eq!(device_id_hint("edge-router"), None);
    }

    proptest! {
        #[test]
        fn decode_never_panics_and_reencodes(id in "[a-zA-Z0-9!@#/. -]{0,40}") {
            let decoded = decode_edge_id(&id);
            let reencoded = decoded.encode();
            prop_assert_eq!(reencoded.as_str(), id.as_str());
        }
    }
}
