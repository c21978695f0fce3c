//! Path lookup request sent to the path-trace service.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Largest IPv4 fragment offset.
pub const MAX_FRAGMENT_OFFSET: u16 = 8191;

/// Default TTL of a lookup.
pub const DEFAULT_TTL: u8 = 128;

/// Error type for request validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Not an IPv4 address or subnet.
    #[error("Invalid IPv4 address or subnet: {0}")]
    InvalidAddress(String),
    /// Fragment offset above 8191.
    #[error("Fragment offset must be between 0 and 8191, got {0}")]
    FragmentOffset(u16),
    /// Unknown protocol name.
    #[error("Unknown protocol: {0}. Use tcp, udp or icmp")]
    UnknownProtocol(String),
}

/// Transport protocol of the simulated flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    /// TCP.
    Tcp,
    /// UDP.
    Udp,
    /// ICMP, no ports.
    #[default]
    Icmp,
}

impl TransportProtocol {
    /// Parse a protocol name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, RequestError> {
        match name.to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "icmp" => Ok(Self::Icmp),
            _ => Err(RequestError::UnknownProtocol(name.to_string())),
        }
    }

    /// Whether source/destination ports apply.
    pub fn uses_ports(&self) -> bool {
        matches!(self, Self::Tcp | Self::Udp)
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
            Self::Icmp => write!(f, "icmp"),
        }
    }
}

/// Where a lookup enters the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Serial number of the entry device.
    #[serde(rename = "sn")]
    pub serial: String,
    /// Entry interface.
    #[serde(rename = "iface")]
    pub interface: String,
    /// Entry device hostname.
    pub hostname: String,
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.hostname, self.interface)
    }
}

/// How the service picks the first hop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FirstHopAlgorithm {
    /// Let the service locate the source.
    #[default]
    Automatic,
    /// Start from explicit entry points.
    #[serde(rename_all = "camelCase")]
    UserDefined {
        /// Entry points to seed the lookup with.
        entry_points: Vec<EntryPoint>,
    },
}

/// Whether a request is the primary lookup or a pivot lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LookupRole {
    /// The lookup whose path is displayed.
    #[default]
    Primary,
    /// Pivot → source lookup used to find the entry point.
    Pivot,
}

/// Unicast path lookup parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    /// Source address or subnet.
    pub starting_point: String,
    /// Destination address or subnet.
    pub destination_point: String,
    /// Transport protocol.
    pub protocol: TransportProtocol,
    /// Source ports (ranges allowed), `None` for ICMP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ports: Option<String>,
    /// Destination ports (ranges allowed), `None` for ICMP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_ports: Option<String>,
    /// Time to live.
    pub ttl: u8,
    /// Fragment offset.
    pub fragment_offset: u16,
    /// Stop the flow at the first blocking security rule.
    pub secured_path: bool,
    /// First-hop selection.
    #[serde(default)]
    pub first_hop_algorithm: FirstHopAlgorithm,
    /// Primary lookup or pivot lookup.
    #[serde(skip)]
    pub role: LookupRole,
}

impl LookupRequest {
    /// ICMP request with default TTL.
    pub fn new(starting_point: impl Into<String>, destination_point: impl Into<String>) -> Self {
        Self {
            starting_point: starting_point.into(),
            destination_point: destination_point.into(),
            protocol: TransportProtocol::Icmp,
            src_ports: None,
            dst_ports: None,
            ttl: DEFAULT_TTL,
            fragment_offset: 0,
            secured_path: false,
            first_hop_algorithm: FirstHopAlgorithm::Automatic,
            role: LookupRole::Primary,
        }
    }

    /// Set the protocol; ports are dropped for ICMP.
    pub fn with_protocol(
        mut self,
        protocol: TransportProtocol,
        src_ports: impl Into<String>,
        dst_ports: impl Into<String>,
    ) -> Self {
        self.protocol = protocol;
        if protocol.uses_ports() {
            self.src_ports = Some(src_ports.into());
            self.dst_ports = Some(dst_ports.into());
        } else {
            self.src_ports = None;
            self.dst_ports = None;
        }
        self
    }

    /// Seed the lookup with an entry point.
    pub fn with_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.first_hop_algorithm = FirstHopAlgorithm::UserDefined {
            entry_points: vec![entry_point],
        };
        self
    }

    /// The pivot → source lookup for this request.
    ///
    /// Same flow parameters, never secured, automatic first hop.
    pub fn pivot_request(&self, pivot: impl Into<String>) -> Self {
        Self {
            starting_point: pivot.into(),
            destination_point: self.starting_point.clone(),
            secured_path: false,
            first_hop_algorithm: FirstHopAlgorithm::Automatic,
            role: LookupRole::Pivot,
            ..self.clone()
        }
    }

    /// Check addresses and ranges.
    pub fn validate(&self) -> Result<(), RequestError> {
        validate_ipv4_network(&self.starting_point)?;
        validate_ipv4_network(&self.destination_point)?;
        if self.fragment_offset > MAX_FRAGMENT_OFFSET {
            return Err(RequestError::FragmentOffset(self.fragment_offset));
        }
        Ok(())
    }
}

/// Accept `a.b.c.d` or `a.b.c.d/len`.
pub fn validate_ipv4_network(value: &str) -> Result<(), RequestError> {
    let invalid = || RequestError::InvalidAddress(value.to_string());
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };
    addr.parse::<Ipv4Addr>().map_err(|_| invalid())?;
    if let Some(prefix) = prefix {
        match prefix.parse::<u8>() {
            Ok(len) if len <= 32 => {}
            _ => return Err(invalid()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icmp_drops_ports() {
        let request = LookupRequest::new("10.0.0.1", "10.0.1.1")
            .with_protocol(TransportProtocol::Icmp, "1024", "443");
        assert!(request.src_ports.is_none());
        assert!(request.dst_ports.is_none());

        let request = request.with_protocol(TransportProtocol::Tcp, "1024", "443");
        assert_eq!(request.dst_ports.as_deref(), Some("443"));
    }

    #[test]
    fn test_pivot_request_reverses_flow() {
        let request = LookupRequest::new("10.0.0.1", "10.0.1.1");
        let reverse = request.pivot_request("192.168.1.1");
        assert_eq!(reverse.starting_point, "192.168.1.1");
        assert_eq!(reverse.destination_point, "10.0.0.1");
        assert_eq!(reverse.role, LookupRole::Pivot);
        assert!(!reverse.secured_path);
    }

    #[test]
    fn test_validate() {
        assert!(LookupRequest::new("10.0.0.0/24", "10.0.1.1").validate().is_ok());
        assert_eq!(
            LookupRequest::new("10.0.0.300", "10.0.1.1").validate(),
            Err(RequestError::InvalidAddress("10.0.0.300".into()))
        );
        assert!(validate_ipv4_network("10.0.0.0/33").is_err());

        let mut request = LookupRequest::new("10.0.0.1", "10.0.1.1");
        request.fragment_offset = 9000;
        assert_eq!(request.validate(), Err(RequestError::FragmentOffset(9000)));
    }

    #[test]
    fn test_entry_point_serializes_service_shape() {
        let request = LookupRequest::new("10.0.0.1", "10.0.1.1").with_entry_point(EntryPoint {
            serial: "SN1".into(),
            interface: "port1".into(),
            hostname: "fw1".into(),
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstHopAlgorithm"]["type"], "userDefined");
        assert_eq!(json["firstHopAlgorithm"]["entryPoints"][0]["sn"], "SN1");
        assert_eq!(json["startingPoint"], "10.0.0.1");
    }
}
