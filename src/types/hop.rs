//! Output records of the hop graph builder.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::decision::Severity;
use super::ident::Marker;

/// Protocol classification of a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Layer-2 switching.
    L2,
    /// VXLAN overlay.
    Vxlan,
    /// CAPWAP tunnel.
    Capwap,
    /// GRE tunnel.
    Gre,
    /// IPsec ESP.
    Esp,
    /// MPLS.
    Mpls,
    /// Plain IP.
    Ip,
    /// FabricPath.
    Fp,
    /// No trace available.
    #[serde(rename = "n/a")]
    NotAvailable,
}

impl Protocol {
    /// Header types in classification priority: tunnels/overlays first, FabricPath last.
    pub const HEADER_PRIORITY: [Protocol; 7] = [
        Self::Vxlan,
        Self::Capwap,
        Self::Gre,
        Self::Esp,
        Self::Mpls,
        Self::Ip,
        Self::Fp,
    ];

    /// Wire/display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L2 => "l2",
            Self::Vxlan => "vxlan",
            Self::Capwap => "capwap",
            Self::Gre => "gre",
            Self::Esp => "esp",
            Self::Mpls => "mpls",
            Self::Ip => "ip",
            Self::Fp => "fp",
            Self::NotAvailable => "n/a",
        }
    }

    /// Switching-only hops (L2 or FabricPath).
    pub fn is_switching(&self) -> bool {
        matches!(self, Self::L2 | Self::Fp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Security decision attached to a hop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityVerdict {
    /// Severity of the deciding event.
    pub severity: Severity,
    /// Deciding policy name.
    pub policy: String,
    /// Zone of the egress interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl fmt::Display for SecurityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.severity.symbol(), self.policy)?;
        if let Some(zone) = &self.zone {
            write!(f, " | {zone}")?;
        }
        Ok(())
    }
}

/// One device on the displayed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HopRecord {
    /// Interface the packet enters on; `None` for the start hop.
    pub ingress_interface: Option<String>,
    /// Display hostname.
    pub device_name: String,
    /// Device id used for decision lookups.
    pub device_id: Option<String>,
    /// Interface the packet leaves on; `None` for the end hop.
    pub egress_interface: Option<String>,
    /// Protocol classification.
    pub protocol: Protocol,
    /// Security decision, if any.
    pub security: Option<SecurityVerdict>,
    /// Zone of the egress interface.
    pub zone: Option<String>,
    /// Terminal marker when the trace ends here.
    pub outcome: Option<Marker>,
}

impl HopRecord {
    /// Display string of the security verdict.
    pub fn security_info(&self) -> Option<String> {
        self.security.as_ref().map(ToString::to_string)
    }

    /// Pure switching hop without a security decision.
    pub fn is_collapsible(&self) -> bool {
        self.protocol.is_switching() && self.security.is_none()
    }
}

/// A row of the displayed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayRow {
    /// A hop shown as-is.
    Hop(HopRecord),
    /// A run of switching hops elided from display.
    Collapsed {
        /// Number of hops in the run.
        skipped: usize,
    },
}

impl DisplayRow {
    /// The hop, unless collapsed.
    pub fn as_hop(&self) -> Option<&HopRecord> {
        match self {
            Self::Hop(hop) => Some(hop),
            Self::Collapsed { .. } => None,
        }
    }

    /// Whether this is a collapsed placeholder.
    pub fn is_collapsed(&self) -> bool {
        matches!(self, Self::Collapsed { .. })
    }
}
