//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::types::{
    validate_ipv4_network, LookupRequest, RequestError, TransportProtocol, MAX_FRAGMENT_OFFSET,
};

/// Decode a captured path lookup into one annotated path
#[derive(Parser, Debug, Clone)]
#[command(name = "hoptrace")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Captured path lookup result (JSON)
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Captured pivot → source lookup result (JSON)
    #[arg(long = "pivot-file", requires = "pivot")]
    pub pivot_file: Option<PathBuf>,

    /// Pivot address whose entry point seeds the lookup
    #[arg(long = "pivot", requires = "pivot_file")]
    pub pivot: Option<String>,

    /// Interface → zone assignments (JSON array)
    #[arg(long = "zones")]
    pub zones: Option<PathBuf>,

    /// Source IP address or subnet
    #[arg(short = 's', long = "source-ip", default_value = "0.0.0.0/0")]
    pub source_ip: String,

    /// Destination IP address or subnet
    #[arg(short = 'd', long = "destination-ip", default_value = "0.0.0.0/0")]
    pub destination_ip: String,

    /// Protocol: tcp, udp or icmp
    #[arg(short = 'p', long = "protocol", default_value = "icmp")]
    pub protocol: String,

    /// Source port(s), tcp/udp only
    #[arg(long = "source-port")]
    pub source_port: Option<String>,

    /// Destination port(s), tcp/udp only
    #[arg(long = "destination-port")]
    pub destination_port: Option<String>,

    /// Time to live
    #[arg(long = "ttl", default_value = "128")]
    pub ttl: u8,

    /// Fragment offset (0-8191)
    #[arg(long = "fragment-offset", default_value = "0")]
    pub fragment_offset: u16,

    /// Stop the flow at the first blocking security rule
    #[arg(long = "secure-path")]
    pub secure_path: bool,

    /// Collapse pure L2 hops
    #[arg(long = "l2-exclusion")]
    pub l2_exclusion: bool,

    /// Render the path as a table
    #[arg(short = 't', long = "table", conflicts_with = "json")]
    pub table: bool,

    /// Output JSON
    #[arg(long = "json")]
    pub json: bool,

    /// List every edge and egress option instead of one path
    #[arg(long = "all-edges")]
    pub all_edges: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Default source port for tcp/udp.
pub const DEFAULT_SOURCE_PORT: &str = "1024";

/// Default destination port for tcp/udp.
pub const DEFAULT_DESTINATION_PORT: &str = "443";

impl Args {
    /// Source ports, defaulted for tcp/udp.
    pub fn source_ports(&self) -> &str {
        self.source_port.as_deref().unwrap_or(DEFAULT_SOURCE_PORT)
    }

    /// Destination ports, defaulted for tcp/udp.
    pub fn destination_ports(&self) -> &str {
        self.destination_port.as_deref().unwrap_or(DEFAULT_DESTINATION_PORT)
    }

    /// The lookup request described by the flow arguments.
    pub fn lookup_request(&self) -> Result<LookupRequest, RequestError> {
        let protocol = TransportProtocol::parse(&self.protocol)?;
        let mut request = LookupRequest::new(&self.source_ip, &self.destination_ip).with_protocol(
            protocol,
            self.source_ports(),
            self.destination_ports(),
        );
        request.ttl = self.ttl;
        request.fragment_offset = self.fragment_offset;
        request.secured_path = self.secure_path;
        request.validate()?;
        Ok(request)
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        validate_ipv4_network(&self.source_ip).map_err(|e| e.to_string())?;
        validate_ipv4_network(&self.destination_ip).map_err(|e| e.to_string())?;
        if let Some(ref pivot) = self.pivot {
            validate_ipv4_network(pivot).map_err(|e| e.to_string())?;
        }

        let protocol = TransportProtocol::parse(&self.protocol).map_err(|e| e.to_string())?;
        if !protocol.uses_ports() && (self.source_port.is_some() || self.destination_port.is_some()) {
            return Err(format!("Ports can only be set for tcp or udp, not {}", protocol));
        }

        if self.ttl == 0 {
            return Err("TTL must be at least 1".into());
        }

        if self.fragment_offset > MAX_FRAGMENT_OFFSET {
            return Err(format!("Fragment offset cannot exceed {}", MAX_FRAGMENT_OFFSET));
        }

        Ok(())
    }
}
