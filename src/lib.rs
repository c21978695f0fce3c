//! # hoptrace
//!
//! Deterministic path decoding for network path-trace results.
//!
//! A path-trace service answers "how would this packet cross the network?"
//! with a branching graph of forwarding edges plus per-device decision traces.
//! This crate turns that answer into one readable path:
//!
//! > Which devices does the packet cross, over which interfaces, and which
//! > security policy decides its fate at each hop?
//!
//! ## Pipeline
//!
//! ```text
//! PathLookupResult → PathLinearizer → LinearPath → HopGraphBuilder → HopRecord[]
//!                         ↓                               ↓
//!                   SuccessorPolicy               DecisionCorrelator
//!                   DeviceResolver            (DecisionTable, zones)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Edge order is document order of the input
//! - The first successor is followed at every branch (by default)
//! - Same inputs → identical hop records and [`PathFingerprint`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod resolver;
pub mod linearizer;
pub mod correlator;
pub mod builder;
pub mod pivot;
pub mod summary;
pub mod explore;
pub mod fingerprint;
pub mod analyzer;
pub mod source;
pub mod config;
pub mod export;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports
pub use types::{
    EdgeId, Marker, DeviceToken, Endpoint, DecodedEdge, decode_token, decode_edge_id,
    Edge, PathGraph, NodeTable, DecisionTable, ZoneInterfaceIndex, EventsSummary,
    LookupRequest, EntryPoint, PathLookupResult, InputError, RequestError,
    Severity, Protocol, SecurityVerdict, HopRecord, DisplayRow,
};
pub use policy::{SuccessorPolicy, FirstOption};
pub use resolver::{resolve_hostname, DeviceResolver, HostnameSource};
pub use linearizer::{LinearPath, PathLinearizer};
pub use correlator::{DecisionCorrelator, HopAnnotation, TraceMatch, classify_protocol, extract_security};
pub use builder::{HopGraphBuilder, filter_for_display};
pub use pivot::{find_entry_point, seed_from_pivot};
pub use summary::{summarize, SummaryReport};
pub use explore::{enumerate_edges, EdgeListing};
pub use fingerprint::PathFingerprint;
pub use analyzer::{PathAnalyzer, AnalysisConfig, PathReport, AnalyzerError};
pub use source::{PathLookupSource, InMemorySource, InMemorySourceError};
#[cfg(feature = "fs")]
pub use source::{FileSource, FileSourceError};
pub use config::{Config, LogFormat, OutputFormat};

/// Schema version of serialized reports.
/// Increment on breaking changes to any output type.
pub const HOPTRACE_SCHEMA_VERSION: &str = "1.0.0";
