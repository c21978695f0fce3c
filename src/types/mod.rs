//! Core types for path decoding.

pub mod ident;
pub mod ordered;
pub mod graph;
pub mod decision;
pub mod zone;
pub mod summary;
pub mod request;
pub mod lookup;
pub mod hop;

pub use ident::{
    EdgeId, Marker, DeviceToken, Endpoint, DecodedEdge, COMPONENT_SEPARATOR,
    decode_token, decode_edge_id, device_id_hint,
};
pub use ordered::OrderedMap;
pub use graph::{Edge, PathGraph, NodeInfo, NodeTable};
pub use decision::{
    Severity, SeverityInfo, Event, TraceStep, TraceRecord, DeviceDecisions, DecisionTable,
};
pub use zone::{ZoneInterface, ZoneInterfaceIndex};
pub use summary::{EventsSummary, GlobalEvent, TopicCounters};
pub use request::{
    LookupRequest, LookupRole, TransportProtocol, FirstHopAlgorithm, EntryPoint, RequestError,
    validate_ipv4_network, DEFAULT_TTL, MAX_FRAGMENT_OFFSET,
};
pub use lookup::{PathLookupResult, InputError, EDGES_KEY, DECISIONS_KEY};
pub use hop::{Protocol, SecurityVerdict, HopRecord, DisplayRow};
