//! Edge graph returned by the path-trace service.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ident::EdgeId;
use super::ordered::OrderedMap;

/// One recorded forwarding hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Composite edge id.
    pub id: EdgeId,
    /// Successor edges, in service order.
    #[serde(default)]
    pub next_edge_ids: Vec<EdgeId>,
    /// Device id of the source device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Source interface name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_iface_name: Option<String>,
}

impl Edge {
    /// Create an edge with the given successors.
    pub fn new(id: impl Into<EdgeId>, next_edge_ids: Vec<EdgeId>) -> Self {
        Self {
            id: id.into(),
            next_edge_ids,
            source: None,
            source_iface_name: None,
        }
    }

    /// Create an edge with no successors.
    pub fn terminal(id: impl Into<EdgeId>) -> Self {
        Self::new(id, Vec::new())
    }

    /// Whether more than one egress option exists.
    pub fn has_alternates(&self) -> bool {
        self.next_edge_ids.len() > 1
    }
}

/// Edge map in insertion order.
///
/// The first inserted edge is the entry point of the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathGraph {
    edges: Vec<Edge>,
    index: HashMap<EdgeId, usize>,
}

impl PathGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from edges, keyed by their ids.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.insert(edge);
        }
        graph
    }

    /// Insert an edge keyed by its id.
    pub fn insert(&mut self, edge: Edge) {
        let key = edge.id.clone();
        self.insert_keyed(key, edge);
    }

    /// Insert under an explicit key. Re-inserting a key keeps its position.
    pub fn insert_keyed(&mut self, key: EdgeId, edge: Edge) {
        match self.index.get(&key) {
            Some(&pos) => self.edges[pos] = edge,
            None => {
                self.index.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    /// Look up an edge by key.
    pub fn get(&self, id: &str) -> Option<&Edge> {
        self.index.get(id).map(|&pos| &self.edges[pos])
    }

    /// Whether `id` is a key.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// First inserted edge.
    pub fn first(&self) -> Option<&Edge> {
        self.edges.first()
    }

    /// Edges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn keys_in_order(&self) -> Vec<&EdgeId> {
        let mut keys: Vec<(&EdgeId, usize)> = self.index.iter().map(|(k, &p)| (k, p)).collect();
        keys.sort_by_key(|(_, pos)| *pos);
        keys.into_iter().map(|(k, _)| k).collect()
    }
}

impl Serialize for PathGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: OrderedMap<&EdgeId, &Edge> = self.keys_in_order().into_iter().zip(self.edges.iter()).collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PathGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = OrderedMap::<EdgeId, Edge>::deserialize(deserializer)?;
        let mut graph = PathGraph::new();
        for (key, edge) in map.into_entries() {
            graph.insert_keyed(key, edge);
        }
        Ok(graph)
    }
}

/// Node metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Device serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sn: Option<String>,
    /// Device hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Device id → node metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable(HashMap<String, NodeInfo>);

impl NodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node.
    pub fn insert(&mut self, device_id: impl Into<String>, info: NodeInfo) {
        self.0.insert(device_id.into(), info);
    }

    /// Node metadata for a device.
    pub fn get(&self, device_id: &str) -> Option<&NodeInfo> {
        self.0.get(device_id)
    }

    /// Serial number of a device.
    pub fn serial(&self, device_id: &str) -> Option<&str> {
        self.get(device_id)?.sn.as_deref()
    }
}
