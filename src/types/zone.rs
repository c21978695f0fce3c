//! Zone-firewall interface assignments.

use serde::{Deserialize, Serialize};

/// Zones assigned to one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInterface {
    /// Device hostname.
    pub hostname: String,
    /// Interface name.
    #[serde(rename = "intName", alias = "interfaceName")]
    pub interface_name: String,
    /// Zone names.
    #[serde(default, alias = "zones")]
    pub zone: Vec<String>,
}

/// Interface → zone lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneInterfaceIndex(Vec<ZoneInterface>);

impl ZoneInterfaceIndex {
    /// Wrap assignments.
    pub fn new(entries: Vec<ZoneInterface>) -> Self {
        Self(entries)
    }

    /// Zone label (`zone1/zone2`) of an interface, first entry wins.
    ///
    /// `None` when the interface has no entry or an empty zone list.
    pub fn lookup(&self, hostname: &str, interface: &str) -> Option<String> {
        self.0
            .iter()
            .find(|entry| entry.hostname == hostname && entry.interface_name == interface)
            .filter(|entry| !entry.zone.is_empty())
            .map(|entry| entry.zone.join("/"))
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let index: ZoneInterfaceIndex = serde_json::from_str(
            r#"[{"hostname": "fw1", "intName": "port1", "zone": ["inside", "trust"]},
                {"hostname": "fw1", "intName": "port2", "zone": []}]"#,
        )
        .unwrap();
        assert_eq!(index.lookup("fw1", "port1").as_deref(), Some("inside/trust"));
        assert_eq!(index.lookup("fw1", "port2"), None);
        assert_eq!(index.lookup("fw2", "port1"), None);
    }
}
