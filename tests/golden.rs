//! Golden tests for path decoding.
//!
//! These tests run captured-style lookup documents through the full pipeline
//! and pin the resulting hops.

use hoptrace::{
    AnalysisConfig, DisplayRow, LinearPath, Marker, PathAnalyzer, PathLinearizer,
    PathLookupResult, Protocol, Severity, ZoneInterfaceIndex,
};

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

const E1: &str = "vDevice/1!r1@eth0--vDevice/2!fw2@port1--#0";
const E2: &str = "vDevice/2!fw2@port2--vDevice/3!r3@ge0--#0";
const E3: &str = "vDevice/3!r3@ge1--accepted--#0";

/// Three edges, a blocking rule on the device owning E2.
const THREE_EDGES: &str = r#"{
    "graphResult": {"graphData": {
        "edges": {
            "vDevice/1!r1@eth0--vDevice/2!fw2@port1--#0": {
                "id": "vDevice/1!r1@eth0--vDevice/2!fw2@port1--#0",
                "nextEdgeIds": ["vDevice/2!fw2@port2--vDevice/3!r3@ge0--#0"]
            },
            "vDevice/2!fw2@port2--vDevice/3!r3@ge0--#0": {
                "id": "vDevice/2!fw2@port2--vDevice/3!r3@ge0--#0",
                "nextEdgeIds": ["vDevice/3!r3@ge1--accepted--#0"]
            },
            "vDevice/3!r3@ge1--accepted--#0": {
                "id": "vDevice/3!r3@ge1--accepted--#0",
                "nextEdgeIds": []
            }
        },
        "nodes": {"vDevice/2": {"sn": "FW2-SN", "hostname": "fw2"}}
    }},
    "pathlookup": {
        "decisions": {
            "vDevice/1": {"traces": [{
                "targetPacketId": "vDevice/1!r1@eth0--vDevice/2!fw2@port1--#0",
                "trace": [{"chain": "switching-nexthop", "events": [{"type": "forwarding", "headerType": "ip"}]}]
            }]},
            "vDevice/2": {"traces": [{
                "sourcePacketId": "vDevice/1!r1@eth0--vDevice/2!fw2@port1--#0",
                "targetPacketId": "vDevice/2!fw2@port2--vDevice/3!r3@ge0--#0",
                "trace": [
                    {"chain": "routing", "events": [{"type": "forwarding", "headerType": "ip"}]},
                    {"chain": "acl", "events": [{
                        "type": "security.acl",
                        "decidingPolicyName": "blockAll",
                        "severityInfo": {"severity": 30}
                    }]}
                ]
            }]}
        },
        "eventsSummary": {
            "topics": {"ACL": {"0": 0, "10": 0, "20": 0, "30": 1}},
            "global": []
        }
    }
}"#;

/// Edge keys deliberately out of lexical order.
const UNSORTED: &str = r#"{
    "graphResult": {"graphData": {"edges": {
        "z!zulu@e0--a!alpha@e1--#0": {"id": "z!zulu@e0--a!alpha@e1--#0", "nextEdgeIds": ["a!alpha@e2--accepted--#0"]},
        "a!alpha@e2--accepted--#0": {"id": "a!alpha@e2--accepted--#0", "nextEdgeIds": []}
    }}},
    "pathlookup": {"decisions": {}}
}"#;

/// A → B → C → D → E, with B, C and D switching only.
const SWITCHED: &str = r#"{
    "graphResult": {"graphData": {"edges": {
        "A!a@1--B!b@1--#0": {"id": "A!a@1--B!b@1--#0", "nextEdgeIds": ["B!b@2--C!c@1--#0"]},
        "B!b@2--C!c@1--#0": {"id": "B!b@2--C!c@1--#0", "nextEdgeIds": ["C!c@2--D!d@1--#0"]},
        "C!c@2--D!d@1--#0": {"id": "C!c@2--D!d@1--#0", "nextEdgeIds": ["D!d@2--E!e@1--#0"]},
        "D!d@2--E!e@1--#0": {"id": "D!d@2--E!e@1--#0", "nextEdgeIds": []}
    }}},
    "pathlookup": {"decisions": {
        "A": {"traces": [{"targetPacketId": "A!a@1--B!b@1--#0",
            "trace": [{"chain": "routing", "events": [{"type": "forwarding", "headerType": "ip"}]}]}]},
        "B": {"traces": [{"sourcePacketId": "A!a@1--B!b@1--#0",
            "trace": [{"chain": "switching-nexthop", "events": []}]}]},
        "C": {"traces": [{"sourcePacketId": "B!b@2--C!c@1--#0",
            "trace": [{"chain": "fabric", "events": [{"type": "forwarding", "headerType": "fp"}]}]}]},
        "D": {"traces": [{"sourcePacketId": "C!c@2--D!d@1--#0",
            "trace": [{"chain": "switching-nexthop", "events": []}]}]},
        "E": {"traces": [{"sourcePacketId": "D!d@2--E!e@1--#0",
            "trace": [{"chain": "routing", "events": [{"type": "forwarding", "headerType": "ip"}]}]}]}
    }}
}"#;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse(json: &str) -> PathLookupResult {
    PathLookupResult::from_json_str(json).expect("fixture parses")
}

fn analyzer(collapse_l2: bool) -> PathAnalyzer {
    PathAnalyzer::new(AnalysisConfig { collapse_l2 })
}

fn ids(path: &LinearPath) -> Vec<&str> {
    path.iter().map(|id| id.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn golden_three_edge_path() {
    let result = parse(THREE_EDGES);
    let report = analyzer(false).analyze(&result, None).unwrap();

    assert_eq!(ids(&report.path), vec![E1, E2, E3]);
    assert_eq!(report.hops.len(), 3);

    let names: Vec<&str> = report.hops.iter().map(|h| h.device_name.as_str()).collect();
    assert_eq!(names, vec!["r1", "fw2", "r3"]);

    assert_eq!(report.hops[0].protocol, Protocol::L2);
    assert!(report.hops[0].security.is_none());

    let middle = &report.hops[1];
    let security = middle.security_info().expect("middle hop carries a verdict");
    assert!(security.contains(Severity::Blocking.symbol()));
    assert!(security.contains("blockAll"));
    assert_eq!(middle.zone, None);
    assert_eq!(middle.ingress_interface.as_deref(), Some("port1"));
    assert_eq!(middle.egress_interface.as_deref(), Some("port2"));

    assert_eq!(report.hops[2].outcome, Some(Marker::Accepted));
    assert_eq!(report.summary.topics[0].counts, vec![(Severity::Blocking, 1)]);
}

#[test]
fn golden_zone_annotation() {
    let result = parse(THREE_EDGES);
    let zones: ZoneInterfaceIndex = serde_json::from_str(
        r#"[{"hostname": "fw2", "intName": "port2", "zone": ["untrust"]}]"#,
    )
    .unwrap();
    let report = analyzer(false).analyze(&result, Some(&zones)).unwrap();

    assert_eq!(report.hops[1].zone.as_deref(), Some("untrust"));
    assert!(report.hops[1].security_info().unwrap().ends_with("| blockAll | untrust"));
}

#[test]
fn golden_empty_graph_vs_single_edge() {
    let empty = parse(
        r#"{"graphResult": {"graphData": {"edges": {}}}, "pathlookup": {"decisions": {}}}"#,
    );
    let report = analyzer(false).analyze(&empty, None).unwrap();
    assert!(report.path.is_empty());
    assert!(!report.has_path());

    let single = parse(
        r#"{"graphResult": {"graphData": {"edges": {
            "D1!r1@eth0--dropped--#0": {"id": "D1!r1@eth0--dropped--#0", "nextEdgeIds": []}
        }}}, "pathlookup": {"decisions": {}}}"#,
    );
    let report = analyzer(false).analyze(&single, None).unwrap();
    assert_eq!(ids(&report.path), vec!["D1!r1@eth0--dropped--#0"]);
    assert!(report.has_path());
    assert_eq!(report.hops[0].outcome, Some(Marker::Dropped));
}

#[test]
fn golden_document_order_is_kept() {
    let result = parse(UNSORTED);
    let path = PathLinearizer::new().linearize(&result.edges);
    assert_eq!(
        ids(&path),
        vec!["z!zulu@e0--a!alpha@e1--#0", "a!alpha@e2--accepted--#0"]
    );
}

#[test]
fn golden_l2_collapse() {
    let result = parse(SWITCHED);

    let report = analyzer(true).analyze(&result, None).unwrap();
    assert_eq!(report.hops.len(), 5);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.rows[0].as_hop().unwrap().device_name, "a");
    assert_eq!(report.rows[1], DisplayRow::Collapsed { skipped: 3 });
    assert_eq!(report.rows[2].as_hop().unwrap().device_name, "e");

    let report = analyzer(false).analyze(&result, None).unwrap();
    assert_eq!(report.rows.len(), 5);
}

#[test]
fn golden_build_is_byte_identical() {
    let result = parse(THREE_EDGES);
    let analyzer = analyzer(true);

    let first = analyzer.analyze(&result, None).unwrap();
    let second = analyzer.analyze(&result, None).unwrap();

    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(
        serde_json::to_vec(&first.hops).unwrap(),
        serde_json::to_vec(&second.hops).unwrap()
    );
}

#[test]
fn golden_reparse_keeps_fingerprint() {
    let result = parse(THREE_EDGES);
    let reparsed: PathLookupResult = PathLookupResult::from_json_str(THREE_EDGES).unwrap();
    let a = analyzer(false).analyze(&result, None).unwrap();
    let b = analyzer(false).analyze(&reparsed, None).unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
}
