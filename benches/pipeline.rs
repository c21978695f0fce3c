//! Performance benchmarks for path decoding.
//!
//! Run with: `cargo bench --bench pipeline`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Linearize 1k edges | <1ms | Single pass, one hash lookup per edge |
//! | Build 1k hops | <5ms | Two decision lookups per hop |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hoptrace::types::{DeviceDecisions, Event, SeverityInfo, TraceRecord, TraceStep};
use hoptrace::{
    filter_for_display, DecisionTable, Edge, EdgeId, HopGraphBuilder, PathGraph, PathLinearizer,
    Severity,
};

fn edge_id(i: usize) -> String {
    format!("D{i}!host{i}@eth1--D{n}!host{n}@eth0--#0", n = i + 1)
}

/// A chain of `n` edges with one decoy branch every tenth edge.
fn make_graph(n: usize) -> PathGraph {
    PathGraph::from_edges((0..n).map(|i| {
        let mut next = Vec::new();
        if i + 1 < n {
            next.push(EdgeId::from(edge_id(i + 1)));
            if i % 10 == 0 {
                next.push(EdgeId::from(format!("D{i}!host{i}@eth9--dropped--#1")));
            }
        }
        Edge::new(edge_id(i), next)
    }))
}

fn make_decisions(n: usize) -> DecisionTable {
    (0..n)
        .map(|i| {
            let chain = if i % 3 == 0 { "switching-nexthop" } else { "routing" };
            let decisions = DeviceDecisions {
                traces: vec![TraceRecord {
                    source_packet_id: Some(EdgeId::from(edge_id(i))),
                    target_packet_id: None,
                    trace: vec![TraceStep {
                        chain: chain.to_string(),
                        events: vec![Event {
                            event_type: "security.acl".to_string(),
                            header_type: Some("ip".to_string()),
                            deciding_policy_name: Some(format!("rule-{i}")),
                            severity_info: Some(SeverityInfo {
                                severity: Severity::Clear,
                            }),
                        }],
                    }],
                }],
            };
            (format!("D{}", i + 1), decisions)
        })
        .collect()
}

fn bench_linearize(c: &mut Criterion) {
    let mut group = c.benchmark_group("linearize");
    for n in [10usize, 100, 1000] {
        let graph = make_graph(n);
        let linearizer = PathLinearizer::new();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| linearizer.linearize(black_box(graph)))
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [10usize, 100, 1000] {
        let graph = make_graph(n);
        let decisions = make_decisions(n);
        let path = PathLinearizer::new().linearize(&graph);
        let builder = HopGraphBuilder::new(&decisions, None);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &path, |b, path| {
            b.iter(|| filter_for_display(&builder.build(black_box(path)), true))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_linearize, bench_build);
criterion_main!(benches);
