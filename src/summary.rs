//! Event summary digest.
//!
//! Reduces `pathlookup.eventsSummary` to the lines worth showing: per-topic
//! counts that are non-zero, by severity colour, and the path-wide findings.

use serde::Serialize;

use crate::types::{EventsSummary, GlobalEvent, Severity};

/// Non-zero counts of one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSummary {
    /// Topic name, e.g. `ACL`.
    pub topic: String,
    /// (severity, count) in ranked order.
    pub counts: Vec<(Severity, u64)>,
}

/// Digest of an events summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    /// Topics with at least one non-zero count, in document order.
    pub topics: Vec<TopicSummary>,
    /// Rendered path-wide findings.
    pub global: Vec<String>,
}

impl SummaryReport {
    /// Whether no topic has anything to report.
    pub fn has_topics(&self) -> bool {
        !self.topics.is_empty()
    }
}

/// Build the digest.
pub fn summarize(summary: &EventsSummary) -> SummaryReport {
    let topics = summary
        .topics
        .iter()
        .filter_map(|(topic, counters)| {
            let counts: Vec<(Severity, u64)> = Severity::RANKED
                .into_iter()
                .filter_map(|severity| {
                    let count = counters.get(&severity.code().to_string()).copied().unwrap_or(0);
                    (count != 0).then_some((severity, count))
                })
                .collect();
            (!counts.is_empty()).then(|| TopicSummary {
                topic: topic.clone(),
                counts,
            })
        })
        .collect();

    SummaryReport {
        topics,
        global: summary.global.iter().map(render_global).collect(),
    }
}

/// `name | details... | severity code`.
pub fn render_global(event: &GlobalEvent) -> String {
    std::iter::once(event.name.clone())
        .chain(event.details.iter().cloned())
        .chain(std::iter::once(event.severity.code().to_string()))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_skips_zero_counts() {
        let summary: EventsSummary = serde_json::from_str(
            r#"{
                "topics": {
                    "NAT44": {"0": 0, "10": 0, "20": 0, "30": 0},
                    "ACL": {"0": 2, "10": 0, "20": 0, "30": 1},
                    "ZONEFW": {"20": 4}
                },
                "global": [{"name": "MTU mismatch", "details": ["r1", "r2"], "severity": 20}]
            }"#,
        )
        .unwrap();
        let report = summarize(&summary);

        assert!(report.has_topics());
        assert_eq!(report.topics.len(), 2);
        assert_eq!(report.topics[0].topic, "ACL");
        assert_eq!(
            report.topics[0].counts,
            vec![(Severity::Clear, 2), (Severity::Blocking, 1)]
        );
        assert_eq!(report.topics[1].counts, vec![(Severity::Warning, 4)]);
        assert_eq!(report.global, vec!["MTU mismatch | r1 | r2 | 20"]);
    }

    #[test]
    fn test_empty_summary() {
        let report = summarize(&EventsSummary::default());
        assert!(!report.has_topics());
        assert!(report.global.is_empty());
    }
}
