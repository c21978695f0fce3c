//! Plain-text and JSON writers for analyzed paths.

use std::io::Write;

use crate::analyzer::PathReport;
use crate::explore::EdgeListing;
use crate::summary::SummaryReport;
use crate::types::{DisplayRow, HopRecord};

/// Placeholder for absent cells.
const EMPTY_CELL: &str = "-";

/// Label of collapsed switching runs.
const COLLAPSED_PROTOCOLS: &str = "l2/fp";

fn cell(value: Option<&str>) -> &str {
    value.unwrap_or(EMPTY_CELL)
}

fn hop_cells(hop: &HopRecord) -> [String; 7] {
    let (severity, policy) = match &hop.security {
        Some(verdict) => (verdict.severity.symbol().to_string(), verdict.policy.clone()),
        None => (EMPTY_CELL.to_string(), EMPTY_CELL.to_string()),
    };
    let mut protocol = hop.protocol.to_string();
    if let Some(outcome) = hop.outcome {
        protocol = format!("{protocol} ({outcome})");
    }
    [
        cell(hop.ingress_interface.as_deref()).to_string(),
        hop.device_name.clone(),
        cell(hop.egress_interface.as_deref()).to_string(),
        protocol,
        severity,
        policy,
        cell(hop.zone.as_deref()).to_string(),
    ]
}

/// One line per row: `ingress | device | egress | protocol[ | security]`.
pub fn write_list<W: Write>(rows: &[DisplayRow], mut writer: W) -> std::io::Result<()> {
    for row in rows {
        match row {
            DisplayRow::Hop(hop) => {
                write!(
                    writer,
                    "{} | {} | {} | {}",
                    cell(hop.ingress_interface.as_deref()),
                    hop.device_name,
                    cell(hop.egress_interface.as_deref()),
                    hop.protocol
                )?;
                if let Some(security) = hop.security_info() {
                    write!(writer, " | {}", security)?;
                } else if let Some(ref zone) = hop.zone {
                    write!(writer, " | {}", zone)?;
                }
                if let Some(outcome) = hop.outcome {
                    write!(writer, " | {}", outcome)?;
                }
                writeln!(writer)?;
            }
            DisplayRow::Collapsed { skipped } => writeln!(
                writer,
                "... | ...{} skipped ({})... | ... | {}",
                COLLAPSED_PROTOCOLS, skipped, COLLAPSED_PROTOCOLS
            )?,
        }
    }
    Ok(())
}

/// Aligned table with one column per hop field.
pub fn write_table<W: Write>(rows: &[DisplayRow], mut writer: W) -> std::io::Result<()> {
    const HEADERS: [&str; 7] = [
        "Ingress Interface",
        "Device",
        "Egress Interface",
        "Protocol",
        "Security",
        "Rule Chain",
        "ZoneFW",
    ];

    let lines: Vec<[String; 7]> = rows
        .iter()
        .map(|row| match row {
            DisplayRow::Hop(hop) => hop_cells(hop),
            DisplayRow::Collapsed { skipped } => [
                "...".to_string(),
                format!("...{} skipped ({})...", COLLAPSED_PROTOCOLS, skipped),
                "...".to_string(),
                COLLAPSED_PROTOCOLS.to_string(),
                String::new(),
                String::new(),
                String::new(),
            ],
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &lines {
        for (width, value) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let write_line = |writer: &mut W, values: &[&str]| -> std::io::Result<()> {
        let padded: Vec<String> = values
            .iter()
            .zip(widths.iter())
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect();
        writeln!(writer, "{}", padded.join("  ").trim_end())
    };

    write_line(&mut writer, &HEADERS)?;
    writeln!(writer, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (HEADERS.len() - 1)))?;
    for line in &lines {
        let values: Vec<&str> = line.iter().map(String::as_str).collect();
        write_line(&mut writer, &values)?;
    }
    Ok(())
}

/// Topic counts and global findings.
pub fn write_summary<W: Write>(summary: &SummaryReport, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "  - Summary")?;
    if !summary.has_topics() {
        writeln!(writer, "No summary information for this path")?;
    }
    for topic in &summary.topics {
        writeln!(writer, "    - {}", topic.topic)?;
        for (severity, count) in &topic.counts {
            writeln!(writer, "      - {}: {}", severity.colour(), count)?;
        }
    }

    if !summary.global.is_empty() {
        writeln!(writer, "  - Global")?;
        for line in &summary.global {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}

/// Every listed edge, flagging multiple egress options.
pub fn write_edges<W: Write>(listing: &[EdgeListing], mut writer: W) -> std::io::Result<()> {
    for edge in listing {
        if edge.multiple_egress {
            writeln!(writer, "{} (multiple egress)", edge.label)?;
        } else {
            writeln!(writer, "{}", edge.label)?;
        }
    }
    Ok(())
}

/// The full report as pretty JSON.
pub fn write_json<W: Write>(report: &PathReport, mut writer: W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)
}
