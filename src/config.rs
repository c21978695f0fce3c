//! Runtime configuration.

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalysisConfig;
#[cfg(feature = "cli")]
use crate::cli::Args;

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Human-readable.
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parse a format name; anything but `json` is pretty.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }

    /// Read [`LOG_FORMAT_ENV`].
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// How the path is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per hop.
    #[default]
    List,
    /// Aligned columns.
    Table,
    /// The full report as JSON.
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Output format
    pub output: OutputFormat,
    /// Collapse pure L2 hops
    pub collapse_l2: bool,
    /// List every edge instead of one path
    pub all_edges: bool,
    /// Log format
    pub log_format: LogFormat,
    /// Debug-level logging
    pub verbose: bool,
}

impl Config {
    /// Analysis options.
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            collapse_l2: self.collapse_l2,
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "hoptrace=debug"
        } else {
            "hoptrace=info"
        }
    }
}

#[cfg(feature = "cli")]
impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let output = if args.json {
            OutputFormat::Json
        } else if args.table {
            OutputFormat::Table
        } else {
            OutputFormat::List
        };

        Self {
            output,
            collapse_l2: args.l2_exclusion,
            all_edges: args.all_edges,
            log_format: LogFormat::from_env(),
            verbose: args.verbose,
        }
    }
}
