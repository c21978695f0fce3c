//! Captured lookup results on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::PathLookupSource;
use crate::types::{InputError, LookupRequest, LookupRole, PathLookupResult, ZoneInterfaceIndex};

/// Error type for file source.
#[derive(Debug, thiserror::Error)]
pub enum FileSourceError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The capture is not a valid lookup result.
    #[error("Invalid lookup result in {path}: {source}")]
    Input {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: InputError,
    },
    /// The zone file is not a valid zone list.
    #[error("Invalid zone data in {path}: {source}")]
    Zones {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// A pivot lookup was issued but no pivot capture is configured.
    #[error("No pivot capture configured")]
    NoPivotCapture,
}

/// Serves captured JSON documents.
///
/// Primary requests read the primary capture, pivot lookups the pivot
/// capture. The request's flow parameters are not checked against the
/// capture.
#[derive(Debug, Clone)]
pub struct FileSource {
    primary: PathBuf,
    pivot: Option<PathBuf>,
    zones: Option<PathBuf>,
}

impl FileSource {
    /// Source serving `primary` for every primary request.
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            pivot: None,
            zones: None,
        }
    }

    /// Capture served for pivot lookups.
    pub fn with_pivot(mut self, pivot: impl Into<PathBuf>) -> Self {
        self.pivot = Some(pivot.into());
        self
    }

    /// Zone assignment file.
    pub fn with_zones(mut self, zones: impl Into<PathBuf>) -> Self {
        self.zones = Some(zones.into());
        self
    }

    async fn read(path: &Path) -> Result<Vec<u8>, FileSourceError> {
        tokio::fs::read(path).await.map_err(|source| FileSourceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[async_trait]
impl PathLookupSource for FileSource {
    type Error = FileSourceError;

    async fn lookup(&self, request: &LookupRequest) -> Result<PathLookupResult, Self::Error> {
        let path = match request.role {
            LookupRole::Primary => &self.primary,
            LookupRole::Pivot => self.pivot.as_ref().ok_or(FileSourceError::NoPivotCapture)?,
        };
        debug!(path = %path.display(), role = ?request.role, "reading captured lookup");

        let bytes = Self::read(path).await?;
        PathLookupResult::from_json_slice(&bytes).map_err(|source| FileSourceError::Input {
            path: path.clone(),
            source,
        })
    }

    async fn zone_interfaces(&self) -> Result<Option<ZoneInterfaceIndex>, Self::Error> {
        let Some(path) = &self.zones else {
            return Ok(None);
        };
        let bytes = Self::read(path).await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| FileSourceError::Zones {
                path: path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"{
        "graphResult": {"graphData": {"edges": {
            "D1!r1@eth0--accepted--#0": {"id": "D1!r1@eth0--accepted--#0", "nextEdgeIds": []}
        }}},
        "pathlookup": {"decisions": {}}
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_primary_capture() {
        let capture = write_temp(DOCUMENT);
        let source = FileSource::new(capture.path());

        let result = source.lookup(&LookupRequest::new("10.0.0.1", "10.0.1.1")).await.unwrap();
        assert_eq!(result.edges.len(), 1);
        assert!(source.zone_interfaces().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pivot_without_capture() {
        let capture = write_temp(DOCUMENT);
        let source = FileSource::new(capture.path());
        let reverse = LookupRequest::new("10.0.0.1", "10.0.1.1").pivot_request("10.9.9.9");

        let err = source.lookup(&reverse).await.unwrap_err();
        assert!(matches!(err, FileSourceError::NoPivotCapture));
    }

    #[tokio::test]
    async fn test_reads_zone_file() {
        let capture = write_temp(DOCUMENT);
        let zones = write_temp(r#"[{"hostname": "fw1", "intName": "port1", "zone": ["dmz"]}]"#);
        let source = FileSource::new(capture.path()).with_zones(zones.path());

        let index = source.zone_interfaces().await.unwrap().unwrap();
        assert_eq!(index.lookup("fw1", "port1").as_deref(), Some("dmz"));
    }

    #[tokio::test]
    async fn test_errors_name_the_file() {
        let source = FileSource::new("/nonexistent/capture.json");
        let err = source.lookup(&LookupRequest::new("10.0.0.1", "10.0.1.1")).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/capture.json"));

        let broken = write_temp(r#"{"pathlookup": {"decisions": {}}}"#);
        let source = FileSource::new(broken.path());
        let err = source.lookup(&LookupRequest::new("10.0.0.1", "10.0.1.1")).await.unwrap_err();
        assert!(matches!(err, FileSourceError::Input { .. }));
    }
}
