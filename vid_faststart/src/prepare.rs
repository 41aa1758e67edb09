//! Classify-then-rewrite, the sequence an upload pipeline runs before
//! handing the file to storage.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aspect_ratio::AspectRatio;
use crate::config::MediaTools;
use crate::errors::Result;

/// Paths are written lossily so a non-UTF-8 file name still serializes.
fn serialize_path_lossy<P, S>(path: &P, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyReport {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub input: PathBuf,
    pub aspect_ratio: AspectRatio,
    pub prefix: &'static str,
}

impl ClassifyReport {
    pub fn new(input: &Path, aspect_ratio: AspectRatio) -> Self {
        Self {
            input: input.to_path_buf(),
            aspect_ratio,
            prefix: aspect_ratio.storage_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepareReport {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub input: PathBuf,
    pub aspect_ratio: AspectRatio,
    pub prefix: &'static str,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub output: PathBuf,
}

impl MediaTools {
    /// Classify `path`, then rewrite it for fast start.
    ///
    /// Stops at the first error; ffmpeg is never run for a file that could
    /// not be classified.
    pub fn prepare<P: AsRef<Path>>(&self, path: P) -> Result<PrepareReport> {
        let input = path.as_ref();

        let aspect_ratio = self.classify_aspect_ratio(input)?;
        let output = self.rewrite_for_fast_start(input)?;

        let report = PrepareReport {
            input: input.to_path_buf(),
            aspect_ratio,
            prefix: aspect_ratio.storage_prefix(),
            output,
        };
        info!(
            input = %report.input.display(),
            aspect_ratio = %report.aspect_ratio,
            prefix = report.prefix,
            "Video prepared"
        );
        Ok(report)
    }
}
