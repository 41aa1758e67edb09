//! Aspect ratio classification
//!
//! A video is bucketed by the width/height ratio of the first stream that
//! ffprobe reports: close to 16:9 is landscape, close to 9:16 is portrait,
//! anything else is "other".

use serde::Serialize;
use shared_utils::{run_capturing_stdout, show_streams_args, within_tolerance, FfprobeOutput};
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::MediaTools;
use crate::errors::{PrepError, Result};

pub const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
pub const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
/// Absolute distance from a reference ratio that still counts as a match.
pub const RATIO_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "other")]
    Other,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Other,
    ];

    /// The label string: `"16:9"`, `"9:16"` or `"other"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        }
    }

    /// Bucket a width/height ratio. Landscape is checked before portrait.
    pub fn from_ratio(ratio: f64) -> Self {
        if within_tolerance(ratio, LANDSCAPE_RATIO, RATIO_TOLERANCE) {
            AspectRatio::Landscape
        } else if within_tolerance(ratio, PORTRAIT_RATIO, RATIO_TOLERANCE) {
            AspectRatio::Portrait
        } else {
            AspectRatio::Other
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown aspect ratio label: {:?}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

impl FromStr for AspectRatio {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Classify frame dimensions. Either dimension being zero is an error;
/// negative values are not rejected and simply produce a negative or
/// positive ratio.
pub fn classify_dimensions(width: i64, height: i64) -> Result<AspectRatio> {
    if width == 0 || height == 0 {
        return Err(PrepError::InvalidDimensions { width, height });
    }

    let ratio = width as f64 / height as f64;
    let aspect_ratio = AspectRatio::from_ratio(ratio);
    debug!(width, height, ratio, label = %aspect_ratio, "Classified dimensions");
    Ok(aspect_ratio)
}

/// Classify raw `ffprobe -show_streams` JSON using its first stream.
pub fn classify_probe_output(stdout: &[u8]) -> Result<AspectRatio> {
    let probe = FfprobeOutput::from_slice(stdout).map_err(PrepError::ProbeOutputParse)?;
    let stream = probe.first_stream().ok_or(PrepError::NoStreamsFound)?;
    classify_dimensions(stream.width, stream.height)
}

impl MediaTools {
    /// Probe `path` with ffprobe and classify its first stream.
    pub fn classify_aspect_ratio<P: AsRef<Path>>(&self, path: P) -> Result<AspectRatio> {
        let path = path.as_ref();

        let mut cmd = Command::new(&self.ffprobe);
        cmd.args(show_streams_args(path));
        let stdout = run_capturing_stdout(&mut cmd).map_err(PrepError::ProbeExecution)?;

        let aspect_ratio = classify_probe_output(&stdout)?;
        info!(input = %path.display(), aspect_ratio = %aspect_ratio, "Aspect ratio detected");
        Ok(aspect_ratio)
    }
}

/// [`MediaTools::classify_aspect_ratio`] with the default `ffprobe`.
pub fn classify_aspect_ratio<P: AsRef<Path>>(path: P) -> Result<AspectRatio> {
    MediaTools::default().classify_aspect_ratio(path)
}
