//! Which external programs to run.

use std::path::{Path, PathBuf};

pub const DEFAULT_FFPROBE: &str = "ffprobe";
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// The probe and transcode programs used by every operation.
///
/// Defaults to `ffprobe` and `ffmpeg` resolved through `PATH`. Either can
/// point at an absolute path instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTools {
    pub ffprobe: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for MediaTools {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from(DEFAULT_FFPROBE),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
        }
    }
}

impl MediaTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ffprobe<P: AsRef<Path>>(mut self, program: P) -> Self {
        self.ffprobe = program.as_ref().to_path_buf();
        self
    }

    pub fn with_ffmpeg<P: AsRef<Path>>(mut self, program: P) -> Self {
        self.ffmpeg = program.as_ref().to_path_buf();
        self
    }

    /// Configured programs that cannot be resolved right now.
    ///
    /// Informational only: operations do not consult this and report a
    /// missing program through their own execution error.
    pub fn missing_tools(&self) -> Vec<&Path> {
        [self.ffprobe.as_path(), self.ffmpeg.as_path()]
            .into_iter()
            .filter(|program| !shared_utils::is_tool_available(program))
            .collect()
    }
}
