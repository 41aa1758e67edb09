//! Fast-start remuxing
//!
//! Copies every stream of a video into a new MP4 with the `moov` atom in
//! front of the media data, so playback can begin before the download ends.
//! Nothing is re-encoded.

use shared_utils::FfmpegProcess;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::config::MediaTools;
use crate::errors::{PrepError, Result};

/// Suffix appended to the input path to name the rewritten file.
pub const PROCESSING_SUFFIX: &str = ".processing";

/// `clip.mp4` -> `clip.mp4.processing`. The suffix is appended to the whole
/// path, not swapped in for the extension.
pub fn processing_path(input: &Path) -> PathBuf {
    let mut output = input.as_os_str().to_owned();
    output.push(PROCESSING_SUFFIX);
    PathBuf::from(output)
}

/// ffmpeg arguments for a stream-copy remux of `input` into a fast-start MP4
/// at `output`.
pub fn faststart_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = vec![OsString::from("-i"), input.as_os_str().to_owned()];
    args.extend(
        ["-c", "copy", "-f", "mp4", "-movflags", "faststart"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

impl MediaTools {
    /// Remux `path` into `path.processing` and return the new path.
    ///
    /// Success means ffmpeg exited cleanly; the output file is not inspected.
    /// A failed run may leave a partial output file behind.
    pub fn rewrite_for_fast_start<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let input = path.as_ref();
        let output = processing_path(input);

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(faststart_args(input, &output));

        FfmpegProcess::spawn(&mut cmd)
            .and_then(FfmpegProcess::wait_checked)
            .map_err(PrepError::TranscodeExecution)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            "Fast-start rewrite completed"
        );
        Ok(output)
    }
}

/// [`MediaTools::rewrite_for_fast_start`] with the default `ffmpeg`.
pub fn rewrite_for_fast_start<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    MediaTools::default().rewrite_for_fast_start(path)
}
