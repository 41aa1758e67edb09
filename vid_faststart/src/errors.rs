use shared_utils::ToolRunError;
use thiserror::Error;

/// Everything that can go wrong while classifying or rewriting a video.
///
/// Each variant is terminal for the call that produced it.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("failed to run ffprobe: {0}")]
    ProbeExecution(#[source] ToolRunError),

    #[error("failed to parse ffprobe output: {0}")]
    ProbeOutputParse(#[source] serde_json::Error),

    #[error("no streams found in video file")]
    NoStreamsFound,

    #[error("invalid dimensions in video file: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("failed to process video for fast start: {0}")]
    TranscodeExecution(#[source] ToolRunError),
}

pub type Result<T> = std::result::Result<T, PrepError>;
