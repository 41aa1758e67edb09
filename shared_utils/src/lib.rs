//! Shared utilities for the vid-faststart tools
//!
//! Plumbing around the external media tools:
//! - running ffprobe / ffmpeg and classifying their exit
//! - the typed ffprobe JSON model
//! - float comparison helpers
//! - tool discovery on PATH
//! - logging setup and external tool logging

pub mod ffmpeg_process;
pub mod ffprobe_json;
pub mod float_compare;
pub mod logging;
pub mod tools;

pub use ffmpeg_process::{
    command_line, format_ffmpeg_error, run_capturing_stdout, FfmpegProcess, ToolRunError,
};
pub use ffprobe_json::{show_streams_args, FfprobeOutput, FfprobeStream};
pub use float_compare::within_tolerance;
pub use tools::{is_tool_available, resolve_tool};
