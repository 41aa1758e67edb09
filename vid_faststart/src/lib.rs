//! vid-faststart - aspect ratio classification and fast-start remuxing
//!
//! Wraps `ffprobe` and `ffmpeg` to:
//! - bucket a video into `16:9`, `9:16` or `other` by its first stream
//! - remux it into an MP4 with the metadata up front (`-movflags faststart`)
//! - map the bucket to a storage key prefix
//!
//! ```rust,ignore
//! use vid_faststart::{classify_aspect_ratio, prefix_for_label, rewrite_for_fast_start};
//!
//! let ratio = classify_aspect_ratio("clip.mp4")?;
//! let output = rewrite_for_fast_start("clip.mp4")?; // clip.mp4.processing
//! let key = format!("{}{}", prefix_for_label(ratio.as_str()), "clip.mp4");
//! ```

pub mod aspect_ratio;
pub mod config;
pub mod errors;
pub mod faststart;
pub mod prepare;
pub mod storage_prefix;

pub use aspect_ratio::{
    classify_aspect_ratio, classify_dimensions, classify_probe_output, AspectRatio, UnknownLabel,
};
pub use config::MediaTools;
pub use errors::{PrepError, Result};
pub use faststart::{faststart_args, processing_path, rewrite_for_fast_start};
pub use prepare::{ClassifyReport, PrepareReport};
pub use storage_prefix::prefix_for_label;
