//! FFprobe JSON model
//!
//! Typed view of `ffprobe -print_format json -show_streams` output. Only the
//! frame dimensions are modelled; every other key ffprobe emits is ignored.

use serde::{Deserialize, Deserializer};
use std::ffi::OsString;
use std::path::Path;

/// One entry of the `streams` array.
///
/// Streams without dimensions (audio, data, subtitles) deserialize with
/// zero width and height. Dimensions are signed: negative values parse and
/// are left to the caller.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct FfprobeStream {
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: i64,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct FfprobeOutput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub streams: Vec<FfprobeStream>,
}

/// `null` reads the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FfprobeOutput {
    /// Parse raw ffprobe stdout.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// The first stream, which is the only one consulted for dimensions.
    pub fn first_stream(&self) -> Option<&FfprobeStream> {
        self.streams.first()
    }
}

/// Arguments for a quiet JSON dump of every stream in `input`.
pub fn show_streams_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-print_format", "json", "-show_streams"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args
}
