//! Storage key prefixes per aspect ratio.

use crate::aspect_ratio::AspectRatio;

pub const LANDSCAPE_PREFIX: &str = "landscape/";
pub const PORTRAIT_PREFIX: &str = "portrait/";
pub const OTHER_PREFIX: &str = "other/";

/// Map an aspect ratio label to its storage key prefix.
///
/// Total: any label other than `"16:9"` and `"9:16"`, including the empty
/// string, maps to `"other/"`.
pub fn prefix_for_label(label: &str) -> &'static str {
    match label {
        "16:9" => LANDSCAPE_PREFIX,
        "9:16" => PORTRAIT_PREFIX,
        _ => OTHER_PREFIX,
    }
}

impl AspectRatio {
    pub fn storage_prefix(&self) -> &'static str {
        prefix_for_label(self.as_str())
    }
}
