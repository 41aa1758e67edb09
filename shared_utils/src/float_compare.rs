//! Float Comparison Module
//!
//! Absolute-difference comparisons for f64 values.

/// Check if `a` lies strictly within `tolerance` of `b`
#[inline]
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

// ============================================================================
// Tests
// ============================================================================
