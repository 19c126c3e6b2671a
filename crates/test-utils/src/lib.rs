//! Shared test utilities for the dwell-maps workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic tile images
//! - Sample tile tables and API payloads
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{solid_png, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two `(lat, lon)` tuples, e.g. tile corners.
#[macro_export]
macro_rules! assert_degrees_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left_lat, left_lon): (f64, f64) = $left;
        let (right_lat, right_lon): (f64, f64) = $right;
        $crate::assert_approx_eq!(left_lat, right_lat, $epsilon);
        $crate::assert_approx_eq!(left_lon, right_lon, $epsilon);
    }};
}
