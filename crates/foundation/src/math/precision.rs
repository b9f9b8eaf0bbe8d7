//! Deterministic float ordering.
//!
//! Picking sorts intersection distances, and the winner must be stable
//! across runs even when a degenerate ray produces a NaN distance.

use core::cmp::Ordering;

/// Collapse the float values that break naive ordering: `-0.0` becomes
/// `0.0` and every NaN becomes the one canonical NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        return 0.0;
    }
    if v.is_nan() {
        return f64::NAN;
    }
    v
}

/// Total, reproducible ordering over canonicalized floats. Use this for any
/// distance sort or ordered key.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
