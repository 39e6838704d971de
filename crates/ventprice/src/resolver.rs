//! Rounding requested sizes up to tabulated ones
//!
//! Tables only price discrete sizes. A request is priced at the smallest
//! tabulated size that covers it: an exact match first, then the entry with
//! the least total overshoot, then the narrowest, then the lowest.

use std::cmp::Ordering;
use tracing::warn;
use ventprice_core::Dimensions;

/// Smallest `(width, height)` entry covering the request.
pub fn find_rounded_size(sizes: &[(f64, f64)], width: f64, height: f64) -> Option<(f64, f64)> {
    sizes
        .iter()
        .copied()
        .filter(|&(w, h)| w >= width && h >= height)
        .min_by(|&a, &b| {
            rank(a, width, height)
                .partial_cmp(&rank(b, width, height))
                .unwrap_or(Ordering::Equal)
        })
}

/// Smallest single-dimension entry covering the request.
pub fn find_rounded_value(values: &[f64], requested: f64) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|&v| v >= requested)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Order a pair so that width ≥ height, logging when it had to be swapped.
pub fn canonicalize(dims: Dimensions) -> (Dimensions, bool) {
    let (canonical, swapped) = dims.canonicalize();
    if swapped {
        warn!(
            width = canonical.width,
            height = canonical.height,
            "width and height appear to be swapped"
        );
    }
    (canonical, swapped)
}

fn rank((w, h): (f64, f64), width: f64, height: f64) -> (f64, f64, f64) {
    let overshoot = if w == width && h == height {
        0.0
    } else {
        (w - width) + (h - height)
    };
    (overshoot, w, h)
}
