// SPDX-License-Identifier: GPL-3.0-or-later

//! Brute-force cross correlation over a window of offsets.
//!
//! Offsets are visited as `0, +1, -1, +2, -2, ...` and the scan stops at the
//! first one whose correlation reaches the threshold. That offset is not
//! necessarily the best one in the window; callers wanting the global best
//! pass a threshold above `1.0`.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Best correlation found and the offset it was found at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub score: f32,
    /// Positive when `a` was advanced, negative when `b` was.
    pub offset: i32,
}

impl From<Correlation> for (f32, i32) {
    fn from(c: Correlation) -> Self {
        (c.score, c.offset)
    }
}

/// Bitwise correlation of `a` and `b` with one of them advanced by `offset`.
///
/// The compared length is both lengths reduced by `|offset|`, whichever is
/// shorter. Returns `0.0` when nothing is left to compare.
pub fn correlate_at(a: &[u32], b: &[u32], offset: i32) -> f32 {
    let shift = offset.unsigned_abs() as usize;
    let len = a
        .len()
        .saturating_sub(shift)
        .min(b.len().saturating_sub(shift));
    if len == 0 {
        return 0.0;
    }

    let (a, b) = if offset > 0 {
        (&a[shift..], b)
    } else {
        (a, &b[shift..])
    };
    let errors: u32 = a
        .iter()
        .zip(b)
        .take(len)
        .map(|(x, y)| (x ^ y).count_ones())
        .sum();

    1.0 - errors as f32 / 32.0 / len as f32
}

/// Scan offsets in `[-max_offset, max_offset]` for the best correlation.
///
/// Returns as soon as an offset improves on the best so far and reaches
/// `threshold`. Otherwise the best offset seen is returned, the earliest in
/// scan order on ties.
pub fn correlate(a: &[u32], b: &[u32], max_offset: u32, threshold: f32) -> Correlation {
    let max_offset = i32::try_from(max_offset).unwrap_or(i32::MAX);
    let offsets = std::iter::once(0).chain((1..=max_offset).flat_map(|o| [o, -o]));

    let mut best = Correlation {
        score: 0.0,
        offset: 0,
    };
    for offset in offsets {
        let score = correlate_at(a, b, offset);
        if score > best.score {
            best = Correlation { score, offset };
            if score >= threshold {
                debug!(target: "correlate", score, offset, "threshold reached");
                return best;
            }
        }
    }

    debug!(
        target: "correlate",
        score = best.score,
        offset = best.offset,
        "window exhausted"
    );
    best
}
