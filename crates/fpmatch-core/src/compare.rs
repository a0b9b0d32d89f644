// SPDX-License-Identifier: GPL-3.0-or-later

//! Validated entry points for comparing two fingerprints.

use tracing::{debug, instrument};

use crate::aligner::align;
use crate::correlator::{self, Correlation};
use crate::scorer;
use crate::{MatchError, Result};

/// Absolute offset window, checked to fit strictly inside both fingerprints.
fn validate_window(a: &[u32], b: &[u32], max_offset: i32) -> Result<u32> {
    let window = max_offset.unsigned_abs();
    if window as usize >= a.len() || window as usize >= b.len() {
        return Err(MatchError::InvalidArgument {
            max_offset: window,
            len_a: a.len(),
            len_b: b.len(),
        });
    }
    Ok(window)
}

/// Similarity of `a` and `b` in `[0, 1]`.
///
/// The relative offset is estimated from prefix votes limited to
/// `|max_offset|` (`0` leaves it unbounded), then the overlap is scored by
/// bit error with a penalty for repetitive content. Swapping the arguments
/// negates the estimated offset, so the other side gets trimmed.
///
/// # Errors
///
/// Returns [`MatchError::InvalidArgument`] unless `|max_offset|` is smaller
/// than both lengths.
#[instrument(level = "debug", skip(a, b), fields(len_a = a.len(), len_b = b.len()))]
pub fn score_fingerprints(a: &[u32], b: &[u32], max_offset: i32) -> Result<f32> {
    let window = validate_window(a, b, max_offset)?;

    let alignment = align(a, b, window);
    debug!(
        target: "align",
        offset = alignment.offset,
        votes = alignment.votes,
        overlap_a = alignment.a.len(),
        overlap_b = alignment.b.len(),
        "alignment estimated"
    );

    Ok(scorer::score(
        alignment.a,
        alignment.b,
        alignment.votes,
        a.len(),
        b.len(),
    ))
}

/// Best bitwise correlation of `a` and `b` within `|max_offset|` frames.
///
/// Stops at the first offset, in the order `0, +1, -1, +2, -2, ...`, whose
/// correlation reaches `threshold`.
///
/// # Errors
///
/// Returns [`MatchError::InvalidArgument`] unless `|max_offset|` is smaller
/// than both lengths.
#[instrument(level = "debug", skip(a, b), fields(len_a = a.len(), len_b = b.len()))]
pub fn correlate_fingerprints(
    a: &[u32],
    b: &[u32],
    max_offset: i32,
    threshold: f32,
) -> Result<Correlation> {
    let window = validate_window(a, b, max_offset)?;
    Ok(correlator::correlate(a, b, window, threshold))
}
