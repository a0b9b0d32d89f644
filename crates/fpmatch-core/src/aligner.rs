// SPDX-License-Identifier: GPL-3.0-or-later

//! Offset estimation by prefix voting.
//!
//! Every sub-fingerprint is reduced to its top [`MATCH_BITS`] bits. For each
//! prefix, the last index holding it is recorded per fingerprint; prefixes
//! present on both sides then vote for the offset between those two indices.
//! The offset with the most votes decides which fingerprint gets its head
//! trimmed so that the remaining slices overlap.

use tracing::trace;

/// Number of leading bits kept from a sub-fingerprint when bucketing.
pub const MATCH_BITS: u32 = 14;

/// Number of distinct prefixes, and so the size of every strip table.
pub(crate) const STRIP_SIZE: usize = 1 << MATCH_BITS;

#[inline]
pub(crate) fn match_strip(x: u32) -> usize {
    (x >> (32 - MATCH_BITS)) as usize
}

/// Overlapping region of two fingerprints implied by the winning offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment<'a> {
    /// First fingerprint, advanced by `offset` when it is positive.
    pub a: &'a [u32],
    /// Second fingerprint, advanced by `-offset` when it is negative.
    pub b: &'a [u32],
    /// Estimated position of `b[0]` inside `a`.
    pub offset: i64,
    /// Histogram votes behind `offset`.
    pub votes: u32,
}

/// Maps each prefix to the last index that carries it.
///
/// Zero doubles as "absent", so a prefix seen only at index 0 never votes.
fn strip_index(fingerprint: &[u32]) -> Vec<usize> {
    let mut index = vec![0usize; STRIP_SIZE];
    for (i, &x) in fingerprint.iter().enumerate() {
        index[match_strip(x)] = i;
    }
    index
}

/// Estimate the relative offset of `a` and `b` and trim both to the overlap.
///
/// `max_offset` bounds the offsets allowed to vote; `0` means unbounded.
/// Prefixes are scanned in ascending order and the first offset to reach the
/// highest count wins ties.
///
/// When no prefix votes, the offset is reported as `-b.len()`, which trims
/// `b` to nothing.
pub fn align<'a>(a: &'a [u32], b: &'a [u32], max_offset: u32) -> Alignment<'a> {
    let a_index = strip_index(a);
    let b_index = strip_index(b);

    let bias = b.len() as i64;
    let max_offset = i64::from(max_offset);
    let mut histogram = vec![0u32; a.len() + b.len() + 1];

    let mut votes = 0u32;
    let mut top_slot = 0usize;

    for (&ia, &ib) in a_index.iter().zip(&b_index) {
        if ia == 0 || ib == 0 {
            continue;
        }
        let offset = ia as i64 - ib as i64;
        if max_offset != 0 && !(-max_offset..=max_offset).contains(&offset) {
            continue;
        }
        let slot = (offset + bias) as usize;
        histogram[slot] += 1;
        if histogram[slot] > votes {
            votes = histogram[slot];
            top_slot = slot;
        }
    }

    let offset = top_slot as i64 - bias;
    trace!(target: "align", offset, votes, "offset histogram resolved");

    let (a, b) = if offset < 0 {
        let skip = (offset.unsigned_abs() as usize).min(b.len());
        (a, &b[skip..])
    } else {
        let skip = (offset as usize).min(a.len());
        (&a[skip..], b)
    };

    Alignment {
        a,
        b,
        offset,
        votes,
    }
}
