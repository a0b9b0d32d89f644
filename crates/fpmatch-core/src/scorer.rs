// SPDX-License-Identifier: GPL-3.0-or-later

//! Bit-error similarity of two aligned fingerprints.
//!
//! The overlap is compared as 64-bit blocks (pairs of sub-fingerprints). The
//! result is scaled by how much of the shorter input the overlap covers and,
//! for repetitive material such as silence or noise, pushed down by a power
//! curve driven by the number of distinct prefixes.

use tracing::debug;

use crate::aligner::{match_strip, STRIP_SIZE};

/// An alignment needs at least this many votes per distinct prefix.
const MIN_VOTE_RATIO: f64 = 0.02;

/// Number of distinct alignment prefixes in `fingerprint`.
///
/// Uniqueness is counted over the same 14-bit prefix that alignment uses.
pub(crate) fn count_unique(fingerprint: &[u32]) -> usize {
    let mut seen = vec![false; STRIP_SIZE];
    fingerprint
        .iter()
        .filter(|&&x| !std::mem::replace(&mut seen[match_strip(x)], true))
        .count()
}

fn diversity(unique: usize, raw_len: usize) -> f64 {
    ((unique + 10) as f64 / raw_len as f64 + 0.5).clamp(0.0, 1.0)
}

#[inline]
fn block(pair: &[u32]) -> u64 {
    u64::from(pair[0]) | (u64::from(pair[1]) << 32)
}

/// Hamming distance over the first `blocks` 64-bit blocks of `a` and `b`.
fn bit_error(a: &[u32], b: &[u32], blocks: usize) -> u32 {
    a.chunks_exact(2)
        .zip(b.chunks_exact(2))
        .take(blocks)
        .map(|(x, y)| (block(x) ^ block(y)).count_ones())
        .sum()
}

/// Similarity in `[0, 1]` of two fingerprints already trimmed to their overlap.
///
/// `votes` is the histogram count behind the alignment, `raw_len_a` and
/// `raw_len_b` the lengths before trimming. Degenerate input (no full block
/// of overlap, or a too weakly supported alignment) scores `0.0`.
pub fn score(a: &[u32], b: &[u32], votes: u32, raw_len_a: usize, raw_len_b: usize) -> f32 {
    let min_size = raw_len_a.min(raw_len_b) & !1;
    let size = a.len().min(b.len()) / 2;
    if size == 0 || min_size == 0 {
        debug!(target: "score", size, min_size, "no overlap to compare");
        return 0.0;
    }

    let unique_a = count_unique(a);
    let unique_b = count_unique(b);
    let diversity = diversity(unique_a, raw_len_a).min(diversity(unique_b, raw_len_b));

    if f64::from(votes) < unique_a.max(unique_b) as f64 * MIN_VOTE_RATIO {
        debug!(
            target: "score",
            votes,
            unique_a,
            unique_b,
            "alignment rejected: too few votes"
        );
        return 0.0;
    }

    let errors = bit_error(a, b, size);
    let coverage = size as f64 * 2.0 / min_size as f64;
    let mut score = coverage * (1.0 - 2.0 * f64::from(errors) / (64 * size) as f64);
    score = score.max(0.0);
    if diversity < 1.0 {
        score = score.powf(8.0 - 7.0 * diversity);
    }

    debug!(
        target: "score",
        size,
        errors,
        diversity,
        score,
        "fingerprints scored"
    );
    score as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varied(len: u32) -> Vec<u32> {
        (0..len).map(|i| ((i * 37 + 11) << 18) | i).collect()
    }

    #[test]
    fn test_count_unique_uses_fourteen_bits() {
        // differ only in bits 16 and 17, below the 14-bit prefix
        assert_eq!(count_unique(&[1 << 16, 1 << 17]), 1);
        assert_eq!(count_unique(&[1 << 18, 1 << 19, 1 << 18]), 2);
        assert_eq!(count_unique(&[]), 0);
    }

    #[test]
    fn test_bit_error_compares_whole_blocks() {
        let a = [0, 0, 0];
        let b = [0b1011, 1 << 31, 0xFFFF_FFFF];
        // third word is outside the single requested block
        assert_eq!(bit_error(&a, &b, 1), 4);
    }

    #[test]
    fn test_identical_overlap_scores_one() {
        let a = varied(40);
        assert_eq!(score(&a, &a, 39, a.len(), a.len()), 1.0);
    }

    #[test]
    fn test_single_element_scores_zero() {
        assert_eq!(score(&[7], &[7], 1, 1, 1), 0.0);
    }

    #[test]
    fn test_empty_overlap_scores_zero() {
        let a = varied(10);
        assert_eq!(score(&a, &[], 5, 10, 10), 0.0);
    }

    #[test]
    fn test_weak_alignment_is_rejected() {
        let a = varied(200);
        // 200 distinct prefixes need about 4 votes
        assert_eq!(score(&a, &a, 3, a.len(), a.len()), 0.0);
        assert_eq!(score(&a, &a, 5, a.len(), a.len()), 1.0);
    }

    #[test]
    fn test_odd_tail_is_ignored() {
        let a = [1 << 20, 2 << 20, 3 << 20];
        let b = [1 << 20, 2 << 20, 0xFFFF_FFFF];
        assert_eq!(score(&a, &b, 1, 3, 3), 1.0);
    }

    #[test]
    fn test_partial_coverage_scales_score() {
        let a = varied(20);
        // overlap of 10 out of a minimum raw length of 20
        let s = score(&a[..10], &a[..10], 9, 20, 20);
        assert!((s - 0.5).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn test_low_diversity_is_penalized() {
        let a = vec![5 << 18; 100];
        let b: Vec<u32> = a.iter().map(|x| x ^ 1).collect();

        // two flipped bits per 64-bit block
        let raw = 1.0 - 2.0 * 2.0 / 64.0;
        let diversity = 11.0 / 100.0 + 0.5;
        let expected = f64::powf(raw, 8.0 - 7.0 * diversity) as f32;

        let s = score(&a, &b, 1, a.len(), b.len());
        assert!((s - expected).abs() < 1e-5, "got {s}, expected {expected}");
        assert!(s < raw as f32);
    }

    #[test]
    fn test_inverted_content_floors_at_zero() {
        let a = varied(20);
        let b: Vec<u32> = a.iter().map(|x| !x).collect();
        assert_eq!(score(&a, &b, 19, a.len(), b.len()), 0.0);
    }
}
