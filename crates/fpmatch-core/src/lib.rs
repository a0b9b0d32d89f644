// SPDX-License-Identifier: GPL-3.0-or-later

//! Comparison of Chromaprint-style acoustic fingerprints.
//!
//! A fingerprint is a sequence of 32-bit sub-fingerprints, one per audio
//! frame. This crate provides two independent ways of comparing a pair:
//!
//! - [`score_fingerprints`]: estimates the relative offset with a voting
//!   histogram ([`aligner`]) and scores the aligned overlap by bit error,
//!   penalizing repetitive content ([`scorer`]).
//! - [`correlate_fingerprints`]: scans every offset in a window and keeps the
//!   best raw bitwise correlation, stopping early at a threshold
//!   ([`correlator`]).
//!
//! Both are pure functions; nothing is cached between calls.

pub mod aligner;
pub mod compare;
pub mod correlator;
pub mod error;
pub mod fingerprint;
pub mod scorer;

pub use aligner::{align, Alignment};
pub use compare::{correlate_fingerprints, score_fingerprints};
pub use correlator::Correlation;
pub use error::{MatchError, Result};
pub use fingerprint::Fingerprint;
