// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// The offset window does not fit inside one of the fingerprints.
    #[error("input arrays must be longer than offset (max offset {max_offset}, lengths {len_a} and {len_b})")]
    InvalidArgument {
        max_offset: u32,
        len_a: usize,
        len_b: usize,
    },

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),
}
