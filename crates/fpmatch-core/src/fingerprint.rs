// SPDX-License-Identifier: GPL-3.0-or-later

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{correlate_fingerprints, score_fingerprints, Correlation, MatchError, Result};

/// Decoded Chromaprint fingerprint: one 32-bit sub-fingerprint per frame.
///
/// This is the raw form (as printed by `fpcalc -raw`), not the compressed
/// base64 string used by the AcoustID web service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Fingerprint(Vec<u32>);

impl Fingerprint {
    pub fn new(words: Vec<u32>) -> Self {
        Self(words)
    }

    /// Decode little-endian 32-bit words.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(MatchError::InvalidFingerprint(format!(
                "byte length {} is not a multiple of 4",
                bytes.len()
            )));
        }

        Ok(Self(
            bytes
                .chunks_exact(4)
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        ))
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// Parse the textual raw form.
    ///
    /// Accepts either `fpcalc -raw` output, where the values follow a
    /// `FINGERPRINT=` line among other `KEY=value` lines, or a bare list of
    /// integers separated by commas or whitespace. Older `fpcalc` builds print
    /// signed values; those are reinterpreted as unsigned.
    pub fn parse_raw(text: &str) -> Result<Self> {
        let body = text
            .lines()
            .find_map(|line| line.trim().strip_prefix("FINGERPRINT="))
            .unwrap_or(text);

        let words = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(parse_word)
            .collect::<Result<Vec<_>>>()?;

        if words.is_empty() {
            return Err(MatchError::InvalidFingerprint(
                "no sub-fingerprints found".to_string(),
            ));
        }
        Ok(Self(words))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }

    /// See [`score_fingerprints`].
    pub fn score(&self, other: &Fingerprint, max_offset: i32) -> Result<f32> {
        score_fingerprints(self, other, max_offset)
    }

    /// See [`correlate_fingerprints`].
    pub fn correlate(
        &self,
        other: &Fingerprint,
        max_offset: i32,
        threshold: f32,
    ) -> Result<Correlation> {
        correlate_fingerprints(self, other, max_offset, threshold)
    }
}

fn parse_word(token: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .or_else(|_| token.parse::<i32>().map(|v| v as u32))
        .map_err(|_| MatchError::InvalidFingerprint(format!("invalid sub-fingerprint {token:?}")))
}

impl Deref for Fingerprint {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for Fingerprint {
    fn from(words: Vec<u32>) -> Self {
        Self(words)
    }
}

impl FromIterator<u32> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_le_bytes() {
        let fp = Fingerprint::from_le_bytes(&[1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(fp.as_slice(), &[1, u32::MAX]);
    }

    #[test]
    fn test_from_le_bytes_rejects_partial_word() {
        let err = Fingerprint::from_le_bytes(&[1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, MatchError::InvalidFingerprint(_)));
    }

    #[test]
    fn test_from_le_bytes_empty() {
        let fp = Fingerprint::from_le_bytes(&[]).unwrap();
        assert!(fp.is_empty());
    }

    #[test]
    fn test_le_bytes_layout() {
        let fp = Fingerprint::new(vec![0x0403_0201]);
        assert_eq!(fp.to_le_bytes(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_fpcalc_output() {
        let text = "DURATION=183\nFINGERPRINT=3192418345,3192418089,-1102549031\n";
        let fp = Fingerprint::parse_raw(text).unwrap();
        assert_eq!(
            fp.as_slice(),
            &[3192418345, 3192418089, (-1102549031i32) as u32]
        );
    }

    #[test]
    fn test_parse_bare_list() {
        let fp = Fingerprint::parse_raw("1, 2\n3 4").unwrap();
        assert_eq!(fp.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Fingerprint::parse_raw("1,2,three").is_err());
        assert!(Fingerprint::parse_raw("DURATION=12").is_err());
        assert!(Fingerprint::parse_raw("  \n").is_err());
        assert!(Fingerprint::parse_raw("4294967296").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let fp = Fingerprint::new(vec![1, 2, 3]);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn test_methods_delegate_to_entry_points() {
        let fp: Fingerprint = (0..16u32).map(|i| (i * 97 + 5) << 18).collect();
        assert_eq!(fp.score(&fp, 0).unwrap(), 1.0);
        assert_eq!(
            fp.correlate(&fp, 4, 1.0).unwrap(),
            Correlation {
                score: 1.0,
                offset: 0
            }
        );
        assert!(fp.score(&fp, 16).is_err());
    }
}
