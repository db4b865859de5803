//! Redemption code generation.
//!
//! Codes have the user-facing format `PREFIX-YYYY-XXXX`: a configured short
//! tournament code, the 4-digit year at generation time, and four characters
//! drawn uniformly from a restricted 32-symbol alphabet. The alphabet drops
//! `I`, `O`, `0`, and `1` so captains don't misread hand-typed codes.

use std::collections::HashSet;

use chrono::{Datelike, Utc};
use rand::Rng;

/// 32-symbol code alphabet: A–Z minus I and O, plus digits 2–9.
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of the random suffix segment.
const SUFFIX_LEN: usize = 4;

/// Generator for unique, human-typable redemption codes.
///
/// Uniqueness is guaranteed only within one [`generate_many`] batch; global
/// uniqueness is enforced by the credit ledger's unique constraint at insert
/// time.
///
/// [`generate_many`]: CodeGenerator::generate_many
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    prefix: String,
}

impl CodeGenerator {
    /// Creates a generator with the given tournament prefix (e.g. `"FROG"`).
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Produces one code for the current UTC calendar year.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET.get(idx).copied().unwrap_or(b'A') as char
            })
            .collect();
        format!("{}-{}-{}", self.prefix, Utc::now().year(), suffix)
    }

    /// Produces exactly `count` pairwise-distinct codes, re-rolling on
    /// in-batch duplicates. Returns an empty vector for `count = 0`.
    ///
    /// With a 32^4 keyspace, re-rolls are vanishingly rare for realistic
    /// batch sizes (a few dozen codes per sponsor).
    #[must_use]
    pub fn generate_many(&self, count: usize) -> Vec<String> {
        let mut seen = HashSet::with_capacity(count);
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let code = self.generate();
            if seen.insert(code.clone()) {
                out.push(code);
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_expected_format() {
        let generator = CodeGenerator::new("FROG");
        let code = generator.generate();
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.first().copied(), Some("FROG"));

        let year_segment = parts.get(1).copied().unwrap_or_default();
        assert_eq!(year_segment.len(), 4);
        let year: i32 = year_segment.parse().ok().unwrap_or(0);
        assert_eq!(year, Utc::now().year());

        let suffix = parts.get(2).copied().unwrap_or_default();
        assert_eq!(suffix.len(), 4);
        for c in suffix.bytes() {
            assert!(CODE_ALPHABET.contains(&c), "unexpected char {}", c as char);
        }
    }

    #[test]
    fn suffix_never_contains_ambiguous_chars() {
        let generator = CodeGenerator::new("FROG");
        for _ in 0..200 {
            let code = generator.generate();
            let suffix = code.split('-').nth(2).unwrap_or_default();
            for c in suffix.chars() {
                assert!(c != 'I' && c != 'O' && c != '0' && c != '1');
            }
        }
    }

    #[test]
    fn generate_many_returns_distinct_codes() {
        let generator = CodeGenerator::new("FROG");
        let codes = generator.generate_many(100);
        assert_eq!(codes.len(), 100);
        let unique: HashSet<&String> = codes.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn generate_many_zero_is_empty() {
        let generator = CodeGenerator::new("FROG");
        assert!(generator.generate_many(0).is_empty());
    }

    #[test]
    fn prefix_is_configurable() {
        let generator = CodeGenerator::new("OPEN");
        assert!(generator.generate().starts_with("OPEN-"));
    }
}
