//! Small parsers for the structured identifiers used throughout a model.
//!
//! Residue and small-molecule IDs are a chain letter followed by a sequence number
//! (`"A12"`), complex IDs grow an iteration suffix when duplicated (`"X1_2"`), and chain IDs
//! are allocated from single uppercase letters.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Splits an ID into its leading non-digit prefix and trailing numeric suffix.
///
/// `"A12"` becomes `("A", 12)` and `"500"` becomes `("", 500)`. IDs whose prefix contains a
/// digit, or that have no numeric suffix, return `None`.
pub fn split_numeric_suffix(id: &str) -> Option<(&str, u64)> {
    let prefix = id.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &id[prefix.len()..];
    if digits.is_empty() || prefix.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((prefix, digits.parse().ok()?))
}

/// Splits `"<prefix>_<n>"` into `(prefix, n)`; the prefix must be non-empty.
pub fn split_iteration_suffix(id: &str) -> Option<(&str, u64)> {
    let (prefix, suffix) = id.rsplit_once('_')?;
    if prefix.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((prefix, suffix.parse().ok()?))
}

/// The first `"<prefix><n>"` not taken, counting upward from the numeric suffix of `id`.
///
/// Returns `None` if `id` has no `<non-digit prefix><digits>` shape.
pub fn next_numbered_id(id: &str, is_taken: impl Fn(&str) -> bool) -> Option<String> {
    let (prefix, mut number) = split_numeric_suffix(id)?;
    loop {
        let candidate = format!("{prefix}{number}");
        if !is_taken(&candidate) {
            return Some(candidate);
        }
        number += 1;
    }
}

/// The next free iteration of `id`.
///
/// An ID already ending in `_<n>` keeps its prefix and counts upward from `n`. Any other ID
/// gets `_1`, or the first free `_<n>` after it.
pub fn next_iteration_id(id: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let (prefix, mut iteration) = split_iteration_suffix(id).unwrap_or((id, 1));
    loop {
        let candidate = format!("{prefix}_{iteration}");
        if !is_taken(&candidate) {
            return candidate;
        }
        iteration += 1;
    }
}

/// The first single uppercase letter, from `A` to `Z`, that is not taken.
pub fn next_chain_letter(is_taken: impl Fn(&str) -> bool) -> Option<String> {
    ('A'..='Z')
        .map(String::from)
        .find(|candidate| !is_taken(candidate))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Residue ID '{0}' is not a chain identifier followed by a sequence number")]
pub struct ParseResidueLabelError(pub String);

/// A residue ID decomposed into chain identifier, sequence number and insertion code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueLabel {
    pub chain: String,
    pub number: i64,
    pub insert_code: Option<char>,
}

impl ResidueLabel {
    pub fn new(chain: &str, number: i64, insert_code: Option<char>) -> Self {
        Self {
            chain: chain.to_string(),
            number,
            insert_code,
        }
    }

    /// The same residue position on another chain.
    pub fn with_chain(&self, chain: &str) -> Self {
        Self {
            chain: chain.to_string(),
            ..self.clone()
        }
    }
}

impl FromStr for ResidueLabel {
    type Err = ParseResidueLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseResidueLabelError(s.to_string());
        let bytes = s.as_bytes();
        let number_start = (0..bytes.len())
            .find(|&i| {
                bytes[i].is_ascii_digit()
                    || (bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
            })
            .ok_or_else(err)?;

        let chain = &s[..number_start];
        let rest = &s[number_start..];
        let digits_end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        let number: i64 = rest[..digits_end].parse().map_err(|_| err())?;

        let mut tail = rest[digits_end..].chars();
        let insert_code = tail.next();
        if tail.next().is_some() || insert_code.is_some_and(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        Ok(Self {
            chain: chain.to_string(),
            number,
            insert_code,
        })
    }
}

impl fmt::Display for ResidueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain, self.number)?;
        if let Some(code) = self.insert_code {
            write!(f, "{code}")?;
        }
        Ok(())
    }
}
