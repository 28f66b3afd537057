//! ISBN normalization and checksum validation.
//!
//! Scanners and manual entry produce ISBNs with hyphens, spaces, or a
//! lowercase `x` check digit. Everything stored in the `books` table goes
//! through [`normalize_isbn`] first, so the unique constraint on `isbn`
//! compares canonical forms.

use crate::error::CoreError;

/// Length of an ISBN-10 after normalization.
pub const ISBN10_LEN: usize = 10;

/// Length of an ISBN-13 after normalization.
pub const ISBN13_LEN: usize = 13;

/// Normalize a raw ISBN into its canonical form.
///
/// Strips spaces and hyphens, uppercases an `x` check digit, then checks the
/// length and checksum. Returns the canonical string on success.
pub fn normalize_isbn(raw: &str) -> Result<String, CoreError> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        return Err(CoreError::Validation("ISBN must not be empty".into()));
    }

    let valid = match cleaned.len() {
        ISBN10_LEN => is_valid_isbn10(&cleaned),
        ISBN13_LEN => is_valid_isbn13(&cleaned),
        other => {
            return Err(CoreError::Validation(format!(
                "ISBN must have 10 or 13 characters, got {other}"
            )))
        }
    };

    if !valid {
        return Err(CoreError::Validation(format!(
            "Invalid ISBN checksum: '{cleaned}'"
        )));
    }
    Ok(cleaned)
}

/// Validate an ISBN-10: nine digits followed by a digit or `X`, weighted
/// sum divisible by 11.
pub fn is_valid_isbn10(value: &str) -> bool {
    if value.len() != ISBN10_LEN {
        return false;
    }
    let mut sum = 0u32;
    for (index, ch) in value.chars().enumerate() {
        let digit = match (index, ch) {
            (9, 'X') => 10,
            (_, c) => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += digit * (10 - index as u32);
    }
    sum % 11 == 0
}

/// Validate an ISBN-13: thirteen digits, alternating 1/3 weights, sum
/// divisible by 10.
pub fn is_valid_isbn13(value: &str) -> bool {
    if value.len() != ISBN13_LEN {
        return false;
    }
    let mut sum = 0u32;
    for (index, ch) in value.chars().enumerate() {
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };
        sum += if index % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}
