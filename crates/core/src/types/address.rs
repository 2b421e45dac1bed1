//! Bin address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`BinAddress`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AddressError {
    /// The input string is empty.
    #[error("bin address cannot be empty")]
    Empty,
    /// The input does not have the aisle-shelf-position shape.
    #[error("bin address must have the form AISLE-SHELF-POSITION (e.g. A-01-03)")]
    MalformedShape,
    /// The aisle segment is not a letter sequence.
    #[error("aisle segment must be letters (e.g. A, B, AA)")]
    InvalidAisle,
    /// The shelf segment is not a positive number.
    #[error("shelf segment must be a positive number")]
    InvalidShelf,
}

/// A human-readable bin address such as `A-01-03`.
///
/// The three dash-separated segments are the aisle (letters, `A` = aisle 1),
/// the shelf (zero-padded number, counted from the bottom), and the bin
/// position within the shelf (zero-padded number or letter, depending on the
/// zone's labeling scheme).
///
/// Addresses are stored uppercase so equality and search are
/// case-insensitive.
///
/// ## Examples
///
/// ```
/// use stockyard_core::BinAddress;
///
/// let addr = BinAddress::parse("b-02-11").unwrap();
/// assert_eq!(addr.to_string(), "B-02-11");
/// assert_eq!(addr, BinAddress::from_coords(2, 2, "11"));
/// assert!(addr.contains_ignore_case("2-1"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BinAddress(String);

impl BinAddress {
    /// Parse a `BinAddress` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, does not have three
    /// dash-separated segments, or has a non-letter aisle or non-numeric
    /// shelf segment.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let upper = trimmed.to_ascii_uppercase();
        let mut segments = upper.split('-');
        let (Some(aisle), Some(shelf), Some(position), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AddressError::MalformedShape);
        };

        if aisle.is_empty() || !aisle.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(AddressError::InvalidAisle);
        }
        if shelf.is_empty() || !shelf.chars().all(|c| c.is_ascii_digit()) {
            return Err(AddressError::InvalidShelf);
        }
        if position.is_empty() {
            return Err(AddressError::MalformedShape);
        }

        Ok(Self(upper))
    }

    /// Build an address from grid coordinates.
    ///
    /// Aisle 1 maps to `A`, aisle 27 to `AA` (spreadsheet-style). The shelf
    /// is zero-padded to two digits; numeric positions are zero-padded too,
    /// letter positions pass through unchanged.
    #[must_use]
    pub fn from_coords(aisle: u32, shelf: u32, position: &str) -> Self {
        let position = if position.chars().all(|c| c.is_ascii_digit()) {
            format!("{:0>2}", position)
        } else {
            position.to_ascii_uppercase()
        };
        Self(format!(
            "{}-{:02}-{}",
            aisle_letters(aisle),
            shelf,
            position
        ))
    }

    /// Case-insensitive substring match, used for search highlighting.
    #[must_use]
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        !needle.is_empty() && self.0.contains(&needle.trim().to_ascii_uppercase())
    }

    /// The address as a string slice (always uppercase).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spreadsheet-style aisle letters: 1 -> `A`, 26 -> `Z`, 27 -> `AA`.
#[must_use]
pub fn aisle_letters(aisle: u32) -> String {
    let mut n = aisle;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(char::from(b'A' + u8::try_from(n % 26).unwrap_or(0)));
        n /= 26;
    }
    if out.is_empty() {
        out.push('A');
    }
    out.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let addr = BinAddress::parse("A-01-03").unwrap();
        assert_eq!(addr.as_str(), "A-01-03");
    }

    #[test]
    fn test_parse_normalizes_case() {
        let addr = BinAddress::parse("c-04-0a").unwrap();
        assert_eq!(addr.to_string(), "C-04-0A");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(BinAddress::parse(""), Err(AddressError::Empty)));
        assert!(matches!(BinAddress::parse("  "), Err(AddressError::Empty)));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(BinAddress::parse("A-01").is_err());
        assert!(BinAddress::parse("A-01-03-07").is_err());
    }

    #[test]
    fn test_parse_rejects_numeric_aisle() {
        assert!(matches!(
            BinAddress::parse("1-01-03"),
            Err(AddressError::InvalidAisle)
        ));
    }

    #[test]
    fn test_parse_rejects_letter_shelf() {
        assert!(matches!(
            BinAddress::parse("A-X-03"),
            Err(AddressError::InvalidShelf)
        ));
    }

    #[test]
    fn test_from_coords_numeric() {
        assert_eq!(BinAddress::from_coords(1, 1, "3").as_str(), "A-01-03");
    }

    #[test]
    fn test_from_coords_letter_position() {
        assert_eq!(BinAddress::from_coords(2, 12, "d").as_str(), "B-12-D");
    }

    #[test]
    fn test_aisle_letters_wraps_past_z() {
        assert_eq!(aisle_letters(1), "A");
        assert_eq!(aisle_letters(26), "Z");
        assert_eq!(aisle_letters(27), "AA");
        assert_eq!(aisle_letters(28), "AB");
    }

    #[test]
    fn test_contains_ignore_case() {
        let addr = BinAddress::from_coords(1, 1, "3");
        assert!(addr.contains_ignore_case("a-01"));
        assert!(addr.contains_ignore_case("01-03"));
        assert!(!addr.contains_ignore_case("B-"));
        assert!(!addr.contains_ignore_case(""));
    }
}
