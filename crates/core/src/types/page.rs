//! Page identity and navigation bounds

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static navigation bounds of the Mushaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBounds {
    pub min: u16,
    pub max: u16,
}

impl NavigationBounds {
    /// The 604-page Madani Mushaf layout
    pub const MUSHAF: Self = Self { min: 1, max: 604 };

    /// Returns true if `page` lies within the bounds
    pub fn contains(&self, page: i64) -> bool {
        page >= i64::from(self.min) && page <= i64::from(self.max)
    }
}

/// A page of the Mushaf, always within [`NavigationBounds::MUSHAF`]
///
/// The same number identifies both the page image and its recitation track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct PageNumber(u16);

impl PageNumber {
    pub const FIRST: Self = Self(NavigationBounds::MUSHAF.min);
    pub const LAST: Self = Self(NavigationBounds::MUSHAF.max);

    /// Creates a page number, rejecting values outside the Mushaf
    pub fn new(page: i64) -> Result<Self> {
        let bounds = NavigationBounds::MUSHAF;
        if bounds.contains(page) {
            Ok(Self(page as u16))
        } else {
            Err(AppError::PageOutOfRange {
                page,
                min: bounds.min,
                max: bounds.max,
            })
        }
    }

    /// Parses a route parameter leniently
    ///
    /// Only the leading run of digits counts ("12abc" and "12.5" open page 12).
    /// No digits, zero or a negative number open the first page; anything
    /// past the end opens the last page.
    pub fn from_route_param(param: &str) -> Self {
        let trimmed = param.trim_start();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits_end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        let digits = &unsigned[..digits_end];

        if negative || digits.is_empty() {
            return Self::FIRST;
        }

        let max = NavigationBounds::MUSHAF.max;
        match digits.parse::<u64>() {
            Ok(0) => Self::FIRST,
            Ok(n) => Self(n.min(u64::from(max)) as u16),
            // more digits than fit in a u64 is still past the end
            Err(_) => Self::LAST,
        }
    }

    /// Returns the raw page number
    pub fn get(&self) -> u16 {
        self.0
    }

    /// The following page, or `None` on the last page
    pub fn next(&self) -> Option<Self> {
        (self.0 < NavigationBounds::MUSHAF.max).then(|| Self(self.0 + 1))
    }

    /// The preceding page, or `None` on the first page
    pub fn previous(&self) -> Option<Self> {
        (self.0 > NavigationBounds::MUSHAF.min).then(|| Self(self.0 - 1))
    }

    /// Zero-padded three digit form used for asset names ("007")
    pub fn padded(&self) -> String {
        format!("{:03}", self.0)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for PageNumber {
    type Error = AppError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(i64::from(value))
    }
}

impl From<PageNumber> for u16 {
    fn from(page: PageNumber) -> Self {
        page.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_bounds() {
        assert_eq!(PageNumber::new(1).unwrap(), PageNumber::FIRST);
        assert_eq!(PageNumber::new(604).unwrap(), PageNumber::LAST);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(PageNumber::new(0).is_err());
        assert!(PageNumber::new(605).is_err());
        assert!(PageNumber::new(-3).is_err());
    }

    #[test]
    fn test_padded() {
        assert_eq!(PageNumber::new(7).unwrap().padded(), "007");
        assert_eq!(PageNumber::new(42).unwrap().padded(), "042");
        assert_eq!(PageNumber::new(604).unwrap().padded(), "604");
    }

    #[test]
    fn test_next_and_previous_at_edges() {
        assert_eq!(PageNumber::LAST.next(), None);
        assert_eq!(PageNumber::FIRST.previous(), None);
        assert_eq!(PageNumber::FIRST.next().map(|p| p.get()), Some(2));
        assert_eq!(PageNumber::LAST.previous().map(|p| p.get()), Some(603));
    }

    #[test]
    fn test_route_param_parsing() {
        assert_eq!(PageNumber::from_route_param("12").get(), 12);
        assert_eq!(PageNumber::from_route_param(" 3 ").get(), 3);
        assert_eq!(PageNumber::from_route_param("abc"), PageNumber::FIRST);
        assert_eq!(PageNumber::from_route_param("0"), PageNumber::FIRST);
        assert_eq!(PageNumber::from_route_param("-5"), PageNumber::FIRST);
        assert_eq!(PageNumber::from_route_param("9999"), PageNumber::LAST);
    }

    #[test]
    fn test_route_param_takes_leading_digits() {
        assert_eq!(PageNumber::from_route_param("12abc").get(), 12);
        assert_eq!(PageNumber::from_route_param("12.5").get(), 12);
        assert_eq!(PageNumber::from_route_param("+7").get(), 7);
        assert_eq!(PageNumber::from_route_param("  40 pages").get(), 40);
        assert_eq!(PageNumber::from_route_param("abc12"), PageNumber::FIRST);
        assert_eq!(PageNumber::from_route_param("-12abc"), PageNumber::FIRST);
        assert_eq!(PageNumber::from_route_param("0x10"), PageNumber::FIRST);
        assert_eq!(
            PageNumber::from_route_param("123456789012345678901234567890"),
            PageNumber::LAST
        );
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let ok: PageNumber = serde_json::from_str("50").unwrap();
        assert_eq!(ok.get(), 50);
        assert!(serde_json::from_str::<PageNumber>("0").is_err());
        assert!(serde_json::from_str::<PageNumber>("700").is_err());
    }
}
