//! Page request normalization and cache keys.

use std::fmt;

/// Page number used when the requested one is below 1.
pub const DEFAULT_PAGE_NUMBER: i64 = 1;
/// Page size used when the requested one is below 1.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest page size ever served.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized request for one page of tickets.
///
/// Construction clamps out-of-range values, so two requests that mean the same
/// page always compare equal and share a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    /// Normalize raw pagination input.
    ///
    /// - `page_number < 1` becomes 1
    /// - `page_size < 1` becomes 20
    /// - `page_size > 100` becomes 100
    pub fn new(page_number: i64, page_size: i64) -> Self {
        let page_number = if page_number < 1 {
            DEFAULT_PAGE_NUMBER
        } else {
            page_number
        };

        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };

        Self {
            page_number,
            page_size,
        }
    }

    /// Build from optional query values, falling back to the defaults.
    pub fn from_optional(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        Self::new(
            page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of tickets before this page in id order.
    pub fn skip(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Maximum number of tickets on this page.
    pub fn take(&self) -> i64 {
        self.page_size
    }

    pub fn key(&self) -> PageKey {
        PageKey(*self)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

/// Cache key for one normalized page.
///
/// Wraps the normalized pair itself, so keys collide only for identical pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey(PageRequest);

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tickets_page_{}_size_{}",
            self.0.page_number, self.0.page_size
        )
    }
}
