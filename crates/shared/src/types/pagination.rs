//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// First page with the given page size.
    #[must_use]
    pub const fn first(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }

    /// The page after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }

    /// Returns true when a page with `fetched` items is the final one.
    ///
    /// The backend may omit `total_pages`; a short page then marks the end.
    #[must_use]
    pub fn is_last(&self, total_pages: Option<u32>, fetched: usize) -> bool {
        if fetched == 0 {
            return true;
        }
        match total_pages {
            Some(total) if total > 0 => self.page >= total,
            _ => fetched < usize::try_from(self.per_page).unwrap_or(usize::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[test]
    fn test_next_page() {
        let request = PageRequest::first(200).next();
        assert_eq!(request.page, 2);
        assert_eq!(request.per_page, 200);
    }

    #[test]
    fn test_is_last_with_total_pages() {
        let request = PageRequest { page: 2, per_page: 200 };
        assert!(!request.is_last(Some(3), 200));
        assert!(request.next().is_last(Some(3), 10));
    }

    #[test]
    fn test_is_last_without_total_pages() {
        let request = PageRequest::first(200);
        assert!(!request.is_last(None, 200));
        assert!(request.is_last(None, 199));
    }

    #[test]
    fn test_empty_page_is_last() {
        let request = PageRequest::first(200);
        assert!(request.is_last(Some(5), 0));
        assert!(request.is_last(None, 0));
    }
}
