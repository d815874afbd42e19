//! Offset + limit window over a collection.

use serde::{Deserialize, Serialize};

/// Pagination parameters for collection listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Maximum number of documents to return; `None` returns the rest of the
    /// collection.
    pub limit: Option<u32>,
    /// Number of documents to skip (0-based).
    pub offset: u32,
}

impl Page {
    /// The whole collection.
    pub const ALL: Page = Page {
        limit: None,
        offset: 0,
    };

    /// Build a page from optional request parameters.
    ///
    /// An explicit `limit` is capped at `max_limit`; without one the page is
    /// unbounded.
    pub fn new(limit: Option<u32>, offset: Option<u32>, max_limit: u32) -> Self {
        Self {
            limit: limit.map(|l| l.min(max_limit)),
            offset: offset.unwrap_or(0),
        }
    }

    /// Offset of the following page, if `returned` filled this one.
    pub fn next_offset(&self, returned: usize) -> Option<u32> {
        match self.limit {
            Some(limit) if limit > 0 && returned >= limit as usize => {
                Some(self.offset.saturating_add(limit))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_opt_in_and_capped() {
        assert_eq!(Page::new(None, None, 100), Page::ALL);
        assert_eq!(Page::new(None, Some(4), 100), Page { limit: None, offset: 4 });
        assert_eq!(Page::new(Some(500), Some(7), 100), Page { limit: Some(100), offset: 7 });
    }

    #[test]
    fn next_offset_only_on_full_bounded_page() {
        let page = Page::new(Some(10), Some(20), 100);
        assert_eq!(page.next_offset(10), Some(30));
        assert_eq!(page.next_offset(9), None);
        assert_eq!(Page::new(Some(0), None, 100).next_offset(0), None);
        assert_eq!(Page::ALL.next_offset(5000), None);
    }
}
