//! Pagination Value Objects
//!
//! Offset/limit requests and the page they produce. The API layer maps
//! these 1:1 onto its query parameters and response envelopes.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not specify one
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Hard cap on page size; larger requests are clamped
pub const MAX_PAGE_LIMIT: usize = 500;

/// An offset/limit slice request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of items to skip
    pub offset: usize,
    /// Maximum number of items to return
    pub limit: usize,
}

impl PageRequest {
    /// First page with the given limit (clamped to [`MAX_PAGE_LIMIT`])
    pub fn first(limit: usize) -> Self {
        Self::at(0, limit)
    }

    /// Page at an offset with the given limit (clamped)
    pub fn at(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.min(MAX_PAGE_LIMIT),
        }
    }

    /// Slice a fully-materialized result set into this page. The limit
    /// is clamped to [`MAX_PAGE_LIMIT`] even when the request was built
    /// with struct literal syntax; the page echoes the effective limit.
    pub fn slice<T>(&self, mut items: Vec<T>) -> Page<T> {
        let limit = self.limit.min(MAX_PAGE_LIMIT);
        let total = items.len();
        let end = self.offset.saturating_add(limit).min(total);
        let start = self.offset.min(total);
        let items = items.drain(start..end).collect();
        Page {
            items,
            total,
            offset: self.offset,
            limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results plus enough shape to build pagination links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: usize,
    /// Offset this page was cut at
    pub offset: usize,
    /// Limit this page was cut with
    pub limit: usize,
}

impl<T> Page<T> {
    /// Whether more items exist past this page
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.items.len()) < self.total
    }

    /// An empty page for the given request
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            offset: request.offset,
            limit: request.limit.min(MAX_PAGE_LIMIT),
        }
    }
}
