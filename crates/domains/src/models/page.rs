use serde::{Deserialize, Serialize};

/// Largest page size a listing will honour.
pub const MAX_PAGE_SIZE: u32 = 100;

/// 1-based pagination with an optional free-text filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl PageRequest {
    /// Clamps out-of-range input instead of rejecting it: page 0 reads
    /// as page 1 and page sizes are bounded to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32, search: Option<String>) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            search: search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10, None)
    }
}

/// One page of results plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self, page_size: u32) -> u64 {
        self.total_count.div_ceil(u64::from(page_size.max(1)))
    }
}
