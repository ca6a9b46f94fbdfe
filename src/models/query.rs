const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// A 1-based page request. Missing values fall back to page 1 with 10
/// rows; zero is clamped to 1 so the offset and page-count math cannot
/// divide by zero.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).max(1),
        }
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total match count, independent of
/// pagination.
#[derive(Debug, Clone)]
pub struct Page<T> {
    data: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
    page_count: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page(),
            limit: request.limit(),
            page_count: total.div_ceil(request.limit() as u64) as u32,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    pub const fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            page_count: self.page_count,
        }
    }
}
