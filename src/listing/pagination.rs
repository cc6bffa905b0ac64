use crate::api::PageRequest;

/// Zero-based page cursor over a server-paginated collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total_elements: u64,
}

impl Pagination {
    /// A page size of 0 is clamped to 1
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            total_elements: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// `ceil(total_elements / page_size)`
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_elements.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Record the total reported by the latest fetch
    pub fn set_total_elements(&mut self, total_elements: u64) {
        self.total_elements = total_elements;
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    /// Step back one page; returns false at the first page
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Step forward one page; returns false at the last page
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Jump straight to `page`. Page 0 is always reachable; any other page
    /// must be below `total_pages`. Returns false and stays put otherwise.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page != 0 && page >= self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}
