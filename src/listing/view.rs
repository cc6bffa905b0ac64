use crate::api::{BrokerageApi, PageRequest};
use crate::error::Result;
use crate::listing::filter::ListingFilter;
use crate::listing::pagination::Pagination;
use crate::models::{Page, Property};
use tracing::{debug, info};

/// Handle for one in-flight page fetch.
///
/// Only the ticket from the most recent [`ListingView::begin_fetch`] may
/// land; older tickets are stale and their results are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub request: PageRequest,
}

/// Listings page state: filters, page cursor and the fetched page
#[derive(Debug, Clone)]
pub struct ListingView {
    filter: ListingFilter,
    pagination: Pagination,
    fetched: Vec<Property>,
    generation: u64,
}

impl ListingView {
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: ListingFilter::default(),
            pagination: Pagination::new(page_size),
            fetched: Vec::new(),
            generation: 0,
        }
    }

    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Change the filters. Any actual change moves back to page 0 and
    /// returns true, meaning page 0 must be fetched again.
    pub fn update_filter(&mut self, change: impl FnOnce(&mut ListingFilter)) -> bool {
        let before = self.filter.clone();
        change(&mut self.filter);
        if self.filter == before {
            return false;
        }
        debug!("Filter changed, resetting to page 0");
        self.pagination.reset();
        self.supersede();
        true
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        self.update_filter(|f| f.search = term)
    }

    /// Advance one page; returns true when a fetch is needed
    pub fn next_page(&mut self) -> bool {
        let moved = self.pagination.next();
        if moved {
            self.supersede();
        }
        moved
    }

    /// Go back one page; returns true when a fetch is needed
    pub fn previous_page(&mut self) -> bool {
        let moved = self.pagination.previous();
        if moved {
            self.supersede();
        }
        moved
    }

    /// Jump to a page within the known total; returns true when a fetch is
    /// needed
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == self.pagination.page() {
            return false;
        }
        let moved = self.pagination.go_to(page);
        if moved {
            self.supersede();
        }
        moved
    }

    /// Start fetching the current page, invalidating any earlier fetch
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.supersede();
        FetchTicket {
            generation: self.generation,
            request: self.pagination.request(),
        }
    }

    /// Apply a fetched page if its ticket is still current. Returns false
    /// when the result was stale and discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, page: Page<Property>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale page {} (generation {} < {})",
                ticket.request.page, ticket.generation, self.generation
            );
            return false;
        }
        self.pagination.set_total_elements(page.total_elements);
        self.fetched = page.content;
        true
    }

    /// Fetch the current page and apply it
    pub async fn refresh(&mut self, api: &dyn BrokerageApi) -> Result<()> {
        let ticket = self.begin_fetch();
        let page = api.list_properties(ticket.request).await?;
        info!(
            "Fetched {} properties (page {}, {} total)",
            page.content.len(),
            ticket.request.page,
            page.total_elements
        );
        self.complete_fetch(ticket, page);
        Ok(())
    }

    /// The fetched page before filtering
    pub fn fetched(&self) -> &[Property] {
        &self.fetched
    }

    /// Properties on the current page accepted by every active filter
    pub fn visible(&self) -> Vec<&Property> {
        self.filter.apply(&self.fetched)
    }

    fn supersede(&mut self) {
        self.generation += 1;
    }
}
