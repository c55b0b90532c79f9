/// Page-level state for one viewer of the directory: current filters, page cursor,
/// and a transient toast message. All transitions are pure and synchronous; the
/// surrounding surface decides when to invoke them.
use crate::filter::FilterState;
use crate::page::PageCursor;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub filters: FilterState,
    pub page: PageCursor,
    pub toast: Option<String>,
}

impl Session {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            page: PageCursor::new(),
            toast: None,
        }
    }

    /// Derive a session from a raw query string: recognized filter keys plus an
    /// optional `page` number (malformed or missing falls back to page 1).
    pub fn from_query(query: &str) -> Self {
        let filters = FilterState::from_query(query);
        let page = page_param(query).map(PageCursor::at).unwrap_or_default();
        Self {
            filters,
            page,
            toast: None,
        }
    }

    /// Replace the filter state. The page cursor is left alone; it only increases.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Advance the page cursor, but only while more results exist beyond the
    /// currently visible slice.
    pub fn load_more(&mut self, result_len: usize) {
        if result_len > self.page.visible_len() {
            self.page.advance();
        }
    }

    /// Set the toast, replacing any previous one.
    pub fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    /// Dismiss the toast.
    pub fn clear_toast(&mut self) {
        self.toast = None;
    }
}

fn page_param(query: &str) -> Option<usize> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "page")
        .filter_map(|(_, value)| value.parse::<usize>().ok())
        .last()
}
