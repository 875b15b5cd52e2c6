use super::data::{pad_gallery, CatalogQuery, ClothingItem, GalleryCell};
use crate::api::ApiError;

/// A refresh that has been issued but not yet applied.
///
/// The sequence number identifies the request so a late response can be
/// recognized and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub seq: u64,
    /// Snapshot of the query at issue time
    pub query: CatalogQuery,
}

/// Keeps the item snapshot consistent with the remote collection under the
/// current search term and category filter.
///
/// The controller owns `{items, query}` exclusively; every mutation happens
/// through the methods below, so no synchronization is needed.
#[derive(Debug, Default)]
pub struct CatalogController {
    items: Vec<ClothingItem>,
    query: CatalogQuery,
    /// Sequence number of the most recently issued fetch
    issued: u64,
    last_error: Option<ApiError>,
}

impl CatalogController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current item snapshot
    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// The failure recorded by the last applied fetch, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Replace the search term and issue a refresh.
    pub fn set_search(&mut self, text: String) -> FetchTicket {
        self.query.search = text;
        self.begin_refresh()
    }

    /// Replace the active category and issue a refresh.
    ///
    /// `None` clears the constraint (the "All" reset); any other label is
    /// lowercased before it is stored. Re-selecting the active category is
    /// harmless.
    pub fn set_filter(&mut self, selection: Option<&str>) -> FetchTicket {
        self.query.category = selection.map(|label| label.to_lowercase());
        self.begin_refresh()
    }

    /// Issue a new fetch against the current query.
    ///
    /// Every ticket supersedes all earlier ones; whoever performs the fetch
    /// hands the ticket's sequence number back to `apply_fetch`.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Apply a completed fetch. Returns whether the result was accepted.
    ///
    /// A response whose sequence number is not the latest issued is
    /// discarded, so an out-of-order late response can never overwrite a
    /// newer snapshot. On failure the previous items are retained; a blank
    /// screen helps nobody, stale data with a visible error does.
    pub fn apply_fetch(
        &mut self,
        seq: u64,
        result: Result<Vec<ClothingItem>, ApiError>,
    ) -> bool {
        if seq != self.issued {
            log::debug!("discarding stale fetch #{seq}, latest is #{}", self.issued);
            return false;
        }

        match result {
            Ok(items) => {
                self.items = items;
                self.last_error = None;
            }
            Err(error) => {
                self.last_error = Some(error);
            }
        }
        true
    }

    /// Render-ready cell sequence for the two-column gallery.
    pub fn gallery_cells(&self) -> Vec<GalleryCell> {
        pad_gallery(&self.items)
    }
}
