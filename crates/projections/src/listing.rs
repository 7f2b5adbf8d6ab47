//! Paginated listing shared by every collection.
//!
//! A listing matches the whole collection, buckets it with its total count
//! and returns one window of the bucket. An empty collection has no bucket,
//! so its page carries no total.

use std::ops::Range;
use std::time::Duration;

use document_store::{Document, DocumentStore, DocumentStoreExt, Filter, with_deadline};
use serde::Serialize;

use crate::Result;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
    pub start_index: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    /// Window for a 1-based page. Zero values fall back to the defaults.
    pub fn new(page: u64, page_size: u64) -> Self {
        let page = if page == 0 { Self::DEFAULT_PAGE } else { page };
        let page_size = if page_size == 0 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            page,
            page_size,
            start_index: (page - 1).saturating_mul(page_size),
        }
    }

    /// Builds a window from raw query parameters.
    ///
    /// A missing, non-numeric or non-positive page becomes 1 and a missing,
    /// non-numeric or non-positive page size becomes 10. A start index that
    /// parses as a non-negative integer replaces the computed one.
    pub fn parse(page: Option<&str>, page_size: Option<&str>, start_index: Option<&str>) -> Self {
        let request = Self::new(
            parse_positive(page).unwrap_or(Self::DEFAULT_PAGE),
            parse_positive(page_size).unwrap_or(Self::DEFAULT_PAGE_SIZE),
        );
        match start_index.and_then(|s| s.trim().parse::<u64>().ok()) {
            Some(start_index) => request.starting_at(start_index),
            None => request,
        }
    }

    /// Overrides the computed start index.
    pub fn starting_at(mut self, start_index: u64) -> Self {
        self.start_index = start_index;
        self
    }

    /// The slice of a `len`-long collection this window covers.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = usize::try_from(self.start_index).unwrap_or(usize::MAX).min(len);
        let size = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        start..start.saturating_add(size).min(len)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_PAGE_SIZE)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
}

/// One window of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<D> {
    /// Size of the whole collection; absent when the collection is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    pub items: Vec<D>,
}

impl<D> Page<D> {
    /// Buckets a materialized collection and keeps the requested window.
    pub fn from_bucket(mut all: Vec<D>, request: &PageRequest) -> Self {
        if all.is_empty() {
            return Self {
                total_count: None,
                items: Vec::new(),
            };
        }

        let total = all.len() as u64;
        let window = request.window(all.len());
        Self {
            total_count: Some(total),
            items: all.drain(window).collect(),
        }
    }
}

/// Lists any collection one page at a time.
pub struct Paginator<S: DocumentStore> {
    store: S,
    deadline: Duration,
}

impl<S: DocumentStore> Paginator<S> {
    pub fn new(store: S, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Returns one page of the entities in `D`'s collection, in insertion order.
    #[tracing::instrument(skip(self), fields(collection = D::COLLECTION.name()))]
    pub async fn list_page<D: Document>(&self, request: &PageRequest) -> Result<Page<D>> {
        let all = with_deadline(
            "list_page",
            self.deadline,
            self.store.find::<D>(&Filter::all()),
        )
        .await?;

        metrics::counter!("pages_listed", "collection" => D::COLLECTION.name()).increment(1);
        tracing::debug!(total = all.len(), "collection materialized");

        Ok(Page::from_bucket(all, request))
    }
}
