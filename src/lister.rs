use std::collections::{BTreeSet, HashSet};

use anyhow::Context as _;

use crate::formats::Record;
use crate::store::RecordStore;
use crate::text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingStats {
    pub total: usize,
    pub available_for_download: usize,
}

/// Records of one area, sorted by title, plus the local search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaListing {
    pub area: String,
    records: Vec<Record>,
    pub filter: String,
}

/// One row of the rendered listing, with session flags merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedItem<'a> {
    pub record: &'a Record,
    pub is_read: bool,
    pub is_favorite: bool,
    pub is_highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView<'a> {
    /// The area has no records at all.
    NoBooks,
    /// The area has records; `items` may be empty when the filter excludes everything.
    Items(Vec<ListedItem<'a>>),
}

/// Session state the listing reads at render time.
#[derive(Debug, Clone, Copy)]
pub struct RenderFlags<'a> {
    pub read: &'a HashSet<u64>,
    pub favorites: &'a BTreeSet<u64>,
    pub highlighted: Option<u64>,
}

impl AreaListing {
    /// Takes records in any order; the title order is applied here.
    pub fn new(area: impl Into<String>, mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| text::title_cmp(&a.title, &b.title));
        Self {
            area: area.into(),
            records,
            filter: String::new(),
        }
    }

    pub async fn fetch(store: &dyn RecordStore, area: &str) -> anyhow::Result<Self> {
        let records = store
            .list_by_area(area)
            .await
            .context("fetch area listing")?;
        tracing::debug!(area, records = records.len(), "fetched area listing");
        Ok(Self::new(area, records))
    }

    pub fn stats(&self) -> ListingStats {
        ListingStats {
            total: self.records.len(),
            available_for_download: self.records.iter().filter(|r| r.has_download()).count(),
        }
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn find(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records matching the current filter on title or author.
    pub fn filtered(&self) -> Vec<&Record> {
        let needle = text::fold(&self.filter);
        self.records
            .iter()
            .filter(|record| {
                needle.is_empty()
                    || text::contains_folded(&record.title, &needle)
                    || text::contains_folded(&record.author, &needle)
            })
            .collect()
    }

    pub fn render(&self, flags: RenderFlags<'_>) -> ListingView<'_> {
        if self.records.is_empty() {
            return ListingView::NoBooks;
        }
        let items = self
            .filtered()
            .into_iter()
            .map(|record| ListedItem {
                record,
                is_read: flags.read.contains(&record.id),
                is_favorite: flags.favorites.contains(&record.id),
                is_highlighted: flags.highlighted == Some(record.id),
            })
            .collect();
        ListingView::Items(items)
    }
}
