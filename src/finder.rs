use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::formats::Record;
use crate::store::{RecordStore, SEARCH_LIMIT};

pub const DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub record: Record,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderResponse {
    pub seq: u64,
    pub query: String,
    pub hits: Vec<SearchHit>,
}

/// One store lookup, without debouncing.
pub async fn lookup(store: &dyn RecordStore, query: &str) -> anyhow::Result<Vec<SearchHit>> {
    let records = store
        .search(query, SEARCH_LIMIT)
        .await
        .context("global search")?;
    Ok(records
        .into_iter()
        .map(|record| SearchHit {
            area: record.area.clone().unwrap_or_default(),
            record,
        })
        .collect())
}

/// Debounced catalog-wide search box.
///
/// Every input bumps `seq` and restarts the timer; a response is applied
/// only if its `seq` is still the latest, so a slow lookup for an older
/// query can never overwrite newer results.
pub struct GlobalFinder {
    store: Arc<dyn RecordStore>,
    responses: mpsc::UnboundedSender<FinderResponse>,
    query: String,
    seq: u64,
    pending: Option<JoinHandle<()>>,
    results: Vec<SearchHit>,
    open: bool,
    loading: bool,
}

impl GlobalFinder {
    pub fn new(
        store: Arc<dyn RecordStore>,
        responses: mpsc::UnboundedSender<FinderResponse>,
    ) -> Self {
        Self {
            store,
            responses,
            query: String::new(),
            seq: 0,
            pending: None,
            results: Vec::new(),
            open: false,
            loading: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn input(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cancel_pending();
        self.seq += 1;

        if self.query.chars().count() < MIN_QUERY_CHARS {
            self.results.clear();
            self.open = false;
            self.loading = false;
            return;
        }

        self.loading = true;
        let seq = self.seq;
        let query = self.query.clone();
        let store = Arc::clone(&self.store);
        let responses = self.responses.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            tracing::debug!(seq, query = %query, "global search fired");
            let hits = lookup(store.as_ref(), &query).await.unwrap_or_else(|err| {
                tracing::error!(?err, query = %query, "global search failed");
                Vec::new()
            });
            let _ = responses.send(FinderResponse { seq, query, hits });
        }));
    }

    /// Returns whether the response was current and is now displayed.
    pub fn apply(&mut self, response: FinderResponse) -> bool {
        if response.seq != self.seq {
            tracing::debug!(
                seq = response.seq,
                latest = self.seq,
                "dropping stale search response"
            );
            return false;
        }
        self.pending = None;
        self.loading = false;
        self.results = response.hits;
        self.open = !self.results.is_empty();
        true
    }

    pub fn clear(&mut self) {
        self.input(String::new());
    }

    /// Takes hit `index` out of the panel and resets the search box.
    pub fn select(&mut self, index: usize) -> Option<SearchHit> {
        let hit = self.results.get(index).cloned()?;
        self.clear();
        Some(hit)
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for GlobalFinder {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
