//! Drives the catalog views with explicit commands.
//!
//! Every navigation command updates [`Session`] and then mounts the screen
//! that becomes visible, which is when the screen's data is fetched. Timers
//! and search responses come back through [`Catalog::next_event`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::areas::{self, AreaOverview};
use crate::detail::DetailPresenter;
use crate::finder::{FinderResponse, GlobalFinder, SearchHit};
use crate::formats::Record;
use crate::lister::{AreaListing, ListingStats, ListingView, RenderFlags};
use crate::session::{Highlight, Screen, Session};
use crate::storage::LocalStorage;
use crate::store::RecordStore;

pub const SCROLL_DELAY: Duration = Duration::from_millis(500);
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    ScrollTo(u64),
    ExpireHighlight(Highlight),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A search response arrived; `shown` is false when it was stale.
    SearchResults { shown: bool },
    ScrolledTo(u64),
    /// The scroll target is not in the displayed listing.
    ScrollTargetMissing(u64),
    HighlightCleared,
    /// An older selection's timer expired after a newer highlight was set.
    HighlightKept,
}

pub struct Catalog {
    store: Arc<dyn RecordStore>,
    session: Session,
    finder: GlobalFinder,
    finder_rx: mpsc::UnboundedReceiver<FinderResponse>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    overview: AreaOverview,
    listing: Option<AreaListing>,
    stats: ListingStats,
    scrolled_to: Option<u64>,
}

impl Catalog {
    pub fn new(store: Arc<dyn RecordStore>, storage: Arc<dyn LocalStorage>) -> Self {
        let (finder_tx, finder_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            finder: GlobalFinder::new(Arc::clone(&store), finder_tx),
            store,
            session: Session::restore(storage),
            finder_rx,
            timer_tx,
            timer_rx,
            overview: AreaOverview::default(),
            listing: None,
            stats: ListingStats::default(),
            scrolled_to: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn finder(&self) -> &GlobalFinder {
        &self.finder
    }

    pub fn overview(&self) -> &AreaOverview {
        &self.overview
    }

    /// Latest `(total, available_for_download)` reported by the lister.
    pub fn stats(&self) -> ListingStats {
        self.stats
    }

    pub fn scrolled_to(&self) -> Option<u64> {
        self.scrolled_to
    }

    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    /// Fetches whatever the current screen needs.
    pub async fn mount(&mut self) {
        match self.session.screen() {
            Screen::Areas => {
                self.listing = None;
                self.overview = areas::load_overview(self.store.as_ref()).await;
            }
            Screen::Listing { area } => self.mount_listing(&area).await,
            Screen::Detail { .. } => {}
        }
    }

    async fn mount_listing(&mut self, area: &str) {
        self.scrolled_to = None;
        match AreaListing::fetch(self.store.as_ref(), area).await {
            Ok(listing) => {
                self.stats = listing.stats();
                tracing::debug!(
                    area,
                    total = self.stats.total,
                    available_for_download = self.stats.available_for_download,
                    "listing stats"
                );
                self.listing = Some(listing);
            }
            Err(err) => {
                tracing::error!(?err, area, "fetch area listing failed");
                self.listing = Some(AreaListing::new(area, Vec::new()));
            }
        }
    }

    pub async fn open_area(&mut self, name: &str) {
        self.session.select_area(name);
        self.mount().await;
    }

    /// Opens a record of the displayed listing. Returns false if `id` is not listed.
    pub fn open_listed(&mut self, id: u64) -> bool {
        let Some(record) = self.listing.as_ref().and_then(|l| l.find(id)).cloned() else {
            return false;
        };
        self.session.select_record(record);
        true
    }

    /// Opens a record from the personal library panel (recent list).
    pub fn open_recent(&mut self, id: u64) -> bool {
        let Some(record) = self.session.recent().iter().find(|r| r.id == id).cloned() else {
            return false;
        };
        self.session.select_record(record);
        true
    }

    /// Goes one level up and mounts the screen that becomes visible.
    pub async fn back(&mut self) -> Screen {
        match self.session.screen() {
            Screen::Detail { .. } => {
                self.session.back_from_detail();
            }
            Screen::Listing { .. } => self.session.back_from_area(),
            Screen::Areas => return Screen::Areas,
        }
        self.mount().await;
        self.session.screen()
    }

    /// Favorites or unfavorites a book that is on screen or in the recent
    /// list. Returns false, changing nothing, for any other id.
    pub fn toggle_favorite(&mut self, id: u64, is_favorite: bool) -> bool {
        let Some(record) = self.known_record(id).cloned() else {
            tracing::warn!(id, "favorite ignored: book was never fetched");
            return false;
        };
        self.session.toggle_favorite(&record, is_favorite);
        true
    }

    fn known_record(&self, id: u64) -> Option<&Record> {
        self.session
            .navigation()
            .selected_record
            .as_ref()
            .filter(|record| record.id == id)
            .or_else(|| self.listing.as_ref().and_then(|listing| listing.find(id)))
            .or_else(|| self.session.recent().iter().find(|record| record.id == id))
    }

    pub fn filter_listing(&mut self, filter: &str) {
        if let Some(listing) = self.listing.as_mut() {
            listing.set_filter(filter);
        }
    }

    pub fn search_input(&mut self, query: &str) {
        self.finder.input(query);
    }

    /// Jumps to the area of search hit `index` with the record highlighted.
    /// The scroll and un-highlight timers both start now. A hit without an
    /// area opens its detail view instead.
    pub async fn select_search_hit(&mut self, index: usize) -> Option<SearchHit> {
        let hit = self.finder.select(index)?;
        if hit.area.is_empty() {
            // No area to land on; open the record itself.
            self.session.select_record(hit.record.clone());
            return Some(hit);
        }
        let highlight = self
            .session
            .select_from_global_search(&hit.record, &hit.area);

        self.schedule(SCROLL_DELAY, TimerEvent::ScrollTo(highlight.id));
        self.schedule(HIGHLIGHT_DURATION, TimerEvent::ExpireHighlight(highlight));

        self.mount().await;
        Some(hit)
    }

    fn schedule(&self, delay: Duration, event: TimerEvent) {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
    }

    /// Waits for the next search response or timer and applies it.
    pub async fn next_event(&mut self) -> Option<CatalogEvent> {
        tokio::select! {
            Some(response) = self.finder_rx.recv() => {
                let shown = self.finder.apply(response);
                Some(CatalogEvent::SearchResults { shown })
            }
            Some(event) = self.timer_rx.recv() => Some(self.apply_timer(event)),
            else => None,
        }
    }

    fn apply_timer(&mut self, event: TimerEvent) -> CatalogEvent {
        match event {
            TimerEvent::ScrollTo(id) => {
                let displayed = self
                    .listing
                    .as_ref()
                    .is_some_and(|l| l.filtered().iter().any(|r| r.id == id));
                if displayed {
                    self.scrolled_to = Some(id);
                    CatalogEvent::ScrolledTo(id)
                } else {
                    tracing::debug!(id, "scroll target not displayed");
                    CatalogEvent::ScrollTargetMissing(id)
                }
            }
            TimerEvent::ExpireHighlight(highlight) => {
                if self.session.clear_highlight(highlight) {
                    CatalogEvent::HighlightCleared
                } else {
                    CatalogEvent::HighlightKept
                }
            }
        }
    }

    pub fn listing_view(&self) -> Option<ListingView<'_>> {
        let listing = self.listing.as_ref()?;
        let read = self.session.read();
        Some(listing.render(RenderFlags {
            read: read.as_ref(),
            favorites: self.session.favorites(),
            highlighted: self.session.highlighted(),
        }))
    }

    pub fn detail(&self) -> Option<DetailPresenter<'_>> {
        let record = self.session.navigation().selected_record.as_ref()?;
        Some(DetailPresenter::new(record, self.session.is_favorite(record.id)))
    }
}
