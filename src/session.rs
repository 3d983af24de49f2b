//! Client-owned state: what was opened, what is favorited, and where the
//! user currently is in the catalog.
//!
//! The recent list and the favorite set are written through to
//! [`LocalStorage`] on every change. The read set and the navigation state
//! live only as long as the session.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::formats::Record;
use crate::storage::LocalStorage;

pub const FAVORITES_KEY: &str = "favoriteBooks";
pub const RECENT_KEY: &str = "recentBooks";
pub const RECENT_LIMIT: usize = 10;

/// Which view the catalog shows, derived from navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Areas,
    Listing { area: String },
    Detail { record: Record },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub id: u64,
    /// Bumped on every global-search selection; a stale un-highlight timer
    /// carries an older value and is ignored.
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub selected_area: Option<String>,
    pub selected_record: Option<Record>,
    pub highlight: Option<Highlight>,
}

pub struct Session {
    storage: Arc<dyn LocalStorage>,
    read: Arc<HashSet<u64>>,
    recent: Vec<Record>,
    favorites: BTreeSet<u64>,
    navigation: Navigation,
    highlight_generation: u64,
}

impl Session {
    /// Restores the recent list and favorites; anything unreadable starts empty.
    pub fn restore(storage: Arc<dyn LocalStorage>) -> Self {
        let favorites: Vec<u64> = load_json(storage.as_ref(), FAVORITES_KEY).unwrap_or_default();
        let mut recent: Vec<Record> = load_json(storage.as_ref(), RECENT_KEY).unwrap_or_default();
        recent.truncate(RECENT_LIMIT);

        tracing::debug!(
            favorites = favorites.len(),
            recent = recent.len(),
            "restored session"
        );
        Self {
            storage,
            read: Arc::new(HashSet::new()),
            recent,
            favorites: favorites.into_iter().collect(),
            navigation: Navigation::default(),
            highlight_generation: 0,
        }
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn screen(&self) -> Screen {
        if let Some(record) = &self.navigation.selected_record {
            return Screen::Detail {
                record: record.clone(),
            };
        }
        match &self.navigation.selected_area {
            Some(area) => Screen::Listing { area: area.clone() },
            None => Screen::Areas,
        }
    }

    /// Snapshot of the read set; later updates do not affect it.
    pub fn read(&self) -> Arc<HashSet<u64>> {
        Arc::clone(&self.read)
    }

    pub fn is_read(&self, id: u64) -> bool {
        self.read.contains(&id)
    }

    pub fn recent(&self) -> &[Record] {
        &self.recent
    }

    pub fn favorites(&self) -> &BTreeSet<u64> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(&id)
    }

    /// Recent records that are also favorited, in recent order.
    pub fn favorite_records(&self) -> Vec<&Record> {
        self.recent
            .iter()
            .filter(|record| self.favorites.contains(&record.id))
            .collect()
    }

    pub fn highlighted(&self) -> Option<u64> {
        self.navigation.highlight.map(|h| h.id)
    }

    /// Opens `name`. A highlight from another area is dropped.
    pub fn select_area(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.navigation.selected_area.as_deref() != Some(name.as_str()) {
            self.navigation.highlight = None;
        }
        self.navigation.selected_area = Some(name);
        self.navigation.selected_record = None;
    }

    pub fn select_record(&mut self, record: Record) {
        self.recent.retain(|r| r.id != record.id);
        self.recent.insert(0, record.clone());
        self.recent.truncate(RECENT_LIMIT);
        self.persist(RECENT_KEY, &self.recent);

        if !self.read.contains(&record.id) {
            Arc::make_mut(&mut self.read).insert(record.id);
        }
        self.navigation.selected_record = Some(record);
    }

    /// Returns the screen that becomes visible.
    pub fn back_from_detail(&mut self) -> Screen {
        self.navigation.selected_record = None;
        self.screen()
    }

    pub fn back_from_area(&mut self) {
        self.navigation.selected_area = None;
        self.navigation.highlight = None;
    }

    /// Takes the fetched record rather than a bare id, so only ids the
    /// store returned can enter the favorite set.
    pub fn toggle_favorite(&mut self, record: &Record, is_favorite: bool) {
        let id = record.id;
        let changed = if is_favorite {
            self.favorites.insert(id)
        } else {
            self.favorites.remove(&id)
        };
        tracing::debug!(id, is_favorite, changed, "toggle favorite");
        let ids = self.favorites.iter().copied().collect::<Vec<_>>();
        self.persist(FAVORITES_KEY, &ids);
    }

    /// Opens `area` with `record` highlighted. The returned highlight is what
    /// the caller's un-highlight timer must hand back to [`Self::clear_highlight`].
    pub fn select_from_global_search(&mut self, record: &Record, area: &str) -> Highlight {
        self.select_area(area);
        self.highlight_generation += 1;
        let highlight = Highlight {
            id: record.id,
            generation: self.highlight_generation,
        };
        self.navigation.highlight = Some(highlight);
        highlight
    }

    /// Clears the highlight if it is still the one `expired` refers to.
    pub fn clear_highlight(&mut self, expired: Highlight) -> bool {
        if self.navigation.highlight == Some(expired) {
            self.navigation.highlight = None;
            return true;
        }
        false
    }

    fn persist<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(key, ?err, "serialize session state failed");
                return;
            }
        };
        if let Err(err) = self.storage.set_item(key, &json) {
            tracing::warn!(key, ?err, "persist session state failed");
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::warn!(key, ?err, "read session state failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, ?err, "ignoring malformed session state");
            None
        }
    }
}
