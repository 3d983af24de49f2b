//! Query surface of the remote record store.
//!
//! The client never writes to the store; every method is a read with the
//! filtering, ordering and limits of one screen of the catalog.

pub mod postgrest;
pub mod snapshot;

use async_trait::async_trait;

use crate::formats::{Cover, Record};

pub use postgrest::PostgrestStore;
pub use snapshot::SnapshotStore;

pub const RECENT_COVERS_LIMIT: usize = 10;
pub const SEARCH_LIMIT: usize = 10;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Area column of every record whose area is not null.
    async fn list_area_names(&self) -> anyhow::Result<Vec<String>>;

    /// Newest records with a non-empty cover image, id descending.
    async fn list_recent_covers(&self, limit: usize) -> anyhow::Result<Vec<Cover>>;

    /// Records whose area equals `area` exactly, id descending.
    async fn list_by_area(&self, area: &str) -> anyhow::Result<Vec<Record>>;

    /// Case-insensitive substring match on title OR author.
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<Record>>;
}
