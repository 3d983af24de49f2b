use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;

use crate::formats::{Cover, Record, RecordRow};
use crate::store::RecordStore;
use crate::text;

/// Offline catalog: a JSON array of store rows, queried in memory.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    entries: Vec<Entry>,
}

/// A normalized record plus the raw columns that search runs against.
#[derive(Debug, Clone)]
struct Entry {
    livro: Option<String>,
    autor: Option<String>,
    record: Record,
}

impl Entry {
    fn matches(&self, needle: &str) -> bool {
        [&self.livro, &self.autor]
            .into_iter()
            .flatten()
            .any(|column| text::contains_folded(column, needle))
    }
}

impl SnapshotStore {
    pub fn new(rows: Vec<RecordRow>) -> Self {
        let entries = rows
            .into_iter()
            .map(|row| Entry {
                livro: row.livro.clone(),
                autor: row.autor.clone(),
                record: Record::from(row),
            })
            .collect();
        Self { entries }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read snapshot: {}", path.display()))?;
        let rows: Vec<RecordRow> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse snapshot: {}", path.display()))?;
        tracing::debug!(path = %path.display(), records = rows.len(), "loaded snapshot");
        Ok(Self::new(rows))
    }

    fn newest_first(&self) -> Vec<&Record> {
        let mut records = self.entries.iter().map(|e| &e.record).collect::<Vec<_>>();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records
    }
}

#[async_trait]
impl RecordStore for SnapshotStore {
    async fn list_area_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter_map(|entry| entry.record.area.clone())
            .collect())
    }

    async fn list_recent_covers(&self, limit: usize) -> anyhow::Result<Vec<Cover>> {
        Ok(self
            .newest_first()
            .into_iter()
            .filter_map(|record| {
                let image = record.image.as_ref()?;
                Some(Cover {
                    title: record.title.clone(),
                    image: image.clone(),
                })
            })
            .take(limit)
            .collect())
    }

    async fn list_by_area(&self, area: &str) -> anyhow::Result<Vec<Record>> {
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|record| record.area.as_deref() == Some(area))
            .cloned()
            .collect())
    }

    /// Matches the raw title and author columns, so placeholder texts of
    /// null columns never match.
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<Record>> {
        let needle = text::fold(query);
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.matches(&needle))
            .take(limit)
            .map(|entry| entry.record.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, title: &str, author: &str, area: Option<&str>, image: Option<&str>) -> RecordRow {
        RecordRow {
            id,
            livro: Some(title.to_owned()),
            autor: Some(author.to_owned()),
            area: area.map(str::to_owned),
            imagem: image.map(str::to_owned),
            ..RecordRow::default()
        }
    }

    #[tokio::test]
    async fn search_is_accent_insensitive_on_title_and_author() -> anyhow::Result<()> {
        let store = SnapshotStore::new(vec![
            record(1, "Análise do Direito", "Miguel Reale", Some("classicos"), None),
            record(2, "Teoria Pura", "Ana Paula", Some("classicos"), None),
            record(3, "Oratória", "Cícero", Some("oratoria"), None),
        ]);

        let hits = store.search("ana", 10).await?;
        let ids = hits.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn search_ignores_placeholders_of_null_columns() -> anyhow::Result<()> {
        let store = SnapshotStore::new(vec![
            RecordRow {
                id: 1,
                ..RecordRow::default()
            },
            record(2, "Sem título ainda", "x", None, None),
        ]);

        let ids = store
            .search("sem título", 10)
            .await?
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![2]);
        assert!(store.search("autor não", 10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn recent_covers_skip_missing_images_and_respect_limit() -> anyhow::Result<()> {
        let store = SnapshotStore::new(vec![
            record(1, "A", "x", None, Some("a.png")),
            record(2, "B", "x", None, None),
            record(3, "C", "x", None, Some("")),
            record(4, "D", "x", None, Some("d.png")),
            record(5, "E", "x", None, Some("e.png")),
        ]);

        let covers = store.list_recent_covers(2).await?;
        let titles = covers.iter().map(|c| c.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["E", "D"]);
        Ok(())
    }

    #[tokio::test]
    async fn list_by_area_is_exact_and_newest_first() -> anyhow::Result<()> {
        let store = SnapshotStore::new(vec![
            record(1, "A", "x", Some("classicos"), None),
            record(2, "B", "x", Some("Classicos"), None),
            record(3, "C", "x", Some("classicos"), None),
        ]);

        let ids = store
            .list_by_area("classicos")
            .await?
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 1]);
        Ok(())
    }
}
