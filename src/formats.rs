use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Sem título";
pub const UNKNOWN_AUTHOR: &str = "Autor não especificado";

/// One catalog entry as the client sees it.
///
/// Field names on the wire follow the store's table columns. Deserialization
/// goes through [`RecordRow`] so that rows with missing or empty columns come
/// out normalized, whether they arrive from the store or from a persisted
/// recent-list snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRow")]
pub struct Record {
    pub id: u64,
    #[serde(rename = "livro")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "sobre")]
    pub description: String,
    #[serde(rename = "imagem", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "link", skip_serializing_if = "Option::is_none")]
    pub read_link: Option<String>,
    #[serde(rename = "download", skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(rename = "beneficios", skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl Record {
    pub fn has_download(&self) -> bool {
        self.download_link.is_some()
    }

    pub fn has_read_link(&self) -> bool {
        self.read_link.is_some()
    }
}

/// Raw row shape; every column may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordRow {
    pub id: u64,
    #[serde(default)]
    pub livro: Option<String>,
    #[serde(default)]
    pub autor: Option<String>,
    #[serde(default)]
    pub sobre: Option<String>,
    #[serde(default)]
    pub imagem: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub download: Option<String>,
    #[serde(default)]
    pub beneficios: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            title: non_empty(row.livro).unwrap_or_else(|| UNTITLED.to_owned()),
            author: non_empty(row.autor).unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
            description: row.sobre.unwrap_or_default(),
            image: non_empty(row.imagem),
            read_link: non_empty(row.link),
            download_link: non_empty(row.download),
            benefits: non_empty(row.beneficios),
            area: row.area,
        }
    }
}

/// Entry of the "recently added" strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CoverRow")]
pub struct Cover {
    #[serde(rename = "livro")]
    pub title: String,
    #[serde(rename = "imagem")]
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverRow {
    #[serde(default)]
    pub livro: Option<String>,
    #[serde(default)]
    pub imagem: Option<String>,
}

impl From<CoverRow> for Cover {
    fn from(row: CoverRow) -> Self {
        Self {
            title: non_empty(row.livro).unwrap_or_else(|| UNTITLED.to_owned()),
            image: row.imagem.unwrap_or_default(),
        }
    }
}

/// Row of the area grouping query (only the `area` column is selected).
#[derive(Debug, Clone, Deserialize)]
pub struct AreaRow {
    #[serde(default)]
    pub area: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_missing_columns_is_normalized() {
        let record: Record =
            serde_json::from_str(r#"{"id":7,"livro":"","autor":null,"download":""}"#).unwrap();
        assert_eq!(record.title, UNTITLED);
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert_eq!(record.description, "");
        assert!(!record.has_download());
        assert!(record.area.is_none());
    }

    #[test]
    fn serialized_record_uses_store_column_names() {
        let record = Record::from(RecordRow {
            id: 3,
            livro: Some("Dom Casmurro".to_owned()),
            autor: Some("Machado de Assis".to_owned()),
            link: Some("https://example.com/read".to_owned()),
            ..RecordRow::default()
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["livro"], "Dom Casmurro");
        assert_eq!(value["autor"], "Machado de Assis");
        assert_eq!(value["link"], "https://example.com/read");
        assert!(value.get("download").is_none());
    }
}
