use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::StoreConfig;
use crate::formats::{AreaRow, Cover, Record};
use crate::store::RecordStore;

/// Reads the catalog table through a PostgREST endpoint (e.g. Supabase).
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PostgrestStore {
    pub fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            endpoint: config.table_endpoint(),
            api_key: config.api_key.clone(),
        })
    }

    async fn select<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> anyhow::Result<Vec<T>> {
        let mut req = self.client.get(&self.endpoint).query(query);
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("GET {}", self.endpoint))?;
        let status = response.status();
        let raw = response.text().await.context("read store response body")?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or_else(|| raw.clone());
            anyhow::bail!("store query failed ({status}): {message}");
        }

        serde_json::from_str(&raw).context("parse store rows")
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn list_area_names(&self) -> anyhow::Result<Vec<String>> {
        let rows: Vec<AreaRow> = self
            .select(&[
                ("select", "area".to_owned()),
                ("area", "not.is.null".to_owned()),
            ])
            .await
            .context("list areas")?;
        Ok(rows.into_iter().filter_map(|row| row.area).collect())
    }

    async fn list_recent_covers(&self, limit: usize) -> anyhow::Result<Vec<Cover>> {
        self.select(&[
            ("select", "livro,imagem".to_owned()),
            ("imagem", "not.is.null".to_owned()),
            ("imagem", "neq.".to_owned()),
            ("order", "id.desc".to_owned()),
            ("limit", limit.to_string()),
        ])
        .await
        .context("list recent covers")
    }

    async fn list_by_area(&self, area: &str) -> anyhow::Result<Vec<Record>> {
        self.select(&[
            ("select", "*".to_owned()),
            ("area", format!("eq.{}", quote_filter_value(area))),
            ("order", "id.desc".to_owned()),
        ])
        .await
        .with_context(|| format!("list records in area {area:?}"))
    }

    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<Record>> {
        self.select(&[
            ("select", "*".to_owned()),
            ("or", search_filter(query)),
            ("limit", limit.to_string()),
        ])
        .await
        .with_context(|| format!("search records for {query:?}"))
    }
}

/// `(livro.ilike."*q*",autor.ilike."*q*")`
pub fn search_filter(query: &str) -> String {
    let pattern = quote_filter_value(&format!("*{query}*"));
    format!("(livro.ilike.{pattern},autor.ilike.{pattern})")
}

/// Double-quotes a filter operand so that `,`, `(`, `)` and `.` in user text
/// are not read as PostgREST syntax.
pub fn quote_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("message")?.as_str()?.to_owned();
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_filter_matches_title_or_author() {
        assert_eq!(
            search_filter("ana"),
            r#"(livro.ilike."*ana*",autor.ilike."*ana*")"#
        );
    }

    #[test]
    fn quote_filter_value_escapes_reserved_chars() {
        assert_eq!(quote_filter_value("a,b"), r#""a,b""#);
        assert_eq!(quote_filter_value(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote_filter_value(r"back\slash"), r#""back\\slash""#);
    }

    #[test]
    fn parse_error_message_reads_postgrest_body() {
        let raw = r#"{"code":"42P01","message":"relation does not exist"}"#;
        assert_eq!(
            parse_error_message(raw).as_deref(),
            Some("relation does not exist")
        );
        assert_eq!(parse_error_message("not json"), None);
    }
}
