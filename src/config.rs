use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

pub const DEFAULT_TABLE: &str = "BIBLIOTECA-CLASSICOS";
pub const DEFAULT_STATE_DIR: &str = ".biblioteca";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub table: String,
}

impl StoreConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("BIBLIOTECA_STORE_URL")
            .context("BIBLIOTECA_STORE_URL is required unless --snapshot is given")?;
        let api_key = std::env::var("BIBLIOTECA_STORE_KEY").ok();
        let table = std::env::var("BIBLIOTECA_STORE_TABLE").ok();
        Self::parse(&base_url, api_key, table)
            .with_context(|| format!("invalid BIBLIOTECA_STORE_URL={base_url:?}"))
    }

    pub fn parse(
        base_url: &str,
        api_key: Option<String>,
        table: Option<String>,
    ) -> anyhow::Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            anyhow::bail!("store url is empty");
        }
        let base_url = Url::parse(trimmed).context("parse store url")?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            anyhow::bail!("store url must be http/https: {base_url}");
        }

        let api_key = api_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());
        let table = table
            .map(|table| table.trim().to_owned())
            .filter(|table| !table.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_owned());

        Ok(Self {
            base_url,
            api_key,
            table,
        })
    }

    /// `{base}/rest/v1/{table}`
    pub fn table_endpoint(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/rest/v1/{}", self.table)
    }
}

pub fn state_dir_from_env() -> PathBuf {
    std::env::var("BIBLIOTECA_STATE_DIR")
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}
