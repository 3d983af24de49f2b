use std::sync::Arc;

use anyhow::Context as _;

use crate::cli::{FavoriteArgs, GlobalArgs, ListArgs, OpenArgs, SearchArgs};
use crate::config::{self, StoreConfig};
use crate::controller::Catalog;
use crate::detail::{DetailPresenter, ReadAction};
use crate::finder::{self, MIN_QUERY_CHARS};
use crate::render;
use crate::session::Session;
use crate::storage::{FileStorage, LocalStorage};
use crate::store::{PostgrestStore, RecordStore, SnapshotStore};

pub fn open_store(global: &GlobalArgs) -> anyhow::Result<Arc<dyn RecordStore>> {
    if let Some(path) = &global.snapshot {
        tracing::info!(path = %path.display(), "using snapshot store");
        let store = SnapshotStore::from_path(path).context("open snapshot store")?;
        return Ok(Arc::new(store));
    }
    let config = StoreConfig::from_env()?;
    tracing::info!(endpoint = %config.table_endpoint(), "using postgrest store");
    Ok(Arc::new(PostgrestStore::new(&config)?))
}

pub fn open_storage(global: &GlobalArgs) -> Arc<dyn LocalStorage> {
    let dir = global
        .state_dir
        .clone()
        .unwrap_or_else(config::state_dir_from_env);
    tracing::debug!(state_dir = %dir.display(), "using file storage");
    Arc::new(FileStorage::new(dir))
}

pub fn open_catalog(global: &GlobalArgs) -> anyhow::Result<Catalog> {
    let store = open_store(global)?;
    Ok(Catalog::new(store, open_storage(global)))
}

pub async fn areas(global: &GlobalArgs) -> anyhow::Result<()> {
    let mut catalog = open_catalog(global)?;
    catalog.mount().await;
    print!("{}", render::overview(catalog.overview()));
    Ok(())
}

pub async fn list(global: &GlobalArgs, args: ListArgs) -> anyhow::Result<()> {
    let mut catalog = open_catalog(global)?;
    catalog.open_area(&args.area).await;
    if let Some(filter) = &args.filter {
        catalog.filter_listing(filter);
    }
    if let Some(view) = catalog.listing_view() {
        print!("{}", render::listing(&args.area, &view, catalog.stats()));
    }
    Ok(())
}

pub async fn search(global: &GlobalArgs, args: SearchArgs) -> anyhow::Result<()> {
    if args.query.chars().count() < MIN_QUERY_CHARS {
        anyhow::bail!("--query must have at least {MIN_QUERY_CHARS} characters");
    }
    let store = open_store(global)?;
    let hits = finder::lookup(store.as_ref(), &args.query)
        .await
        .unwrap_or_else(|err| {
            tracing::error!(?err, "search failed");
            Vec::new()
        });
    if hits.is_empty() {
        println!("Nenhum livro encontrado");
    }
    for hit in hits {
        println!(
            "#{} {} - {} • {}",
            hit.record.id, hit.record.title, hit.record.author, hit.area
        );
    }
    Ok(())
}

pub async fn open(global: &GlobalArgs, args: OpenArgs) -> anyhow::Result<()> {
    let mut catalog = open_catalog(global)?;
    catalog.open_area(&args.area).await;
    if !catalog.open_listed(args.id) {
        anyhow::bail!("book {} not found in area {:?}", args.id, args.area);
    }
    let detail = catalog
        .detail()
        .ok_or_else(|| anyhow::anyhow!("no book selected"))?;
    print!("{}", detail_text(&detail));
    Ok(())
}

pub async fn favorite(global: &GlobalArgs, args: FavoriteArgs) -> anyhow::Result<()> {
    let mut catalog = open_catalog(global)?;
    catalog.open_area(&args.area).await;
    if !catalog.toggle_favorite(args.id, !args.remove) {
        anyhow::bail!("book {} not found in area {:?}", args.id, args.area);
    }
    let ids = catalog
        .session()
        .favorites()
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>();
    println!("favoritos: [{}]", ids.join(", "));
    Ok(())
}

pub fn library(global: &GlobalArgs) -> anyhow::Result<()> {
    let session = Session::restore(open_storage(global));
    print!("{}", render::library(&session));
    Ok(())
}

pub fn detail_text(detail: &DetailPresenter<'_>) -> String {
    let mut out = detail.render();
    match detail.read_now() {
        Some(ReadAction::Video { video_id }) => {
            out.push_str(&format!("Ler agora: vídeo {video_id}\n"));
        }
        Some(ReadAction::Frame { url, .. }) => {
            out.push_str(&format!("Ler agora: {url}\n"));
        }
        None => {}
    }
    if let Some(download) = detail.download() {
        out.push_str(&format!("Baixar: {}\n", download.url));
    }
    out
}
