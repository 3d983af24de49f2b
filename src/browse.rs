use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt as _, BufReader};

use crate::cli::GlobalArgs;
use crate::commands;
use crate::controller::{Catalog, CatalogEvent};
use crate::render;
use crate::session::Screen;

const HELP: &str = "\
commands:
  area <name>      open an area
  open <id>        open a book of the current area
  recent <id>      open a book from the personal library
  filter <text>    narrow the current area (empty clears)
  find <text>      search the whole catalog
  pick <n>         jump to search result n
  fav <id> | unfav <id>
  library          recent and favorite books
  back | show | help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Area(String),
    Open(u64),
    Recent(u64),
    Filter(String),
    Find(String),
    Pick(usize),
    Favorite { id: u64, is_favorite: bool },
    Library,
    Back,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> anyhow::Result<BrowseCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let id = || -> anyhow::Result<u64> {
        rest.parse::<u64>()
            .with_context(|| format!("expected a book id, got {rest:?}"))
    };

    let command = match word {
        "area" if !rest.is_empty() => BrowseCommand::Area(rest.to_owned()),
        "open" => BrowseCommand::Open(id()?),
        "recent" => BrowseCommand::Recent(id()?),
        "filter" => BrowseCommand::Filter(rest.to_owned()),
        "find" => BrowseCommand::Find(rest.to_owned()),
        "pick" => BrowseCommand::Pick(
            rest.parse()
                .with_context(|| format!("expected a result number, got {rest:?}"))?,
        ),
        "fav" => BrowseCommand::Favorite {
            id: id()?,
            is_favorite: true,
        },
        "unfav" => BrowseCommand::Favorite {
            id: id()?,
            is_favorite: false,
        },
        "library" => BrowseCommand::Library,
        "back" => BrowseCommand::Back,
        "" | "show" => BrowseCommand::Show,
        "help" => BrowseCommand::Help,
        "quit" | "exit" => BrowseCommand::Quit,
        other => anyhow::bail!("unknown command: {other:?} (try `help`)"),
    };
    Ok(command)
}

pub async fn run(global: &GlobalArgs) -> anyhow::Result<()> {
    let mut catalog = commands::open_catalog(global)?;
    catalog.mount().await;
    print!("{}", screen_text(&catalog));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{err:#}");
                        continue;
                    }
                };
                if command == BrowseCommand::Quit {
                    break;
                }
                execute(&mut catalog, command).await;
            }
            Some(event) = catalog.next_event() => {
                tracing::debug!(?event, "catalog event");
                match event {
                    CatalogEvent::SearchResults { shown: true } => {
                        print!("{}", render::search_panel(catalog.finder()));
                    }
                    CatalogEvent::ScrolledTo(_) | CatalogEvent::HighlightCleared => {
                        print!("{}", screen_text(&catalog));
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

async fn execute(catalog: &mut Catalog, command: BrowseCommand) {
    match command {
        BrowseCommand::Area(name) => catalog.open_area(&name).await,
        BrowseCommand::Open(id) => {
            if !catalog.open_listed(id) {
                println!("livro {id} não está na lista atual");
                return;
            }
        }
        BrowseCommand::Recent(id) => {
            if !catalog.open_recent(id) {
                println!("livro {id} não está nos recentes");
                return;
            }
        }
        BrowseCommand::Filter(text) => catalog.filter_listing(&text),
        BrowseCommand::Find(text) => {
            catalog.search_input(&text);
            return;
        }
        BrowseCommand::Pick(index) => {
            if catalog.select_search_hit(index).await.is_none() {
                println!("resultado {index} não existe");
                return;
            }
        }
        BrowseCommand::Favorite { id, is_favorite } => {
            if !catalog.toggle_favorite(id, is_favorite) {
                println!("livro {id} não está na tela nem nos recentes");
                return;
            }
        }
        BrowseCommand::Library => {
            print!("{}", render::library(catalog.session()));
            return;
        }
        BrowseCommand::Back => {
            catalog.back().await;
        }
        BrowseCommand::Show => {}
        BrowseCommand::Help => {
            print!("{HELP}");
            return;
        }
        BrowseCommand::Quit => return,
    }
    print!("{}", screen_text(catalog));
}

pub fn screen_text(catalog: &Catalog) -> String {
    match catalog.screen() {
        Screen::Areas => render::overview(catalog.overview()),
        Screen::Listing { area } => match catalog.listing_view() {
            Some(view) => render::listing(&area, &view, catalog.stats()),
            None => String::new(),
        },
        Screen::Detail { .. } => catalog
            .detail()
            .map(|detail| commands::detail_text(&detail))
            .unwrap_or_default(),
    }
}
