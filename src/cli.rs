use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Read the catalog from a JSON snapshot instead of the remote store.
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Directory holding favorites and recent books (default: $BIBLIOTECA_STATE_DIR or `.biblioteca`).
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List subject areas and the recently added books.
    Areas,
    /// List the books of one area, sorted by title.
    List(ListArgs),
    /// Search titles and authors across the whole catalog.
    Search(SearchArgs),
    /// Show one book and record it as recently opened.
    Open(OpenArgs),
    /// Mark or unmark a book as favorite.
    Favorite(FavoriteArgs),
    /// Show the recent and favorite books.
    Library,
    /// Interactive browser reading commands from stdin.
    Browse,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Area name (exact, case-sensitive).
    #[arg(long)]
    pub area: String,

    /// Narrow the listing to titles or authors containing this text.
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// At least 2 characters.
    #[arg(long)]
    pub query: String,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Area the book belongs to.
    #[arg(long)]
    pub area: String,

    /// Book identifier.
    #[arg(long)]
    pub id: u64,
}

#[derive(Debug, Args)]
pub struct FavoriteArgs {
    /// Area the book is listed in (exact, case-sensitive).
    #[arg(long)]
    pub area: String,

    /// Book identifier.
    #[arg(long)]
    pub id: u64,

    /// Remove from favorites instead of adding.
    #[arg(long, default_value_t = false)]
    pub remove: bool,
}
