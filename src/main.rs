use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use biblioteca::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    biblioteca::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let global = &cli.global;
    match cli.command {
        Command::Areas => biblioteca::commands::areas(global).await.context("areas")?,
        Command::List(args) => biblioteca::commands::list(global, args)
            .await
            .context("list")?,
        Command::Search(args) => biblioteca::commands::search(global, args)
            .await
            .context("search")?,
        Command::Open(args) => biblioteca::commands::open(global, args)
            .await
            .context("open")?,
        Command::Favorite(args) => biblioteca::commands::favorite(global, args)
            .await
            .context("favorite")?,
        Command::Library => biblioteca::commands::library(global).context("library")?,
        Command::Browse => biblioteca::browse::run(global).await.context("browse")?,
    }

    Ok(())
}
