mod commands;
mod file_store;
mod terminal;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use hubber_session::{GuardConfig, SessionGuard, SystemClock};

use crate::commands::Command;
use crate::file_store::FileStore;
use crate::terminal::TerminalPage;

#[derive(Parser, Debug)]
#[command(name = "hubber-cli", about = "Inspect and drive a Hubber session kept in a JSON storage file")]
struct Cli {
    /// Persistent storage file (the `localStorage` stand-in).
    #[arg(long, env = "HUBBER_STORE", default_value = "hubber-storage.json")]
    store: PathBuf,

    /// URL of the page the guard pretends to run on.
    #[arg(long, env = "HUBBER_PAGE", default_value = "http://localhost/dashboard.html")]
    page: String,

    /// Answer yes to confirmation prompts.
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

/// Per-tab storage lives next to the persistent file: `x.json` pairs with
/// `x.tab.json`.
fn transient_path(store: &Path) -> PathBuf {
    store.with_extension("tab.json")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let page = TerminalPage::new(&cli.page, cli.yes, io::stdout());
    let guard = Rc::new(SessionGuard::new(
        GuardConfig::from_env(),
        FileStore::new(&cli.store),
        FileStore::new(transient_path(&cli.store)),
        SystemClock,
        page,
    ));

    match commands::run(cli.command, &guard) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
