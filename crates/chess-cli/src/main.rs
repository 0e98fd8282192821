//! Chess CLI - plays one game from standard input.
//!
//! Reads coordinate moves (`e2e4`, `e2-e4`) and `castling short` /
//! `castling long`, one per line, and writes every resulting fact as a JSON
//! line to standard output. Logs go to standard error.

mod config;
mod session;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use config::Config;
use session::{Flow, Session};
use tracing_subscriber::EnvFilter;

/// Play a game of chess on the terminal.
#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Play a game of chess on the terminal")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// White player's name, overriding the configuration
    #[arg(long)]
    white: Option<String>,

    /// Black player's name, overriding the configuration
    #[arg(long)]
    black: Option<String>,

    /// Identifier recorded on every fact
    #[arg(long, default_value = "local")]
    game_id: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("invalid log filter '{}'", config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let white = args.white.unwrap_or(config.white_player);
    let black = args.black.unwrap_or(config.black_player);
    tracing::info!("Game {}: {} vs {}", args.game_id, white, black);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let session = Session::start(&args.game_id, &white, &black, config.show_board, &mut out)?;

    for line in io::stdin().lock().lines() {
        if session.handle_line(&line?, &mut out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
