/// Main entry point for the Habit Journal MCP server
///
/// Parses the command line, sets up logging on stderr and serves MCP
/// JSON-RPC over stdin/stdout until the client closes the stream.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use habit_journal_mcp::{JournalServer, UserId};

const DATABASE_FILE: &str = "journal.db";

/// Command line arguments for the Habit Journal MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite file to store habits and journal entries in
    /// (defaults to ~/.habit_journal/journal.db or the first writable fallback)
    #[arg(long, conflicts_with = "memory")]
    database: Option<PathBuf>,

    /// Keep all data in memory; nothing is written to disk
    #[arg(long)]
    memory: bool,

    /// User whose habits and journal the tools act on
    #[arg(long, default_value = "local")]
    user: String,

    /// Log at info level
    #[arg(short, long)]
    debug: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn is_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_probe");
    let writable = std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}

/// First writable data directory, falling back to the system temp dir
fn default_database_path() -> std::io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|home| home.join(".habit_journal")),
        dirs::data_dir().map(|data| data.join("habit_journal")),
        dirs::config_dir().map(|config| config.join("habit_journal")),
        std::env::current_dir().ok().map(|cwd| cwd.join(".habit_journal")),
    ];

    if let Some(dir) = candidates.into_iter().flatten().find(|dir| is_writable(dir)) {
        return Ok(dir.join(DATABASE_FILE));
    }

    let dir = std::env::temp_dir().join("habit_journal");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(DATABASE_FILE);
    warn!("No writable data directory, using {}", path.display());
    Ok(path)
}

fn resolve_database_path(requested: Option<PathBuf>) -> std::io::Result<PathBuf> {
    match requested {
        Some(path) => {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)?,
                _ => {}
            }
            Ok(path)
        }
        None => default_database_path(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match (args.verbose, args.debug) {
        (true, _) => "debug",
        (false, true) => "info",
        _ => "warn",
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_journal_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .init();

    let user_id = UserId::new(args.user.trim());
    if user_id.as_str().is_empty() {
        return Err("--user must not be empty".into());
    }

    let server = if args.memory {
        info!("Starting in-memory session for {}", user_id);
        JournalServer::in_memory(user_id)
    } else {
        let db_path = resolve_database_path(args.database)?;
        info!("Starting session for {} on {}", user_id, db_path.display());
        JournalServer::new(db_path, user_id).await?
    };

    server.run().await?;

    info!("Habit Journal MCP server stopped");
    Ok(())
}
