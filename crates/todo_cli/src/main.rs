//! Command-line driver for the to-do core.
//!
//! # Responsibility
//! - Run single store operations against a SQLite file for local inspection.
//! - Keep output deterministic for quick sanity checks.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todo_core::db::open_db;
use todo_core::{
    default_log_level, init_logging, Item, ItemKey, SqliteKvStore, TodoService, ViewMode,
};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Work/travel to-do list", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "TODO_DB_PATH", default_value = "todo.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "TODO_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TODO_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List items of the selected mode
    List {
        /// work|travel; defaults to the selected mode
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ViewMode>,
        /// List both modes
        #[arg(long, conflicts_with = "mode")]
        all: bool,
    },
    /// Add an item
    Add {
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ViewMode>,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip the completed flag of an item
    Toggle { key: String },
    /// Replace the text of an item
    Edit {
        key: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete an item; requires --yes
    Delete {
        key: String,
        #[arg(long)]
        yes: bool,
    },
    /// Show or set the selected mode
    Mode {
        #[arg(value_parser = parse_mode)]
        mode: Option<ViewMode>,
    },
    /// Print core linkage info
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    if let Command::Ping = cli.command {
        println!("todo_core ping={}", todo_core::ping());
        println!("todo_core version={}", todo_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let kv = SqliteKvStore::try_new(&conn).context("failed to prepare storage")?;
    let mut service = TodoService::open(&kv).context("failed to load to-do state")?;

    run(&mut service, cli.command)
}

fn run(service: &mut TodoService<'_, SqliteKvStore<'_>>, command: Command) -> Result<()> {
    match command {
        Command::List { mode, all } => {
            let modes = if all {
                vec![ViewMode::Work, ViewMode::Travel]
            } else {
                vec![mode.unwrap_or(service.mode())]
            };
            for mode in modes {
                let counts = service.counts(mode);
                println!("[{mode}] {}/{} done", counts.completed, counts.total);
                for item in service.items(mode) {
                    print_item(item);
                }
            }
        }
        Command::Add { mode, text } => {
            let mode = mode.unwrap_or(service.mode());
            let item = service.add_to(&text.join(" "), mode)?;
            print_item(&item);
        }
        Command::Toggle { key } => {
            let item = service.toggle_completed(&ItemKey::new(key))?;
            print_item(&item);
        }
        Command::Edit { key, text } => {
            let item = service.edit_text(&ItemKey::new(key), &text.join(" "))?;
            print_item(&item);
        }
        Command::Delete { key, yes } => {
            if !yes {
                bail!("refusing to delete `{key}` without --yes");
            }
            let item = service.delete(&ItemKey::new(key))?;
            println!("deleted {}", item.key);
        }
        Command::Mode { mode } => {
            if let Some(mode) = mode {
                service.switch_mode(mode)?;
            }
            println!("{}", service.mode());
        }
        Command::Ping => {}
    }
    Ok(())
}

fn print_item(item: &Item) {
    let mark = if item.completed { "x" } else { " " };
    println!("[{mark}] {} {}", item.key, item.text);
}

fn parse_mode(value: &str) -> Result<ViewMode, String> {
    ViewMode::parse(value).ok_or_else(|| format!("unknown mode `{value}`; expected work|travel"))
}
