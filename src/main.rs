//! Noteseed CLI - populate a SQLite database with sample notes for manual testing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use noteseed::config::{self, NoteseedConfig};
use noteseed::storage::SqliteStore;
use noteseed::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "noteseed")]
#[command(version)]
#[command(about = "Seed a SQLite database with a consistent sample of users, notes and revisions")]
#[command(long_about = r#"
Noteseed drops and recreates the notes schema, inserts three users each
owning one note with a single revision, reads them back and records a
history entry.

Example usage:
  noteseed seed --database ./dev.sqlite
  noteseed show --database ./dev.sqlite
  noteseed access --note <alias> --user hardcoded
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the schema and insert the sample graph
    Seed {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Keep the existing schema and data instead of dropping it
        #[arg(long)]
        keep_schema: bool,
    },

    /// Show row counts per table
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List seeded users and notes
    Show {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Resolve a user's effective access to a note
    Access {
        /// Note alias or public id
        #[arg(short, long)]
        note: String,

        /// Username
        #[arg(short, long)]
        user: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Seed { database, keep_schema } => {
            let database = database.unwrap_or_else(|| config.database_path());
            let mut options = config.store_options();
            if keep_schema {
                options.reset = false;
            }
            tracing::info!("Seeding {:?} (reset: {})", database, options.reset);

            config::ensure_db_dir(&database)?;
            let mut store = SqliteStore::open(&database, &options)?;
            let report = noteseed::build_and_persist(&mut store, &config.fixture())?;
            println!("{}", report);
        }

        Commands::Stats { database, format } => {
            let store = open_existing(database, &config)?;
            let stats = store.stats()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::header(Icons::STATS, "Noteseed Statistics");
                println!("{}", ui::stats_table(&stats));
            }
        }

        Commands::Show { database, format } => {
            let store = open_existing(database, &config)?;
            let users = store.list_users()?;
            let notes = store.note_summaries()?;

            if format == "json" {
                let data = serde_json::json!({ "users": users, "notes": notes });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                ui::section("Users");
                if users.is_empty() {
                    println!("∅ No users.");
                } else {
                    println!("{}", ui::users_table(&users));
                }
                ui::section("Notes");
                if notes.is_empty() {
                    println!("∅ No notes.");
                } else {
                    println!("{}", ui::notes_table(&notes));
                }
            }
        }

        Commands::Access { note, user, database } => {
            let store = open_existing(database, &config)?;
            match noteseed::access::access_by_name(&store, &note, &user)? {
                Some(level) => ui::info(&format!("{} {} on '{}'", Icons::LOCK, user, note), level.as_str()),
                None => ui::warn(&format!("{} has no access to '{}'", user, note)),
            }
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let default = NoteseedConfig {
                database: Some(config::default_database_path().display().to_string()),
                reset: Some(true),
                auto_alias: Some(true),
                fixture: None,
            };
            config::write_config(&path, &default, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}

/// Open a database for reading without touching its schema
fn open_existing(database: Option<PathBuf>, config: &NoteseedConfig) -> anyhow::Result<SqliteStore> {
    let database = database.unwrap_or_else(|| config.database_path());
    if !database.exists() {
        anyhow::bail!("database {} does not exist (run `noteseed seed` first)", database.display());
    }
    Ok(SqliteStore::open_existing(&database)?)
}
