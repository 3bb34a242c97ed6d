//! dictbuddy CLI - manage and drill an English/Thai word list.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dictbuddy", version, about = "English/Thai vocabulary manager and drills")]
struct Cli {
    /// SQLite database path (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a word
    Add {
        english: String,
        thai: String,
        #[arg(long)]
        category: Option<String>,
    },

    /// List stored words
    List {
        /// Sort by: english, thai, category
        #[arg(long)]
        sort: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search English and Thai for a substring
    Search { term: String },

    /// Delete one word
    Delete { english: String },

    /// Delete every word
    Clear {
        /// Confirm deleting everything
        #[arg(long)]
        yes: bool,
    },

    /// Reorder the stored list permanently
    Sort { field: String },

    /// Show categories with word counts
    Categories,

    /// Import words from a CSV, TXT or spreadsheet file
    Import {
        file: PathBuf,

        /// Only show what would be imported
        #[arg(long)]
        dry_run: bool,

        /// Leave out rows whose English word is already stored
        #[arg(long)]
        skip_existing: bool,
    },

    /// Type the translation of each word
    Practice {
        /// Show Thai, answer in English
        #[arg(long)]
        reverse: bool,
    },

    /// Multiple-choice quiz
    Quiz,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dictbuddy_core=warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match commands::load_config(cli.config.as_deref(), cli.db) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Add {
            english,
            thai,
            category,
        } => commands::words::add(&config, &english, &thai, category.as_deref()),
        Commands::List { sort, json } => commands::words::list(&config, sort.as_deref(), json),
        Commands::Search { term } => commands::words::search(&config, &term),
        Commands::Delete { english } => commands::words::delete(&config, &english),
        Commands::Clear { yes } => commands::words::clear(&config, yes),
        Commands::Sort { field } => commands::words::sort(&config, &field),
        Commands::Categories => commands::words::categories(&config),
        Commands::Import {
            file,
            dry_run,
            skip_existing,
        } => commands::import::execute(&config, &file, dry_run, skip_existing),
        Commands::Practice { reverse } => commands::drill::practice(&config, reverse),
        Commands::Quiz => commands::drill::quiz(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
