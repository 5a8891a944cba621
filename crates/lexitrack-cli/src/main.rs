//! lexitrack CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lexitrack",
    version,
    about = "Vocabulary review scheduling and morphological form tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and example schema file
    Init,

    /// Validate feature schema TOML files
    Validate {
        /// Path to a schema file or directory
        #[arg(long)]
        schema: PathBuf,
    },

    /// Show the registered features of a language
    Schema {
        /// Language code (defaults to `default_language` from the config)
        #[arg(long)]
        language: Option<String>,

        /// Restrict to one word class
        #[arg(long)]
        word_class: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Encode a feature assignment into a form-tree path and validate it
    Forms {
        /// Language code (defaults to `default_language` from the config)
        #[arg(long)]
        language: Option<String>,

        /// Word class, e.g. verb or noun
        #[arg(long)]
        word_class: String,

        /// Feature assignment, repeatable (e.g. --feature case=genitive)
        #[arg(long = "feature", value_name = "NAME=VALUE")]
        features: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show what a review outcome does to an item at a given level
    Review {
        /// Current proficiency level (0-5)
        #[arg(long)]
        level: i64,

        /// Review outcome: correct, hard, or incorrect
        #[arg(long, required_unless_present = "preview", conflicts_with = "preview")]
        outcome: Option<String>,

        /// Show every outcome instead of one
        #[arg(long)]
        preview: bool,
    },

    /// Import scraped records into an in-memory vocabulary
    Import {
        /// JSON record file
        #[arg(long)]
        records: PathBuf,

        /// Import every record into this language
        #[arg(long)]
        language: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "lexitrack=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { schema } => commands::validate::execute(schema),
        Commands::Schema {
            language,
            word_class,
            config,
        } => commands::schema::execute(language, word_class, config),
        Commands::Forms {
            language,
            word_class,
            features,
            config,
        } => commands::forms::execute(language, word_class, features, config),
        Commands::Review {
            level,
            outcome,
            preview,
        } => commands::review::execute(level, outcome, preview),
        Commands::Import {
            records,
            language,
            format,
            config,
        } => commands::import::execute(records, language, format, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
