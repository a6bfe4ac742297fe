// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;

use vocab_trainer::app_config::{self, Config};
use vocab_trainer::database::{Collection, CollectionUpdate, DictionaryEntry, NewCollection, WordCombination};
use vocab_trainer::dictionary::{CombinationPayload, WordInput};
use vocab_trainer::errors::AppError;
use vocab_trainer::language_utils::language_label;
use vocab_trainer::{ApiError, ApiResponse, Controller};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect dictionary entries
    #[command(subcommand)]
    Entries(EntryCommand),

    /// Manage word combinations
    #[command(subcommand)]
    Combinations(CombinationCommand),

    /// Manage collections and their members
    #[command(subcommand)]
    Collections(CollectionCommand),

    /// Show row counts and database size
    Stats,

    /// Generate shell completions for vocab-trainer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct PageArgs {
    /// Zero-based page index
    #[arg(long, allow_negative_numbers = true)]
    page: Option<i64>,

    /// Rows per page (clamped to the configured maximum)
    #[arg(long)]
    page_size: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum EntryCommand {
    /// List entries, optionally for one language
    List {
        /// Exact language code
        #[arg(short, long)]
        language: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Delete every entry no combination references
    Sweep,
}

#[derive(Subcommand, Debug)]
enum CombinationCommand {
    /// List combinations
    List {
        /// Language pair such as 'en-es' (matches either order)
        #[arg(short, long)]
        languages: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one combination
    Show { id: i64 },

    /// Create a combination from two LANG=WORD arguments
    Add {
        #[arg(value_name = "LANG=WORD", required = true)]
        words: Vec<WordInput>,

        /// Return the stored combination instead of failing on a duplicate
        #[arg(long)]
        allow_existing: bool,
    },

    /// Point a combination at two new words
    Update {
        id: i64,

        #[arg(value_name = "LANG=WORD", required = true)]
        words: Vec<WordInput>,

        /// Return the other combination instead of failing on a duplicate
        #[arg(long)]
        allow_existing: bool,
    },

    /// Delete a combination and its orphaned entries
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum CollectionCommand {
    /// List collections
    List {
        /// Language pair such as 'en-es' (matches either direction)
        #[arg(short, long)]
        languages: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one collection
    Show { id: i64 },

    /// Create a collection
    Create {
        name: String,

        #[arg(long)]
        creator: String,

        /// Language pair such as 'en-es'
        #[arg(short, long)]
        languages: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long)]
        image: Option<String>,
    },

    /// Change collection fields
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        languages: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },

    /// Delete a collection and release its combinations
    Delete { id: i64 },

    /// List the combinations of a collection
    Members {
        id: i64,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Add combinations; words are taken two at a time
    Add {
        id: i64,

        #[arg(value_name = "LANG=WORD", required = true)]
        words: Vec<WordInput>,
    },

    /// Replace a member with the combination for two new words
    UpdateMember {
        id: i64,
        combination_id: i64,

        #[arg(value_name = "LANG=WORD", required = true)]
        words: Vec<WordInput>,
    },

    /// Remove a member from a collection
    RemoveMember { id: i64, combination_id: i64 },
}

/// vocab-trainer - vocabulary trainer storage console
///
/// Administers dictionary entries, word combinations and collections stored
/// in a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "vocab-trainer")]
#[command(version)]
#[command(about = "Vocabulary trainer storage console")]
#[command(long_about = "vocab-trainer manages the dictionary entries, word combinations and collections of a vocabulary trainer.

EXAMPLES:
    vocab-trainer combinations add en=hello es=hola        # Create a combination
    vocab-trainer combinations list -l en-es               # List English/Spanish pairs
    vocab-trainer collections create Animals --creator ana -l en-es
    vocab-trainer collections add 1 en=cat es=gato en=dog es=perro
    vocab-trainer --json collections members 1             # Print the JSON envelope
    vocab-trainer completions bash > vocab-trainer.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", global = true, default_value = "conf.json")]
    config_path: String,

    /// Database file path (overrides the configuration)
    #[arg(long, global = true, env = "VOCAB_TRAINER_DB")]
    database: Option<String>,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the JSON response envelope instead of text
    #[arg(long, global = true)]
    json: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger; the facade's max level does the filtering
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @struct: Renders responses as text or as the JSON envelope
struct Output {
    json: bool,
}

impl Output {
    fn success<T: Serialize>(
        &self,
        response: ApiResponse<T>,
        render: impl FnOnce(&T) -> String,
    ) -> Result<(), AppError> {
        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::Unknown(format!("Failed to serialize response: {}", e)))?;
            println!("{}", json);
            return Ok(());
        }

        println!("{}", response.message);
        if let Some(data) = &response.data {
            let text = render(data);
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Ok(())
    }

    fn failure<E: ApiError>(&self, error: &E) {
        if self.json {
            let response: ApiResponse<()> = ApiResponse::from_error(error);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize error response: {}", e),
            }
        } else {
            error!("{} [{}]", error, error.error_code());
        }
    }
}

fn render_entry(entry: &DictionaryEntry) -> String {
    format!("#{:<6} {} [{}]", entry.id, entry.word, language_label(&entry.language))
}

fn render_combination(combination: &WordCombination) -> String {
    format!(
        "#{:<6} {} = {}",
        combination.id, combination.word1, combination.word2
    )
}

fn render_collection(collection: &Collection) -> String {
    let mut text = format!(
        "#{:<6} {} ({}) by {}",
        collection.id, collection.name, collection.language_combination, collection.creator
    );
    if !collection.description.is_empty() {
        text.push_str(&format!("\n        {}", collection.description));
    }
    text
}

fn render_list<T>(items: &[T], render: fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "vocab-trainer", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    let cli_log_level: Option<app_config::LogLevel> = cli.log_level.clone().map(Into::into);
    if let Some(level) = &cli_log_level {
        log::set_max_level(level.to_level_filter());
    }

    // Load or create configuration, then apply command line overrides
    let mut config = Config::load_or_create(&cli.config_path)?;
    match cli_log_level {
        Some(level) => config.log_level = level,
        None => log::set_max_level(config.log_level.to_level_filter()),
    }
    if let Some(database) = &cli.database {
        config.database.path = Some(database.clone());
    }

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let output = Output { json: cli.json };

    match run_command(&controller, cli.command, &output).await {
        Ok(()) => Ok(()),
        Err(AppError::Dictionary(e)) => {
            output.failure(&e);
            std::process::exit(1);
        }
        Err(AppError::Collection(e)) => {
            output.failure(&e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_command(controller: &Controller, command: Commands, output: &Output) -> Result<(), AppError> {
    match command {
        Commands::Entries(command) => run_entry_command(controller, command, output).await,
        Commands::Combinations(command) => run_combination_command(controller, command, output).await,
        Commands::Collections(command) => run_collection_command(controller, command, output).await,
        Commands::Stats => {
            let stats = controller.stats()?;
            output.success(ApiResponse::ok("Database statistics", stats), |s| s.to_string())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_entry_command(controller: &Controller, command: EntryCommand, output: &Output) -> Result<(), AppError> {
    match command {
        EntryCommand::List { language, page } => {
            let page = controller.page(page.page, page.page_size);
            let entries = controller.entries().list(language.as_deref(), page).await?;
            output.success(
                ApiResponse::ok(format!("{} entries", entries.len()), entries),
                |e| render_list(e, render_entry),
            )
        }
        EntryCommand::Sweep => {
            let removed = controller.entries().sweep_orphans().await?;
            info!("Sweep removed {} orphaned entries", removed);
            output.success(
                ApiResponse::ok(format!("Removed {} orphaned entries", removed), removed),
                |_| String::new(),
            )
        }
    }
}

async fn run_combination_command(
    controller: &Controller,
    command: CombinationCommand,
    output: &Output,
) -> Result<(), AppError> {
    let combinations = controller.combinations();

    match command {
        CombinationCommand::List { languages, page } => {
            let page = controller.page(page.page, page.page_size);
            let list = combinations.list(languages.as_deref(), page).await?;
            output.success(
                ApiResponse::ok(format!("{} combinations", list.len()), list),
                |c| render_list(c, render_combination),
            )
        }
        CombinationCommand::Show { id } => {
            let combination = combinations
                .get(id)
                .await?
                .ok_or(vocab_trainer::DictionaryError::NotFound(id))?;
            output.success(ApiResponse::ok("Word combination", combination), render_combination)
        }
        CombinationCommand::Add { words, allow_existing } => {
            let combination = combinations
                .create(CombinationPayload::new(words), allow_existing)
                .await?;
            output.success(
                ApiResponse::created("Word combination stored", combination),
                render_combination,
            )
        }
        CombinationCommand::Update { id, words, allow_existing } => {
            let combination = combinations
                .update(id, CombinationPayload::new(words), allow_existing)
                .await?;
            output.success(
                ApiResponse::ok("Word combination updated", combination),
                render_combination,
            )
        }
        CombinationCommand::Delete { id } => {
            let deleted = combinations.delete(id).await?;
            output.success(
                ApiResponse::deleted(format!("Deleted word combination {}", deleted), deleted.id),
                |_| String::new(),
            )
        }
    }
}

async fn run_collection_command(
    controller: &Controller,
    command: CollectionCommand,
    output: &Output,
) -> Result<(), AppError> {
    let collections = controller.collections();

    match command {
        CollectionCommand::List { languages, page } => {
            let page = controller.page(page.page, page.page_size);
            let list = collections.list_collections(languages.as_deref(), page).await?;
            output.success(
                ApiResponse::ok(format!("{} collections", list.len()), list),
                |c| render_list(c, render_collection),
            )
        }
        CollectionCommand::Show { id } => {
            let collection = collections.get_collection(id).await?;
            output.success(ApiResponse::ok("Collection", collection), render_collection)
        }
        CollectionCommand::Create { name, creator, languages, description, image } => {
            let collection = collections
                .create_collection(NewCollection {
                    name,
                    description,
                    creator,
                    language_combination: languages,
                    image,
                })
                .await?;
            output.success(ApiResponse::created("Collection created", collection), render_collection)
        }
        CollectionCommand::Update { id, name, description, languages, image } => {
            let collection = collections
                .update_collection(
                    id,
                    CollectionUpdate {
                        name,
                        description,
                        language_combination: languages,
                        image,
                    },
                )
                .await?;
            output.success(ApiResponse::ok("Collection updated", collection), render_collection)
        }
        CollectionCommand::Delete { id } => {
            let deleted = collections.delete_collection(id).await?;
            output.success(
                ApiResponse::deleted(format!("Deleted collection '{}'", deleted.name), deleted.id),
                |_| String::new(),
            )
        }
        CollectionCommand::Members { id, page } => {
            let page = controller.page(page.page, page.page_size);
            let members = collections.list_members(id, page).await?;
            output.success(
                ApiResponse::ok(format!("{} combinations in collection {}", members.len(), id), members),
                |m| render_list(m, render_combination),
            )
        }
        CollectionCommand::Add { id, words } => {
            let payloads = words
                .chunks(2)
                .map(|pair| CombinationPayload::new(pair.to_vec()))
                .collect();
            let added = collections.add_combinations(id, payloads).await?;
            output.success(
                ApiResponse::created(format!("Added {} combinations", added.len()), added),
                |a| render_list(a, render_combination),
            )
        }
        CollectionCommand::UpdateMember { id, combination_id, words } => {
            let combination = collections
                .update_member(id, combination_id, CombinationPayload::new(words))
                .await?;
            output.success(
                ApiResponse::ok("Collection member updated", combination),
                render_combination,
            )
        }
        CollectionCommand::RemoveMember { id, combination_id } => {
            let removed = collections.remove_member(id, combination_id).await?;
            output.success(
                ApiResponse::deleted(
                    format!("Removed {} from collection {}", removed, id),
                    removed.id,
                ),
                |_| String::new(),
            )
        }
    }
}
