use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use common::config::{DEFAULT_API_BASE_URL, DEFAULT_DB_PATH, DEFAULT_MODEL};
use common::llm::{GeminiProvider, ModelConfig};
use common::seed::{seed_database, SeedConfig};
use common::tracing::init_tracing;
use common::{AppConfig, Database, Pipeline};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "tunequery")]
#[command(about = "ask questions about a music database in plain language", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// SQLite database file
    #[arg(long = "db", global = true, env = "TUNEQUERY_DB_PATH", default_value = DEFAULT_DB_PATH)]
    database: PathBuf,

    /// API key for the text-completion provider
    #[arg(long, global = true, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, global = true, env = "TUNEQUERY_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Provider API base url
    #[arg(long, global = true, env = "TUNEQUERY_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Refuse statements that modify the database
    #[arg(long, global = true, env = "TUNEQUERY_READ_ONLY", default_value = "false")]
    read_only: bool,
}

impl From<GlobalArgs> for AppConfig {
    fn from(args: GlobalArgs) -> Self {
        Self {
            database_path: args.database,
            api_key: args.api_key,
            model: args.model,
            api_base_url: args.api_base_url,
            read_only: args.read_only,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// Question in plain language
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Ask questions interactively, one per line
    Chat,
    /// Recreate the database with synthetic artists, albums and tracks
    Seed {
        /// Number of artists to generate
        #[arg(long, default_value = "10")]
        artists: usize,

        /// Seed for reproducible sample data
        #[arg(long)]
        rng_seed: Option<u64>,
    },
    /// Print the schema handed to the language model
    Schema,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let _guard = init_tracing("tunequery")?;
        let config = AppConfig::from(self.global);
        tracing::debug!(?config, "configuration resolved");

        match self.command {
            Commands::Ask { question } => {
                let pipeline = build_pipeline(&config).await?;
                let answer = pipeline.ask(&question.join(" ")).await;
                println!("{}", crate::render::interaction(&answer));
                Ok(())
            }
            Commands::Chat => chat(&config).await,
            Commands::Seed { artists, rng_seed } => seed(&config, artists, rng_seed).await,
            Commands::Schema => print_schema(&config).await,
        }
    }
}

fn database(config: &AppConfig) -> Database {
    Database::new(&config.database_path).read_only(config.read_only)
}

/// startup: credential check, provider, then the one-time schema load
async fn build_pipeline(config: &AppConfig) -> Result<Pipeline> {
    let api_key = config.api_key()?;
    let model = ModelConfig::new(&config.model).with_base_url(&config.api_base_url);
    let provider = GeminiProvider::new(api_key, model)?;

    let pipeline = Pipeline::load(database(config), Arc::new(provider))
        .await
        .with_context(|| format!("cannot load schema from {}", config.database_path.display()))?;

    tracing::info!(tables = pipeline.schema().tables.len(), model = %config.model, "ready");
    Ok(pipeline)
}

async fn chat(config: &AppConfig) -> Result<()> {
    let pipeline = build_pipeline(config).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Ask me about artists, albums, or tracks (type 'exit' to quit).");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        let answer = pipeline.ask(&line).await;
        println!("{}\n", crate::render::interaction(&answer));
    }

    Ok(())
}

async fn seed(config: &AppConfig, artists: usize, rng_seed: Option<u64>) -> Result<()> {
    let db = Database::new(&config.database_path);
    let seed_config = SeedConfig {
        artists,
        rng_seed,
        ..SeedConfig::default()
    };

    let summary = tokio::task::spawn_blocking(move || seed_database(&db, &seed_config))
        .await
        .context("seed task failed")??;

    println!(
        "Database created successfully! ({} artists, {} albums, {} tracks in {})",
        summary.artists,
        summary.albums,
        summary.tracks,
        config.database_path.display()
    );
    Ok(())
}

async fn print_schema(config: &AppConfig) -> Result<()> {
    let db = database(config);
    let schema = tokio::task::spawn_blocking(move || {
        let conn = db.connect()?;
        common::schema::describe_schema(&conn)
    })
    .await
    .context("schema task failed")??;

    println!("{}", schema.render());

    let catalog = common::schema::ColumnCatalog::from_schema(&schema);
    println!();
    for (table, columns) in catalog.iter() {
        println!("{}({})", table, columns.join(", "));
    }
    Ok(())
}
