use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use glossary_search::cache::ResultCache;
use glossary_search::output;
use glossary_search::query::{SearchEngine, SearchOptions, SortBy};
use glossary_search::terms::{JsonTermsFile, ValidationStatus, validate_groups};
use glossary_search::utils::{AppConfig, get_config_path};

#[derive(Parser)]
#[command(name = "gsearch")]
#[command(about = "Fuzzy search over a Korean/English glossary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search terms (an empty query lists every term)
    Search {
        /// Search query
        query: Vec<String>,

        #[command(flatten)]
        data: DataArgs,

        /// Only terms with this status (draft, proposed, validated, deprecated)
        #[arg(long)]
        status: Option<ValidationStatus>,

        /// Result order (relevance, alphabetical, date)
        #[arg(long)]
        sort: Option<SortBy>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Fuzzy match tolerance in [0, 1]
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Disable approximate matching
        #[arg(long)]
        no_fuzzy: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Check the terms data for missing fields, duplicates and ordering
    Validate {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Show or update the saved configuration
    Config {
        /// Default terms JSON file or directory
        #[arg(long)]
        data_path: Option<PathBuf>,

        /// Maximum number of cached queries
        #[arg(long)]
        cache_capacity: Option<usize>,

        /// Default fuzzy match tolerance
        #[arg(long)]
        threshold: Option<f32>,

        /// Tag wrapped around highlighted substrings
        #[arg(long)]
        highlight_tag: Option<String>,
    },
    /// Run queries twice and show index and cache statistics
    Stats {
        /// Queries to run
        query: Vec<String>,

        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Terms JSON file or directory (defaults to data_path in the config)
    #[arg(short, long)]
    data: Option<PathBuf>,
}

impl DataArgs {
    fn resolve(&self, config: &AppConfig) -> Result<JsonTermsFile> {
        match self.data.as_ref().or(config.data_path.as_ref()) {
            Some(path) => Ok(JsonTermsFile::new(path)),
            None => bail!("No terms data: pass --data or set data_path in the config file"),
        }
    }
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load config")?;

    match cli.command {
        Commands::Search {
            query,
            data,
            status,
            sort,
            limit,
            threshold,
            no_fuzzy,
            json,
            no_color,
        } => {
            let mut options = SearchOptions {
                status,
                threshold,
                limit,
                sort_by: sort,
                ..SearchOptions::default()
            };
            if no_fuzzy {
                options.fuzzy = Some(false);
            }

            let mut engine = load_engine(&data, &config)?;
            let results = engine.search(&query.join(" "), &options);

            if json {
                println!("{}", serde_json::to_string_pretty(&*results)?);
            } else {
                let mut out = output::stdout(!no_color);
                output::write_results(&mut out, &results, &config.highlight_tag)?;
            }
        }
        Commands::Validate { data } => {
            let source = data.resolve(&config)?;
            let groups = source
                .read_groups()
                .with_context(|| format!("Failed to read {}", source.path().display()))?;
            let issues = validate_groups(&groups);

            let mut out = output::stdout(true);
            output::write_issues(&mut out, &issues)?;
            if !issues.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config {
            data_path,
            cache_capacity,
            threshold,
            highlight_tag,
        } => {
            let mut config = config;
            let changed = data_path.is_some()
                || cache_capacity.is_some()
                || threshold.is_some()
                || highlight_tag.is_some();

            if let Some(path) = data_path {
                let path = path
                    .canonicalize()
                    .with_context(|| format!("Data path not found: {}", path.display()))?;
                config.data_path = Some(path);
            }
            if let Some(capacity) = cache_capacity {
                config.cache_capacity = capacity;
            }
            if let Some(threshold) = threshold {
                config.default_threshold = threshold;
            }
            if let Some(tag) = highlight_tag {
                config.highlight_tag = tag;
            }

            if changed {
                config.save()?;
                println!("Saved config to {}", get_config_path()?.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Stats { query, data } => {
            let mut engine = load_engine(&data, &config)?;
            let options = SearchOptions::new();
            for q in &query {
                engine.search(q, &options);
                engine.search(q, &options);
            }

            let mut out = output::stdout(true);
            output::write_stats(&mut out, &engine.stats())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_engine(data: &DataArgs, config: &AppConfig) -> Result<SearchEngine> {
    let source = data.resolve(config)?;
    let path = source.path().to_path_buf();
    let cache = Arc::new(ResultCache::new(config.cache_config()));

    SearchEngine::load(Arc::new(source), cache, config.engine_config())
        .with_context(|| format!("Failed to load terms from {}", path.display()))
}
