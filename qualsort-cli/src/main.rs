mod config;
mod llm;
mod output;
mod prompt;

use clap::{Parser, ValueEnum};
use qualsort_core::{
    Cache, FileCache, Judge, MockJudge, ProgressEvent, QualitativeSorter, SorterConfig,
    DEFAULT_NOISE_STDDEV,
};
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use crate::llm::{HttpJudge, LlmConfig};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "qualsort", version, about = "Rank items by a qualitative criterion using LLM pairwise comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank items under a qualitative criterion
    Sort(SortArgs),
    /// Create a default config file at ~/.config/qualsort/config.toml
    Init,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Rank table with win counts
    Table,
    /// Full result as JSON
    Json,
    /// Items best-to-worst, one per line
    List,
    /// Percentiles with S/A/B/C/D tiers
    Tiers,
}

#[derive(Parser)]
struct SortArgs {
    /// The qualitative criterion (e.g. "Which prose is stronger?")
    #[arg(long)]
    criteria: String,

    /// File with one item per line (or a JSON array of strings)
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// OpenAI-compatible base URL (e.g. http://localhost:8000)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token for the API (also reads OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Model ID for the API
    #[arg(long)]
    model: Option<String>,

    /// Losses before a participant is eliminated
    #[arg(long)]
    elimination_count: Option<usize>,

    /// Comparison rounds per match (even values balance order exposure)
    #[arg(long)]
    rounds: Option<usize>,

    /// Max concurrent LLM requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Seed for the pairing shuffle (reproducible schedules)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the persistent comparison cache
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Use the offline mock judge instead of an API (items must be numeric)
    #[arg(long)]
    mock: bool,

    /// LLM sampling temperature. Default: 0.3
    #[arg(long)]
    temperature: Option<f64>,

    /// Max retries per comparison on transport errors. Default: 3
    #[arg(long)]
    retries: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: Format,

    /// Show progress during execution
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/qualsort/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Parse a string as either a JSON array of strings or plain text (one item per line).
fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        // Try JSON array
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    } else {
        // Plain text, one item per line
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Load items from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &SortArgs) -> Vec<String> {
    let mut items = Vec::new();

    // From file (auto-detects JSON array vs one-per-line)
    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_from_str(&content);
    }

    // From inline --item flags
    items.extend(args.inline_items.iter().cloned());

    // From stdin (only if no file and no inline items)
    if items.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No items provided. Use --items <file>, --item <text>, or pipe items via stdin.");
        }
        let content: String = stdin
            .lock()
            .lines()
            .map(|l| l.unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}"))))
            .collect::<Vec<_>>()
            .join("\n");
        items = parse_items_from_str(&content);
    }

    if items.is_empty() {
        bail("No items found in the provided input.");
    }
    items
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sort(args) => run_sort(args).await,
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default endpoint, model, etc.");
        }
    }
}

async fn run_sort(args: SortArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let items = load_items(&args);

    let judge: Arc<dyn Judge> = if args.mock {
        Arc::new(MockJudge::new(args.seed, DEFAULT_NOISE_STDDEV))
    } else {
        let endpoint = args.endpoint.clone().or(cfg.endpoint).unwrap_or_else(|| {
            bail(format!(
                "No endpoint specified. Pass --endpoint, set it in {}, or use --mock.",
                config_path.display()
            ));
        });
        let model = args.model.clone().or(cfg.model).unwrap_or_else(|| {
            bail(format!(
                "No model specified. Pass --model or set it in {}.",
                config_path.display()
            ));
        });
        let api_key = args
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        Arc::new(HttpJudge::new(
            LlmConfig {
                endpoint,
                model,
                api_key,
                temperature: args.temperature.unwrap_or(0.3),
            },
            args.retries.unwrap_or(3),
        ))
    };

    let mut sorter_config = SorterConfig::new(&args.criteria);
    if let Some(count) = args.elimination_count.or(cfg.elimination_count) {
        sorter_config.elimination_count = count;
    }
    if let Some(rounds) = args.rounds.or(cfg.comparison_rounds) {
        sorter_config.comparison_rounds = rounds;
    }
    if let Some(concurrency) = args.concurrency.or(cfg.concurrency) {
        sorter_config.max_concurrent_requests = concurrency;
    }
    sorter_config.seed = args.seed;

    if args.verbose {
        eprintln!(
            "Ranking {} items (criterion: \"{}\", elimination after {} losses, {} rounds/match)",
            items.len(),
            args.criteria,
            sorter_config.elimination_count,
            sorter_config.comparison_rounds,
        );
    }

    let mut sorter = QualitativeSorter::new(judge, sorter_config);

    let cache_dir = args
        .cache_dir
        .clone()
        .or_else(|| cfg.cache_dir.map(PathBuf::from));
    if let Some(dir) = cache_dir {
        let cache: Arc<dyn Cache> = Arc::new(
            FileCache::new(&dir)
                .unwrap_or_else(|e| bail(format!("Failed to open cache at {}: {e}", dir.display()))),
        );
        sorter = sorter.with_cache(cache);
    }

    if args.verbose {
        let progress = |event: &ProgressEvent| {
            eprintln!("  [{}/{}] {}", event.completed, event.total, event.message);
        };
        sorter = sorter.with_progress_sink(Arc::new(progress));
    }

    let result = sorter
        .sort(&items)
        .await
        .unwrap_or_else(|e| bail(e));

    match args.format {
        Format::Table => output::print_table(&result),
        Format::Json => output::print_json(&result),
        Format::List => output::print_list(&result, &items),
        Format::Tiers => output::print_tiers(&result),
    }
}
