//! review-sentiment CLI: score, categorize and bucket customer reviews.
//!
//! Usage:
//!   review-sentiment run [--db path | --input reviews.csv] [--output out.csv]
//!   review-sentiment score <TEXT>... [--rating N]
//!   review-sentiment classify <SCORE> <RATING>

use clap::{Parser, Subcommand};
use review_sentiment::{
    bucket, categorize, BatchOrchestrator, CsvReviewSource, CsvSink, ErrorPolicy, LexiconScorer,
    OutputSink, PipelineConfig, Rating, ReviewSource, SentimentScorer, SourceConfig,
    SqliteReviewSource,
};
use serde_json::json;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "review-sentiment",
    version,
    about = "Sentiment classification and bucketing for customer reviews"
)]
struct Cli {
    /// More log output on stderr (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a review table and write the result as CSV
    Run {
        /// SQLite database holding the customer_reviews table
        #[arg(long, conflicts_with = "input")]
        db: Option<PathBuf>,
        /// CSV file of reviews instead of a database
        #[arg(long)]
        input: Option<PathBuf>,
        /// Query selecting ReviewID, CustomerID, ProductID, ReviewDate, Rating, ReviewText
        #[arg(long, requires = "db")]
        query: Option<String>,
        /// Output CSV path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Config file (default: ~/.config/review-sentiment/config.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Tab-separated lexicon file
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Maximum reviews scored at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Leave out reviews with an invalid rating instead of failing
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Score text and print the result as JSON
    Score {
        /// Text to score; each argument is scored separately
        #[arg(required = true)]
        text: Vec<String>,
        /// Star rating, to also report the category
        #[arg(long)]
        rating: Option<i64>,
        /// Tab-separated lexicon file
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
    /// Categorize and bucket a known score and rating
    Classify {
        /// Sentiment score in [-1.0, 1.0]
        #[arg(allow_negative_numbers = true)]
        score: f64,
        /// Star rating, 1 to 5
        rating: i64,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_scorer(lexicon: Option<&Path>) -> Result<Arc<dyn SentimentScorer>, String> {
    let scorer = match lexicon {
        Some(path) => {
            let scorer = LexiconScorer::from_path(path).map_err(|e| e.to_string())?;
            info!(path = %path.display(), words = scorer.len(), "loaded lexicon");
            scorer
        }
        None => LexiconScorer::new(),
    };
    Ok(Arc::new(scorer))
}

fn open_source(
    db: Option<PathBuf>,
    input: Option<PathBuf>,
    query: Option<String>,
    configured: Option<SourceConfig>,
) -> Result<Box<dyn ReviewSource>, String> {
    let source = match (db, input) {
        (Some(path), _) => SourceConfig::Sqlite { path, query },
        (None, Some(path)) => SourceConfig::Csv { path },
        (None, None) => configured
            .ok_or("no review source: pass --db or --input, or set `source` in the config")?,
    };
    match source {
        SourceConfig::Sqlite { path, query } => {
            let source = SqliteReviewSource::open(&path)
                .map_err(|e| format!("failed to open database {}: {}", path.display(), e))?;
            Ok(Box::new(match query {
                Some(query) => source.with_query(query),
                None => source,
            }))
        }
        SourceConfig::Csv { path } => Ok(Box::new(CsvReviewSource::new(path))),
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {}", e))
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    db: Option<PathBuf>,
    input: Option<PathBuf>,
    query: Option<String>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    lexicon: Option<PathBuf>,
    concurrency: Option<usize>,
    skip_invalid: bool,
) -> i32 {
    let mut config = match PipelineConfig::load_or_default(config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if concurrency.is_some() {
        config.concurrency = concurrency;
    }
    if skip_invalid {
        config.error_policy = ErrorPolicy::SkipInvalid;
    }
    if lexicon.is_some() {
        config.scorer.lexicon = lexicon;
    }
    if output.is_some() {
        config.output = output;
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return 1;
    }
    debug!(?config, "effective configuration");

    let scorer = match load_scorer(config.scorer.lexicon.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let source = match open_source(db, input, query, config.source.clone()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let orchestrator: BatchOrchestrator = config.orchestrator(scorer);
    let runtime = match build_runtime() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let outcome = match runtime.block_on(orchestrator.run_source(source.as_ref())) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    // The output file is only created once the batch has succeeded, so a
    // failed run leaves any earlier table in place.
    let mut sink: Box<dyn OutputSink> = match &config.output {
        Some(path) => match CsvSink::<File>::create(path) {
            Ok(s) => Box::new(s),
            Err(e) => {
                eprintln!("Error: cannot create '{}': {}", path.display(), e);
                return 1;
            }
        },
        None => Box::new(CsvSink::new(std::io::stdout())),
    };
    if let Err(e) = sink.write_table(&outcome.records) {
        eprintln!("Error: {}", e);
        return 1;
    }
    let summary = outcome.summary();
    info!(run_id = %summary.run_id, written = summary.written, "batch written");
    eprint!("{}", summary);
    0
}

fn cmd_score(text: &[String], rating: Option<i64>, lexicon: Option<&Path>) -> i32 {
    let rating = match rating.map(Rating::new).transpose() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let scorer = match load_scorer(lexicon) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let adapter = PipelineConfig::default().score_adapter(scorer);
    let runtime = match build_runtime() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    for item in text {
        let score = match runtime.block_on(adapter.score(item)) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        let mut line = json!({
            "text": item,
            "score": score,
            "bucket": bucket(score),
        });
        if let Some(rating) = rating {
            line["rating"] = json!(rating);
            line["category"] = json!(categorize(score, rating));
        }
        println!("{}", line);
    }
    0
}

fn cmd_classify(score: f64, rating: i64) -> i32 {
    if !(-1.0..=1.0).contains(&score) {
        eprintln!("Error: score {} is outside [-1.0, 1.0]", score);
        return 1;
    }
    let rating = match Rating::new(rating) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let line = json!({
        "score": score,
        "rating": rating,
        "category": categorize(score, rating),
        "bucket": bucket(score),
    });
    println!("{}", line);
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let code = match cli.command {
        Commands::Run {
            db,
            input,
            query,
            output,
            config,
            lexicon,
            concurrency,
            skip_invalid,
        } => cmd_run(db, input, query, output, config, lexicon, concurrency, skip_invalid),
        Commands::Score {
            text,
            rating,
            lexicon,
        } => cmd_score(&text, rating, lexicon.as_deref()),
        Commands::Classify { score, rating } => cmd_classify(score, rating),
    };
    std::process::exit(code);
}
