//! # Tanya CLI (`tanya`)
//!
//! Command-line front end over the template matching engine. Templates
//! are loaded from a CSV directory on every invocation.
//!
//! ## Usage
//!
//! ```bash
//! # Resolve a query to its best answer
//! tanya match "jam berapa buka" --dir data/templates
//!
//! # Inspect ranked candidates without resolving
//! tanya search "lokasi kantor" --limit 5
//!
//! # Engine status as JSON
//! tanya status
//!
//! # Try out a template against the loaded collection
//! tanya add "Apa itu AI?" "Kecerdasan buatan" --category General
//! ```
//!
//! Exit code 0 means an answer or at least one hit was produced, 1 means
//! no match, 2 means a load or validation failure.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tanya::{Matcher, MatcherConfig, TanyaError, TanyaResult, DEFAULT_SEARCH_LIMIT};

/// Template matching engine over CSV question/answer collections.
#[derive(Parser)]
#[command(
    name = "tanya",
    about = "Route user utterances to curated answers via exact, fuzzy, and keyword matching",
    version
)]
struct Cli {
    /// Directory scanned for `.csv` template sources.
    #[arg(long, global = true, default_value = "data/templates")]
    dir: PathBuf,

    /// Similarity threshold for the fuzzy strategy (0 to 100).
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Candidate bound applied after ranking.
    #[arg(long, global = true)]
    max_matches: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve a query and print the best answer.
    Match {
        /// The user utterance to resolve.
        query: String,
    },

    /// Print ranked candidate hits with scores and strategies.
    Search {
        /// The user utterance to rank against.
        query: String,

        /// Maximum number of hits to print.
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Print engine status as JSON.
    Status,

    /// Append a template for this run, then resolve its question back.
    ///
    /// The collection is rebuilt from the CSV sources on the next
    /// invocation; persist new templates by editing the sources.
    Add {
        /// Canonical question text.
        question: String,

        /// Answer text.
        answer: String,

        /// Category label.
        #[arg(long, default_value = "General")]
        category: String,

        /// Rank weight; higher wins ties.
        #[arg(long, default_value_t = 1)]
        priority: i32,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(2);
    }
}

fn run(cli: Cli) -> TanyaResult<()> {
    let mut config = MatcherConfig::new(&cli.dir);
    if let Some(threshold) = cli.threshold {
        config = config.with_similarity_threshold(threshold);
    }
    if let Some(max_matches) = cli.max_matches {
        config = config.with_max_matches(max_matches);
    }
    let matcher = Matcher::new(config)?;

    match cli.command {
        Commands::Match { query } => match matcher.find_match(&query) {
            Some(answer) => println!("{answer}"),
            None => {
                eprintln!("no match");
                process::exit(1);
            }
        },
        Commands::Search { query, limit } => {
            let hits = matcher.search(&query, limit);
            if hits.is_empty() {
                eprintln!("no hits");
                process::exit(1);
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "{:>2}. [{:>5.1} {:<7}] {} ({}): {}",
                    rank + 1,
                    hit.score.value(),
                    hit.method.to_string(),
                    hit.question,
                    hit.category,
                    hit.answer
                );
            }
        }
        Commands::Status => {
            let status = serde_json::to_string_pretty(&matcher.status())
                .map_err(|err| TanyaError::internal(err.to_string()))?;
            println!("{status}");
        }
        Commands::Add {
            question,
            answer,
            category,
            priority,
        } => {
            let id = matcher.try_add_template(&question, &answer, &category, priority)?;
            println!("added template {id} ({} loaded)", matcher.template_count());
            // A higher-priority template can shadow the one just added.
            match matcher.find_match(&question) {
                Some(resolved) => println!("resolves to: {resolved}"),
                None => eprintln!("warning: the added question does not resolve"),
            }
        }
    }
    Ok(())
}
