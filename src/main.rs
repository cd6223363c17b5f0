use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use affinity::config::{DiagnoseOptions, NetworkOptions, TextOptions, DEFAULT_MAX_FOLLOWERS, DEFAULT_SEED};
use affinity::network::NetworkMethod;
use affinity::text::TextMethod;

/// Affinity: brand affinity scoring for social accounts.
///
/// Scores brand accounts against a curated set of exemplar accounts using
/// follower-network overlap or discriminative tweet text, and validates
/// scoring methods against ground truth.
#[derive(Parser)]
#[command(name = "affinity", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score brands by follower-network overlap with the exemplars
    Network {
        /// File of follower data for brand accounts
        #[arg(long)]
        brand_followers: PathBuf,

        /// File of follower data for exemplar accounts
        #[arg(long)]
        exemplar_followers: PathBuf,

        /// File to store one "<handle> <score>" line per brand
        #[arg(short, long)]
        output: PathBuf,

        /// Similarity method
        #[arg(long, value_enum, default_value = "jaccard")]
        method: NetworkMethod,

        /// Ignore exemplars with at most this many followers
        #[arg(long, default_value = "0")]
        min_followers: usize,

        /// Ignore exemplars with more than this many followers
        #[arg(long, default_value_t = DEFAULT_MAX_FOLLOWERS)]
        max_followers: usize,

        /// Keep only this percentage of exemplars, sampled uniformly
        #[arg(long, default_value = "100")]
        sample_exemplars: f64,

        /// Seed for exemplar sampling
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Score brands by coverage of discriminative tweet bigrams
    Text {
        /// File of tweets from brand accounts (NDJSON, .gz supported)
        #[arg(long)]
        brand_tweets: PathBuf,

        /// File of tweets from exemplar accounts
        #[arg(long)]
        exemplar_tweets: PathBuf,

        /// File of tweets from a representative background sample
        #[arg(long)]
        sample_tweets: PathBuf,

        /// File to store one "<handle> <score>" line per brand
        /// (a "<output>.topwords" audit file is written alongside)
        #[arg(short, long)]
        output: PathBuf,

        /// Term selection method
        #[arg(long, value_enum, default_value = "chi2")]
        method: TextMethod,

        /// How many discriminative terms to keep
        #[arg(long, default_value = "300")]
        top_terms: usize,

        /// Minimum exemplar documents a bigram must appear in
        #[arg(long, default_value = "3")]
        min_df: usize,
    },

    /// Correlate a scoring method against ground truth, per exemplar
    Diagnose {
        /// File of follower data for brand accounts
        #[arg(long)]
        brand_followers: PathBuf,

        /// File of follower data for exemplar accounts
        #[arg(long)]
        exemplar_followers: PathBuf,

        /// File of trusted third-party scores per brand handle
        #[arg(long)]
        validation: PathBuf,

        /// File to store the tab-separated per-exemplar report
        #[arg(short, long)]
        output: PathBuf,

        /// Similarity method to diagnose
        #[arg(long, value_enum, default_value = "jaccard")]
        method: NetworkMethod,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("affinity=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Network {
            brand_followers,
            exemplar_followers,
            output,
            method,
            min_followers,
            max_followers,
            sample_exemplars,
            seed,
        } => {
            let opts = NetworkOptions {
                brand_followers,
                exemplar_followers,
                output,
                method,
                min_followers,
                max_followers,
                sample_exemplars,
                seed,
            };
            let scores = affinity::network::run(&opts)?;
            println!(
                "{}",
                format!(
                    "Scored {} brands; results in {}",
                    scores.len(),
                    opts.output.display()
                )
                .bold()
            );
        }

        Commands::Text {
            brand_tweets,
            exemplar_tweets,
            sample_tweets,
            output,
            method,
            top_terms,
            min_df,
        } => {
            let opts = TextOptions {
                brand_tweets,
                exemplar_tweets,
                sample_tweets,
                output,
                method,
                top_terms,
                min_df,
            };
            let scores = affinity::text::run(&opts)?;
            println!(
                "{}",
                format!(
                    "Scored {} brands; results in {} (+ .topwords audit file)",
                    scores.len(),
                    opts.output.display()
                )
                .bold()
            );
        }

        Commands::Diagnose {
            brand_followers,
            exemplar_followers,
            validation,
            output,
            method,
        } => {
            let opts = DiagnoseOptions {
                brand_followers,
                exemplar_followers,
                validation,
                output,
                method,
            };
            let overall = affinity::diagnose::run(&opts)?;
            println!(
                "{}",
                format!(
                    "Diagnostic report in {} (overall correlation {overall:.4})",
                    opts.output.display()
                )
                .bold()
            );
        }
    }

    Ok(())
}
