use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "availarr")]
#[command(author, version, about = "Streaming availability and curated list lookups")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a title is streaming on the given providers
    Check {
        /// Title to look up
        #[arg(required = true)]
        title: String,

        /// Release year
        #[arg(short, long)]
        year: u16,

        /// Media type (movie or show)
        #[arg(short, long, default_value = "movie")]
        media_type: String,

        /// Provider technical names; "any" matches every service
        #[arg(short, long = "provider", default_value = "any")]
        providers: Vec<String>,

        /// Country code (defaults to justwatch.country)
        #[arg(long)]
        country: Option<String>,

        /// Language code (defaults to justwatch.language)
        #[arg(long)]
        language: Option<String>,
    },

    /// Run a raw title search and print the candidates
    Search {
        /// Title to search for
        #[arg(required = true)]
        title: String,

        /// Maximum number of candidates
        #[arg(long, default_value = "5")]
        max_results: usize,

        /// Only return the best offer per service
        #[arg(long)]
        best_only: bool,

        /// Country code (defaults to justwatch.country)
        #[arg(long)]
        country: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Aggregate the mdblist lists configured for a library
    Lists {
        /// Media type (movie or show); defaults to each library's own
        #[arg(short, long)]
        media_type: Option<String>,

        /// Library whose lists to use (defaults to every library with lists)
        #[arg(short, long)]
        library: Option<String>,
    },

    /// Print the provider technical names offered for sample titles
    Providers {
        /// Samples as TITLE:YEAR
        #[arg(required = true)]
        samples: Vec<String>,

        /// Media type (movie or show)
        #[arg(short, long, default_value = "show")]
        media_type: String,

        /// Country code (defaults to justwatch.country)
        #[arg(long)]
        country: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        path: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Split a `TITLE:YEAR` sample on its last colon.
pub fn parse_sample(sample: &str) -> Option<(String, u16)> {
    let (title, year) = sample.rsplit_once(':')?;
    let year = year.trim().parse().ok()?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some((title.to_string(), year))
}
