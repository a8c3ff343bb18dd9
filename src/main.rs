mod cli;

use availarr::{
    config,
    justwatch::{AvailabilityResolver, JustWatchClient, ResolverRegistry},
    mdblist::{ListAggregator, MdblistClient},
};
use availarr_common::MediaType;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "availarr=trace,availarr_common=debug".to_string()
        } else {
            "availarr=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check {
            title,
            year,
            media_type,
            providers,
            country,
            language,
        } => block_on(check(
            config_path,
            &title,
            year,
            &media_type,
            &providers,
            country.as_deref(),
            language.as_deref(),
        )),
        Commands::Search {
            title,
            max_results,
            best_only,
            country,
            json,
        } => block_on(search(
            config_path,
            &title,
            max_results,
            best_only,
            country.as_deref(),
            json,
        )),
        Commands::Lists { media_type, library } => block_on(lists(
            config_path,
            media_type.as_deref(),
            library.as_deref(),
        )),
        Commands::Providers {
            samples,
            media_type,
            country,
        } => block_on(providers(config_path, &samples, &media_type, country.as_deref())),
        Commands::Validate { path } => validate_config(path.as_deref().or(config_path)),
        Commands::Version => {
            println!("availarr {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

fn resolver(
    settings: &config::JustWatchSettings,
    country: Option<&str>,
    language: Option<&str>,
) -> Result<Arc<AvailabilityResolver>> {
    ResolverRegistry::new(settings.clone())
        .resolver_for(country, language)
        .context("No country configured; pass --country or set justwatch.country")
}

async fn check(
    config_path: Option<&Path>,
    title: &str,
    year: u16,
    media_type: &str,
    providers: &[String],
    country: Option<&str>,
    language: Option<&str>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let media_type: MediaType = media_type.parse()?;
    let resolver = resolver(&config.justwatch, country, language)?;

    match resolver.match_title_and_year(title, year, media_type).await {
        Some(result) => {
            println!(
                "Matched: {} ({})",
                result.title,
                result
                    .release_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
            let offers: Vec<&str> = result
                .offers
                .iter()
                .map(|o| o.provider_technical_name.as_str())
                .collect();
            println!("Offers: {}", offers.join(", "));
        }
        None => println!("No match for {} ({})", title, year),
    }

    let available = resolver
        .is_available_on(title, year, media_type, providers)
        .await;
    println!(
        "{} on [{}]: {}",
        if available { "Available" } else { "Not available" },
        providers.join(", "),
        available
    );

    Ok(())
}

async fn search(
    config_path: Option<&Path>,
    title: &str,
    max_results: usize,
    best_only: bool,
    country: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let settings = &config.justwatch;
    let country = country
        .or(settings.country.as_deref())
        .context("No country configured; pass --country or set justwatch.country")?;

    let client = JustWatchClient::with_options(
        country,
        &settings.language,
        &settings.endpoint,
        Duration::from_secs(settings.timeout_secs),
    );
    let resolver = AvailabilityResolver::new(Arc::new(client));
    let results = resolver.search(title, max_results, best_only).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&*results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for {}", title);
    }
    for (i, result) in results.iter().enumerate() {
        print!("[{}] {}", i, result.title);
        if let Some(year) = result.release_year {
            print!(" ({})", year);
        }
        if let Some(ref object_type) = result.object_type {
            print!(" [{}]", object_type);
        }
        println!();
        for offer in &result.offers {
            print!("      {}", offer.provider_technical_name);
            if let Some(ref monetization) = offer.monetization_type {
                print!(" ({})", monetization);
            }
            println!();
        }
    }

    Ok(())
}

async fn lists(
    config_path: Option<&Path>,
    media_type: Option<&str>,
    library: Option<&str>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let settings = config
        .mdblist
        .as_ref()
        .context("[mdblist] is not configured")?;

    let libraries: Vec<&config::LibraryConfig> = match library {
        Some(name) => vec![config
            .library(name)
            .with_context(|| format!("Library '{}' is not configured", name))?],
        None => config.libraries.iter().collect(),
    };

    let aggregator = ListAggregator::new(MdblistClient::with_options(
        &settings.api_key,
        &settings.base_url,
        Duration::from_secs(settings.timeout_secs),
        settings.ssl_verify,
    ));

    for library in libraries {
        let Some(list_config) = library.exclude.mdblist.as_ref() else {
            continue;
        };
        // Each library is keyed by its own id source unless overridden
        let media_type = media_type
            .map(str::to_string)
            .unwrap_or_else(|| library.media_type.to_string());
        println!("# {} ({})", library.name, media_type);

        let index = aggregator.collect_all(&media_type, list_config).await?;

        let mut rows: Vec<_> = index.iter().collect();
        rows.sort_by_key(|(id, _)| **id);
        for (id, entry) in rows {
            let title = entry
                .payload
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or("unknown");
            println!("{}\t{}\t{}", id, title, entry.list_url);
        }

        println!("{} items indexed", index.len());
        for failure in index.failures() {
            println!("Incomplete: {} ({})", failure.list_url, failure.error);
        }
    }

    Ok(())
}

async fn providers(
    config_path: Option<&Path>,
    samples: &[String],
    media_type: &str,
    country: Option<&str>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let media_type: MediaType = media_type.parse()?;
    let resolver = resolver(&config.justwatch, country, None)?;

    let samples = samples
        .iter()
        .map(|s| {
            cli::parse_sample(s).with_context(|| format!("Invalid sample '{}', expected TITLE:YEAR", s))
        })
        .collect::<Result<Vec<_>>>()?;

    for provider in resolver.gather_providers(&samples, media_type).await {
        println!("{}", provider);
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!(
                "  JustWatch: country={} language={}",
                config.justwatch.country.as_deref().unwrap_or("-"),
                config.justwatch.language
            );
            println!("  mdblist configured: {}", config.mdblist.is_some());
            println!("  Libraries: {}", config.libraries.len());
            for library in &config.libraries {
                println!(
                    "    {} ({}): justwatch={} lists={}",
                    library.name,
                    library.media_type,
                    library.exclude.justwatch.is_some(),
                    library
                        .exclude
                        .mdblist
                        .as_ref()
                        .map(|l| l.lists.len())
                        .unwrap_or(0)
                );
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  JustWatch language: {}", config.justwatch.language);
        }
    }

    Ok(())
}
