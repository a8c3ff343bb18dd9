mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::mdblist::extract_list_path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./availarr.toml",
        "~/.config/availarr/config.toml",
        "/etc/availarr/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

fn is_two_letter_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    // Validate global JustWatch settings
    if let Some(country) = &config.justwatch.country {
        if !is_two_letter_code(country) {
            anyhow::bail!("JustWatch country '{}' must be a two-letter code", country);
        }
    }
    if config.justwatch.timeout_secs == 0 {
        anyhow::bail!("justwatch.timeout_secs must be greater than 0");
    }
    if !is_two_letter_code(&config.justwatch.language) {
        anyhow::bail!(
            "JustWatch language '{}' must be a two-letter code",
            config.justwatch.language
        );
    }

    // Validate mdblist settings
    if let Some(mdblist) = &config.mdblist {
        if mdblist.api_key.is_empty() {
            anyhow::bail!("mdblist is configured but has no API key");
        }
        if mdblist.timeout_secs == 0 {
            anyhow::bail!("mdblist.timeout_secs must be greater than 0");
        }
    }

    for library in &config.libraries {
        validate_justwatch_exclusions(config, library)?;
        validate_list_exclusions(config, library)?;
    }

    Ok(())
}

fn validate_justwatch_exclusions(config: &Config, library: &LibraryConfig) -> Result<()> {
    let Some(jw) = &library.exclude.justwatch else {
        return Ok(());
    };

    let has_available = jw.available_on.as_ref().is_some_and(|p| !p.is_empty());
    let has_not_available = jw.not_available_on.as_ref().is_some_and(|p| !p.is_empty());
    if has_available && has_not_available {
        anyhow::bail!(
            "JustWatch exclusions in library '{}': 'available_on' and 'not_available_on' are mutually exclusive. Use only one.",
            library.name
        );
    }

    let country = jw.country.as_ref().or(config.justwatch.country.as_ref());
    match country {
        None => anyhow::bail!(
            "JustWatch exclusions in library '{}' require a 'country' setting. \
             Set it either in the library's exclude.justwatch.country or globally in justwatch.country.",
            library.name
        ),
        Some(c) if !is_two_letter_code(c) => anyhow::bail!(
            "JustWatch exclusions in library '{}': country '{}' must be a two-letter code",
            library.name,
            c
        ),
        Some(_) => {}
    }

    if let Some(language) = &jw.language {
        if !is_two_letter_code(language) {
            anyhow::bail!(
                "JustWatch exclusions in library '{}': language '{}' must be a two-letter code",
                library.name,
                language
            );
        }
    }

    Ok(())
}

fn validate_list_exclusions(config: &Config, library: &LibraryConfig) -> Result<()> {
    let Some(lists) = &library.exclude.mdblist else {
        return Ok(());
    };

    if config.mdblist.is_none() {
        anyhow::bail!(
            "Library '{}' uses mdblist exclusions but [mdblist] is not configured",
            library.name
        );
    }

    if lists.max_items_per_list == 0 {
        anyhow::bail!(
            "mdblist exclusions in library '{}': max_items_per_list must be greater than 0",
            library.name
        );
    }

    // Bad URLs are skipped at run time; surface them early
    for url in &lists.lists {
        if extract_list_path(url).is_none() {
            tracing::warn!(
                "mdblist exclusions in library '{}': '{}' is not an mdblist list URL and will be skipped",
                library.name,
                url
            );
        }
    }

    Ok(())
}
