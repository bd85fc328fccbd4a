//! IPv4 geolocation lookups: validate addresses, resolve country and
//! timezone through ipapi.co, and show each address's local time.

pub mod config;
pub mod ipapi;
pub mod models;
pub mod output;
pub mod processing;
pub mod validation;

use config::Config;
use ipapi::{IpApiClient, Locator, LookupCache};
use processing::IpLookupList;
use std::error::Error;

use validation::is_input_whitespace;

pub use validation::{validate, ValidationOutcome};

/// Addresses from text, one per line. Blank lines and `#` comment lines are skipped.
pub fn parse_input_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_matches(is_input_whitespace))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn read_inputs_file(path: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading input file {path}: {e}"))?;
    let inputs = parse_input_lines(&text);
    log::info!("Read {} addresses from {path}", inputs.len());
    Ok(inputs)
}

/// Build the ipapi.co backed cache, seeded from the configured cache file.
pub fn build_cache(config: &Config) -> Result<LookupCache<IpApiClient>, Box<dyn Error>> {
    let client = IpApiClient::new(config)?;
    let cache = LookupCache::new(client, config.cache_gc_after);
    if let Some(cache_file) = &config.cache_file {
        if let Err(e) = cache.load_file(cache_file) {
            log::warn!("{e}");
        }
    }
    Ok(cache)
}

/// Validate and look up every input, returning the resolved rows.
pub async fn run_lookups<L: Locator>(
    inputs: Vec<String>,
    cache: &LookupCache<L>,
    cache_file: Option<&str>,
) -> Result<IpLookupList, Box<dyn Error>> {
    log::info!("#Start run_lookups() inputs={}", inputs.len());
    let mut list = IpLookupList::with_inputs(inputs);
    list.lookup_all(cache).await;
    if let Some(cache_file) = cache_file {
        cache.save_file(cache_file)?;
    }
    Ok(list)
}
