//! Process configuration read from the environment.

use std::env;

pub const CATALOG_ENV: &str = "RESONANCE_CATALOG";
pub const WORKERS_ENV: &str = "RESONANCE_WORKERS";
pub const LOG_ENV: &str = "RESONANCE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog YAML/JSON path; the built-in catalog is used when unset.
    pub catalog_path: Option<String>,
    /// Rayon worker threads, 0 for all cores.
    pub workers: usize,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            workers: 0,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Environment variables:
    /// - `RESONANCE_CATALOG` - catalog file path
    /// - `RESONANCE_WORKERS` - worker threads (default: 0, all cores)
    /// - `RESONANCE_LOG` - tracing filter directives (default: warn)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.catalog_path = lookup(CATALOG_ENV).filter(|path| !path.trim().is_empty());
        if let Some(workers) = lookup(WORKERS_ENV).and_then(|raw| raw.trim().parse().ok()) {
            config.workers = workers;
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|raw| !raw.trim().is_empty()) {
            config.log_filter = filter;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            (CATALOG_ENV, "data/catalog.yaml"),
            (WORKERS_ENV, "4"),
            (LOG_ENV, "resonance=debug"),
        ]));
        assert_eq!(config.catalog_path.as_deref(), Some("data/catalog.yaml"));
        assert_eq!(config.workers, 4);
        assert_eq!(config.log_filter, "resonance=debug");
    }

    #[test]
    fn bad_worker_count_keeps_default() {
        let config = AppConfig::from_lookup(lookup(&[(WORKERS_ENV, "many"), (CATALOG_ENV, " ")]));
        assert_eq!(config.workers, 0);
        assert!(config.catalog_path.is_none());
    }
}
