//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_SEARCH__FETCH_CAP=500`). Provides helpers to expand `~` and `${VAR}`
//! and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::pipeline::FetchPolicy;
use crate::tags::{TagWhitelist, DEFAULT_WHITELIST};
use crate::types::{DEFAULT_DISPLAY_LIMIT, DEFAULT_MAX_PRICE};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_figment(Self::layered(&env_name))
    }

    fn layered(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    /// Wrap an already-built figment; the merged settings must validate.
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub data: DataSettings,
    pub search: SearchSettings,
    pub tags: TagSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    /// JSON-Lines file backing the catalog store.
    pub catalog_path: String,
    /// Directory of `*.jsonl` scrape dumps to ingest.
    pub import_dir: String,
    pub index_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            catalog_path: "data/catalog.jsonl".to_string(),
            import_dir: "data/scraped".to_string(),
            index_dir: "data/indexes/tantivy".to_string(),
        }
    }
}

impl DataSettings {
    pub fn catalog_path(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.catalog_path) }
    pub fn import_dir(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.import_dir) }
    pub fn index_dir(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.index_dir) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub fetch_multiplier: usize,
    pub fetch_cap: usize,
    /// Display limit used by "show everything" mode.
    pub show_all_limit: usize,
    pub default_display_limit: usize,
    pub min_display_limit: usize,
    pub max_display_limit: usize,
    pub default_max_price: f64,
    /// Edit distance for fuzzy term matching; 0 disables it.
    pub fuzzy_distance: u8,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            fetch_multiplier: policy.multiplier,
            fetch_cap: policy.cap,
            show_all_limit: 10_000,
            default_display_limit: DEFAULT_DISPLAY_LIMIT,
            min_display_limit: 10,
            max_display_limit: 200,
            default_max_price: DEFAULT_MAX_PRICE,
            fuzzy_distance: 1,
        }
    }
}

impl SearchSettings {
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::new(self.fetch_multiplier, self.fetch_cap)
    }

    pub fn clamp_display_limit(&self, requested: usize) -> usize {
        requested.clamp(self.min_display_limit, self.max_display_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSettings {
    pub whitelist: Vec<String>,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self { whitelist: DEFAULT_WHITELIST.iter().map(|s| s.to_string()).collect() }
    }
}

impl TagSettings {
    pub fn whitelist(&self) -> TagWhitelist {
        TagWhitelist::new(&self.whitelist)
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        let s = &self.search;
        if s.fetch_multiplier == 0 {
            return Err(Error::InvalidConfig("search.fetch_multiplier must be >= 1".into()));
        }
        if s.fetch_cap == 0 {
            return Err(Error::InvalidConfig("search.fetch_cap must be >= 1".into()));
        }
        if s.show_all_limit == 0 {
            return Err(Error::InvalidConfig("search.show_all_limit must be >= 1".into()));
        }
        if !(s.min_display_limit <= s.default_display_limit && s.default_display_limit <= s.max_display_limit) {
            return Err(Error::InvalidConfig(format!(
                "display limits must satisfy min <= default <= max, got {} / {} / {}",
                s.min_display_limit, s.default_display_limit, s.max_display_limit
            )));
        }
        if s.min_display_limit == 0 {
            return Err(Error::InvalidConfig("search.min_display_limit must be >= 1".into()));
        }
        if s.default_max_price.is_nan() || s.default_max_price < 0.0 {
            return Err(Error::InvalidConfig(format!("search.default_max_price must be >= 0, got {}", s.default_max_price)));
        }
        if s.fuzzy_distance > 2 {
            return Err(Error::InvalidConfig(format!("search.fuzzy_distance must be <= 2, got {}", s.fuzzy_distance)));
        }
        if self.tags.whitelist.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::InvalidConfig("tags.whitelist must not be empty".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.search.fetch_policy(), FetchPolicy::new(5, 1000));
        assert_eq!(settings.tags.whitelist().len(), DEFAULT_WHITELIST.len());
    }

    #[test]
    fn layered_files_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [search]
                fetch_multiplier = 4
                default_display_limit = 20

                [data]
                index_dir = "/srv/index"
                "#,
            )?;
            jail.create_file("config.test.toml", "[search]\nfetch_cap = 400\n")?;
            jail.set_env("RUST_ENV", "test");
            jail.set_env("APP_SEARCH__SHOW_ALL_LIMIT", "5000");

            let config = Config::load().map_err(|e| e.to_string())?;
            let settings = config.settings().map_err(|e| e.to_string())?;
            assert_eq!(settings.search.fetch_multiplier, 4);
            assert_eq!(settings.search.fetch_cap, 400);
            assert_eq!(settings.search.show_all_limit, 5000);
            assert_eq!(settings.search.default_display_limit, 20);
            assert_eq!(settings.search.max_display_limit, 200);
            assert_eq!(settings.data.index_dir, "/srv/index");
            assert_eq!(settings.data.catalog_path, "data/catalog.jsonl");

            let cap: usize = config.get("search.fetch_cap").map_err(|e| e.to_string())?;
            assert_eq!(cap, 400);
            Ok(())
        });
    }

    #[test]
    fn invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("RUST_ENV", "test");
            jail.set_env("APP_SEARCH__FETCH_MULTIPLIER", "0");
            assert!(Config::load().is_err());
            Ok(())
        });

        let mut settings = Settings::default();
        settings.search.min_display_limit = 300;
        assert!(matches!(settings.validate(), Err(Error::InvalidConfig(_))));

        let mut settings = Settings::default();
        settings.search.fuzzy_distance = 3;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.tags.whitelist = vec!["  ".into()];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn clamp_display_limit() {
        let search = SearchSettings::default();
        assert_eq!(search.clamp_display_limit(1), 10);
        assert_eq!(search.clamp_display_limit(75), 75);
        assert_eq!(search.clamp_display_limit(5000), 200);
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let data = DataSettings::default();
        let base = Path::new("/opt/steamdash");
        assert_eq!(data.catalog_path(base), PathBuf::from("/opt/steamdash/data/catalog.jsonl"));
        assert_eq!(resolve_with_base(base, "/abs/index"), PathBuf::from("/abs/index"));
    }
}
