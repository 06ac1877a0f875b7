use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::{MAX_SEARCH_LIMIT, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SETLIST__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and the default (or `SETLIST_CONFIG_PATH`) file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from environment and an explicit optional config file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SETLIST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let mut settings: Settings = cfg.try_deserialize()?;
        settings.apply_legacy_env();
        if settings.catalog.token_cache_path.is_none() {
            settings.catalog.token_cache_path = config_path
                .and_then(Path::parent)
                .map(|dir| dir.join("token.json"));
        }
        Ok(settings)
    }

    /// Fill empty credentials from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`.
    fn apply_legacy_env(&mut self) {
        if self.catalog.client_id.trim().is_empty() {
            if let Ok(v) = env::var("SPOTIFY_CLIENT_ID") {
                self.catalog.client_id = v;
            }
        }
        if self.catalog.client_secret.trim().is_empty() {
            if let Ok(v) = env::var("SPOTIFY_CLIENT_SECRET") {
                self.catalog.client_secret = v;
            }
        }
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.search_limit == 0 || self.catalog.search_limit > MAX_SEARCH_LIMIT {
            return Err(format!(
                "catalog.search_limit must be between 1 and {MAX_SEARCH_LIMIT}"
            ));
        }
        if self.catalog.redirect_uri.trim().is_empty() {
            return Err("catalog.redirect_uri must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SETLIST_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SETLIST_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/setlist/config.toml`
/// or `~/.config/setlist/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("setlist").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/setlist/setlist.log`
/// or `~/.local/state/setlist/setlist.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("setlist").join("setlist.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
