use std::path::PathBuf;

use serde::Deserialize;

/// Spotify only ever returns this many items for the result list we render.
pub const MAX_SEARCH_LIMIT: usize = 5;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/setlist/config.toml` or `~/.config/setlist/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SETLIST__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub library: LibrarySettings,
    pub preview: PreviewSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Spotify application client id. Falls back to `SPOTIFY_CLIENT_ID`.
    pub client_id: String,
    /// Spotify application client secret. Falls back to `SPOTIFY_CLIENT_SECRET`.
    pub client_secret: String,
    /// Redirect target registered for the app; the user pastes the redirected URL back.
    pub redirect_uri: String,
    /// OAuth scope requested during authorization.
    pub scope: String,
    pub api_base_url: String,
    pub accounts_base_url: String,
    /// Number of search results to request (1..=5).
    pub search_limit: usize,
    /// Timeout for every catalog request, in seconds.
    pub timeout_secs: u64,
    /// Where the OAuth token is cached between runs.
    ///
    /// Defaults to `token.json` next to the config file.
    pub token_cache_path: Option<PathBuf>,
    /// Whether playlists are created public.
    pub public_playlists: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "https://spotify.com".to_string(),
            scope: "playlist-modify-public".to_string(),
            api_base_url: "https://api.spotify.com/v1".to_string(),
            accounts_base_url: "https://accounts.spotify.com".to_string(),
            search_limit: MAX_SEARCH_LIMIT,
            timeout_secs: 10,
            token_cache_path: None,
            public_playlists: true,
        }
    }
}

impl CatalogSettings {
    /// True when enough credentials are configured to attempt authorization.
    pub fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions never offered for review (case-insensitive, without dot).
    pub deny_extensions: Vec<String>,
    /// Descend into symlinked directories. Off by default; when on, a file
    /// reachable through several links is still listed once.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            deny_extensions: vec!["jpg".into(), "jpeg".into(), "png".into(), "gif".into()],
            follow_links: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Timeout for downloading a preview clip, in seconds.
    pub download_timeout_secs: u64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            download_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ one file at a time ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. The terminal belongs to the UI, so logs never go to stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
