use std::path::Path;

use crate::config;

/// Load settings, falling back to defaults on any problem.
///
/// Runs before logging is set up, so problems go to stderr; the returned
/// message is logged again once the subscriber exists.
pub fn load_settings(config_path: Option<&Path>) -> (config::Settings, Option<String>) {
    let loaded = match config_path {
        Some(path) => config::Settings::load_from(Some(path)),
        None => config::Settings::load(),
    };
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => {
                let msg = format!("invalid config, using defaults: {msg}");
                eprintln!("setlist: {msg}");
                (with_credentials_of(s), Some(msg))
            }
        },
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            let msg = format!("failed to load config, using defaults: {e}");
            eprintln!("setlist: {msg}");
            (config::Settings::load_from(None).unwrap_or_default(), Some(msg))
        }
    }
}

/// Defaults, except for the credentials and token cache of `loaded`.
fn with_credentials_of(loaded: config::Settings) -> config::Settings {
    let mut s = config::Settings::default();
    s.catalog.client_id = loaded.catalog.client_id;
    s.catalog.client_secret = loaded.catalog.client_secret;
    s.catalog.token_cache_path = loaded.catalog.token_cache_path;
    s
}
