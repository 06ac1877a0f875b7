use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_setlist_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SETLIST_CONFIG_PATH", "/tmp/setlist-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/setlist-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("setlist")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.config/setlist/config.toml")
    );
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/setlist/setlist.log")
    );
}

#[test]
fn defaults_match_the_spotify_app_registration() {
    let s = Settings::default();
    assert_eq!(s.catalog.redirect_uri, "https://spotify.com");
    assert_eq!(s.catalog.scope, "playlist-modify-public");
    assert_eq!(s.catalog.search_limit, 5);
    assert_eq!(
        s.library.deny_extensions,
        vec!["jpg".to_string(), "jpeg".into(), "png".into(), "gif".into()]
    );
    assert!(!s.library.follow_links);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("SETLIST__CATALOG__SEARCH_LIMIT");

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
client_id = "abc"
client_secret = "shh"
search_limit = 3
timeout_secs = 4

[library]
deny_extensions = ["jpg", "txt"]
follow_links = true

[preview]
download_timeout_secs = 2

[ui]
header_text = "hello"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.catalog.client_id, "abc");
    assert_eq!(s.catalog.client_secret, "shh");
    assert!(s.catalog.has_credentials());
    assert_eq!(s.catalog.search_limit, 3);
    assert_eq!(s.catalog.timeout_secs, 4);
    assert_eq!(
        s.library.deny_extensions,
        vec!["jpg".to_string(), "txt".to_string()]
    );
    assert!(s.library.follow_links);
    assert_eq!(s.preview.download_timeout_secs, 2);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.catalog.token_cache_path.as_deref(),
        Some(dir.path().join("token.json").as_path())
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
search_limit = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SETLIST__CATALOG__SEARCH_LIMIT", "2");

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.catalog.search_limit, 2);
}

#[test]
fn legacy_spotify_env_fills_missing_credentials() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("SETLIST__CATALOG__CLIENT_ID");
    let _g2 = EnvGuard::set("SPOTIFY_CLIENT_ID", "from-env");
    let _g3 = EnvGuard::set("SPOTIFY_CLIENT_SECRET", "secret-from-env");

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(&dir.path().join("missing.toml"))).unwrap();
    assert_eq!(s.catalog.client_id, "from-env");
    assert_eq!(s.catalog.client_secret, "secret-from-env");
}

#[test]
fn validate_rejects_out_of_range_search_limit() {
    let mut s = Settings::default();
    s.catalog.search_limit = 0;
    assert!(s.validate().is_err());
    s.catalog.search_limit = 6;
    assert!(s.validate().is_err());
    s.catalog.search_limit = 1;
    assert!(s.validate().is_ok());
}
