//! Authorization-code flow against the Spotify accounts service.
//!
//! The redirect target is a fixed page we do not control, so the user copies
//! the URL they land on and pastes it back; `code_from_redirect` pulls the
//! authorization code out of it.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CatalogSettings;

use super::dto::{AuthErrorResponse, TokenResponse};
use super::error::CatalogError;

/// Refresh this long before the access token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Token material persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Seconds since the Unix epoch.
    pub expires_at: u64,
}

impl CachedToken {
    pub fn is_expired(&self) -> bool {
        let now = now_secs();
        now + EXPIRY_MARGIN.as_secs() >= self.expires_at
    }

    fn from_response(resp: TokenResponse, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token.or(previous_refresh),
            expires_at: now_secs() + resp.expires_in,
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Read a cached token; a missing or corrupt cache is just "no token".
pub fn load_cached(path: &Path) -> Option<CachedToken> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt token cache");
            None
        }
    }
}

pub fn store_cached(path: &Path, token: &CachedToken) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(token).map_err(std::io::Error::other)?;
    fs::write(path, raw)
}

/// The consent page URL the user has to open.
pub fn authorize_url(settings: &CatalogSettings) -> Result<String, CatalogError> {
    let base = format!(
        "{}/authorize",
        settings.accounts_base_url.trim_end_matches('/')
    );
    let url = reqwest::Url::parse_with_params(
        &base,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("scope", settings.scope.as_str()),
        ],
    )
    .map_err(|e| CatalogError::Auth(format!("bad accounts url: {e}")))?;
    Ok(url.into())
}

/// Extract the authorization code from the URL the browser was redirected to.
///
/// A bare code (no `?`) is accepted as-is.
pub fn code_from_redirect(input: &str) -> Result<String, CatalogError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CatalogError::Auth("no redirect URL given".to_string()));
    }
    if !input.contains('?') && !input.contains("://") {
        return Ok(input.to_string());
    }

    let url = reqwest::Url::parse(input)
        .map_err(|e| CatalogError::Auth(format!("not a URL: {e}")))?;
    let mut code = None;
    for (k, v) in url.query_pairs() {
        match k.as_ref() {
            "code" => code = Some(v.into_owned()),
            "error" => return Err(CatalogError::Auth(format!("consent refused: {v}"))),
            _ => {}
        }
    }
    code.ok_or_else(|| CatalogError::Auth("redirect URL carries no code".to_string()))
}

/// Talks to the accounts service token endpoint.
pub struct Authenticator {
    http: Client,
    settings: CatalogSettings,
}

impl Authenticator {
    pub fn new(http: Client, settings: CatalogSettings) -> Self {
        Self { http, settings }
    }

    fn token_url(&self) -> String {
        format!(
            "{}/api/token",
            self.settings.accounts_base_url.trim_end_matches('/')
        )
    }

    pub fn exchange_code(&self, code: &str) -> Result<CachedToken, CatalogError> {
        info!("exchanging authorization code");
        let resp = self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ])?;
        Ok(CachedToken::from_response(resp, None))
    }

    pub fn refresh(&self, refresh_token: &str) -> Result<CachedToken, CatalogError> {
        debug!("refreshing access token");
        let resp = self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])?;
        Ok(CachedToken::from_response(
            resp,
            Some(refresh_token.to_string()),
        ))
    }

    fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, CatalogError> {
        let response = self
            .http
            .post(self.token_url())
            .basic_auth(
                &self.settings.client_id,
                Some(&self.settings.client_secret),
            )
            .form(form)
            .send()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<AuthErrorResponse>() {
                Ok(err) => err.error_description.unwrap_or(err.error),
                Err(_) => status.to_string(),
            };
            return Err(CatalogError::Auth(detail));
        }

        response
            .json::<TokenResponse>()
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}
