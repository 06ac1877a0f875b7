//! Spotify Web API client.
//!
//! Synchronous on purpose: every call happens in direct response to a key
//! press and the UI has nothing else to do while it waits.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::{CatalogSettings, MAX_SEARCH_LIMIT};

use super::auth::{Authenticator, CachedToken, store_cached};
use super::dto;
use super::error::CatalogError;
use super::model::{PlaylistId, RemoteTrack, TrackRef};
use super::Catalog;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("setlist/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the catalog and the accounts service.
pub fn http_client(timeout: Duration) -> Result<Client, CatalogError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| CatalogError::Unavailable(format!("failed to build HTTP client: {e}")))
}

pub struct SpotifyClient {
    http: Client,
    auth: Authenticator,
    base_url: String,
    public_playlists: bool,
    token: CachedToken,
    token_cache: Option<PathBuf>,
    user_id: Option<String>,
}

impl SpotifyClient {
    pub fn new(http: Client, settings: &CatalogSettings, token: CachedToken) -> Self {
        Self {
            auth: Authenticator::new(http.clone(), settings.clone()),
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            public_playlists: settings.public_playlists,
            token,
            token_cache: settings.token_cache_path.clone(),
            user_id: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Current access token, refreshed first when it is about to expire.
    fn access_token(&mut self) -> Result<String, CatalogError> {
        if self.token.is_expired() {
            let Some(refresh) = self.token.refresh_token.clone() else {
                return Err(CatalogError::Auth(
                    "access token expired and no refresh token is available".to_string(),
                ));
            };
            self.token = self.auth.refresh(&refresh)?;
            if let Some(path) = &self.token_cache {
                if let Err(e) = store_cached(path, &self.token) {
                    warn!(path = %path.display(), error = %e, "failed to update token cache");
                }
            }
        }
        Ok(self.token.access_token.clone())
    }

    fn send<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T, CatalogError> {
        let token = self.access_token()?;
        let response = request.bearer_auth(token).send()?;
        let response = check_status(response)?;
        response
            .json::<T>()
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    fn current_user_id(&mut self) -> Result<String, CatalogError> {
        if let Some(id) = &self.user_id {
            return Ok(id.clone());
        }
        let request = self.http.get(self.url("me"));
        let me: dto::CurrentUser = self.send(request)?;
        self.user_id = Some(me.id.clone());
        Ok(me.id)
    }
}

/// Map a non-success response onto a `CatalogError`.
fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<dto::ErrorResponse>()
        .map(|e| e.error.message)
        .unwrap_or_default();
    Err(error_for_status(status, message))
}

pub(super) fn error_for_status(status: StatusCode, message: String) -> CatalogError {
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        message
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CatalogError::Auth(message),
        StatusCode::NOT_FOUND => CatalogError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited,
        // Malformed ids come back as 400 "invalid id".
        StatusCode::BAD_REQUEST if message.to_ascii_lowercase().contains("invalid") => {
            CatalogError::NotFound
        }
        _ => CatalogError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

impl Catalog for SpotifyClient {
    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<RemoteTrack>, CatalogError> {
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        debug!(query, limit, "searching tracks");
        let limit_param = limit.to_string();
        let request = self.http.get(self.url("search")).query(&[
            ("q", query),
            ("type", "track"),
            ("limit", limit_param.as_str()),
        ]);
        let response: dto::SearchResponse = self.send(request)?;
        let tracks: Vec<RemoteTrack> = response
            .tracks
            .map(|p| p.items)
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(dto::into_remote_track)
            .collect();
        debug!(query, hits = tracks.len(), "search finished");
        Ok(tracks)
    }

    fn lookup(&mut self, reference: &str) -> Result<RemoteTrack, CatalogError> {
        let track_ref = TrackRef::parse(reference)?;
        let request = self.http.get(self.url(&format!("tracks/{}", track_ref.id)));
        let track: dto::Track = self.send(request)?;
        if track.kind != "track" {
            return Err(CatalogError::NotATrack(track.kind));
        }
        Ok(dto::into_remote_track(track))
    }

    fn create_playlist(&mut self, name: &str) -> Result<PlaylistId, CatalogError> {
        let user_id = self.current_user_id()?;
        let body = dto::CreatePlaylistRequest {
            name,
            public: self.public_playlists,
            description: "Built with setlist",
        };
        let request = self
            .http
            .post(self.url(&format!("users/{user_id}/playlists")))
            .json(&body);
        let playlist: dto::Playlist = self.send(request)?;
        info!(name, id = %playlist.id, "created playlist");
        Ok(PlaylistId(playlist.id))
    }

    fn append_item(&mut self, playlist: &PlaylistId, track_uri: &str) -> Result<(), CatalogError> {
        let body = dto::AddItemsRequest { uris: [track_uri] };
        let request = self
            .http
            .post(self.url(&format!("playlists/{}/tracks", playlist.0)))
            .json(&body);
        let _: serde_json::Value = self.send(request)?;
        info!(playlist = %playlist, track_uri, "appended track");
        Ok(())
    }
}
