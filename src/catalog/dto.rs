//! Spotify Web API wire types.
//!
//! Only the fields we read are declared; conversion into domain types happens
//! in `into_remote_track`, nowhere else.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::model::RemoteTrack;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Paging<Track>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: String,
    pub uri: String,
    pub name: String,
    /// `"track"` for tracks; episodes share most of the shape.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
    #[serde(default)]
    pub duration_ms: u64,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
    pub description: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddItemsRequest<'a> {
    pub uris: [&'a str; 1],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Response of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    /// Absent on refresh when Spotify keeps the old refresh token valid.
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

pub fn into_remote_track(track: Track) -> RemoteTrack {
    let external_url = track
        .external_urls
        .spotify
        .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", track.id));
    RemoteTrack {
        id: track.id,
        uri: track.uri,
        name: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        album: track.album.map(|a| a.name).unwrap_or_default(),
        duration: Duration::from_millis(track.duration_ms),
        preview_url: track.preview_url.filter(|u| !u.trim().is_empty()),
        external_url,
    }
}
