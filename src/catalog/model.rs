//! Catalog domain types.
//!
//! These are what the rest of the program sees; wire formats live in `dto`.

use std::fmt;
use std::time::Duration;

use crate::library::format_duration;

use super::error::CatalogError;

/// A track as returned by a search or a direct lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    /// `spotify:track:<id>`; what playlists are appended with.
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration: Duration,
    /// Short MP3 clip, when Spotify still offers one for the track.
    pub preview_url: Option<String>,
    /// Browsable `open.spotify.com` link.
    pub external_url: String,
}

impl RemoteTrack {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    pub fn duration_string(&self) -> String {
        format_duration(self.duration)
    }
}

/// Identifier of a playlist created on the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistId(pub String);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A direct reference to a track typed in by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    pub id: String,
}

impl TrackRef {
    /// Parse an `open.spotify.com` URL, a `spotify:` URI or a bare id.
    ///
    /// References to anything other than a track (album, playlist, artist...)
    /// are rejected with `CatalogError::NotATrack`.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CatalogError::InvalidReference(input.to_string()));
        }

        let (kind, id): (String, String) = if let Some(rest) = input.strip_prefix("spotify:") {
            let (kind, id) = rest
                .split_once(':')
                .ok_or_else(|| CatalogError::InvalidReference(input.into()))?;
            (kind.to_string(), id.to_string())
        } else if input.starts_with("http://") || input.starts_with("https://") {
            let url = reqwest::Url::parse(input)
                .map_err(|_| CatalogError::InvalidReference(input.into()))?;
            if url.host_str() != Some("open.spotify.com") {
                return Err(CatalogError::InvalidReference(input.into()));
            }
            // Localised links look like `/intl-de/track/<id>`.
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty() && !p.starts_with("intl-")).collect())
                .unwrap_or_default();
            match segments.as_slice() {
                [kind, id, ..] => (kind.to_string(), id.to_string()),
                _ => return Err(CatalogError::InvalidReference(input.into())),
            }
        } else {
            ("track".to_string(), input.to_string())
        };

        if !is_base62_id(&id) {
            return Err(CatalogError::InvalidReference(input.to_string()));
        }
        if kind != "track" {
            return Err(CatalogError::NotATrack(kind));
        }
        Ok(Self { id })
    }
}

fn is_base62_id(id: &str) -> bool {
    id.len() == 22 && id.chars().all(|c| c.is_ascii_alphanumeric())
}
