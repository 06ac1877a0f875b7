//! Remote music catalog: searching tracks, resolving direct references and
//! appending to a playlist.
//!
//! The workflow only ever talks to the `Catalog` trait so that tests can
//! substitute a fake, and so that an authorization failure at startup can be
//! represented by `UnavailableCatalog` instead of a missing client.

pub mod auth;
mod client;
mod dto;
mod error;
mod model;

pub use client::{SpotifyClient, http_client};
pub use error::CatalogError;
pub use model::{PlaylistId, RemoteTrack, TrackRef};

pub trait Catalog {
    /// Up to `limit` tracks matching `query`, best match first.
    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<RemoteTrack>, CatalogError>;

    /// Resolve a track URL, URI or id.
    fn lookup(&mut self, reference: &str) -> Result<RemoteTrack, CatalogError>;

    /// Not idempotent; callers decide when a playlist is needed.
    fn create_playlist(&mut self, name: &str) -> Result<PlaylistId, CatalogError>;

    fn append_item(&mut self, playlist: &PlaylistId, track_uri: &str) -> Result<(), CatalogError>;
}

/// Stand-in used when the client could not be authorized.
#[derive(Debug, Clone)]
pub struct UnavailableCatalog {
    reason: String,
}

impl UnavailableCatalog {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T, CatalogError> {
        Err(CatalogError::Unavailable(self.reason.clone()))
    }
}

impl Catalog for UnavailableCatalog {
    fn search(&mut self, _query: &str, _limit: usize) -> Result<Vec<RemoteTrack>, CatalogError> {
        self.fail()
    }

    fn lookup(&mut self, _reference: &str) -> Result<RemoteTrack, CatalogError> {
        self.fail()
    }

    fn create_playlist(&mut self, _name: &str) -> Result<PlaylistId, CatalogError> {
        self.fail()
    }

    fn append_item(&mut self, _playlist: &PlaylistId, _track_uri: &str) -> Result<(), CatalogError> {
        self.fail()
    }
}
