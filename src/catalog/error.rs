/// Errors from the catalog service and its authorization flow.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The client could not be set up; every operation fails fast.
    #[error("Spotify is unavailable: {0}")]
    Unavailable(String),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Spotify returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by Spotify, try again shortly")]
    RateLimited,

    #[error("Not found on Spotify")]
    NotFound,

    #[error("Not a Spotify track reference: {0:?}")]
    InvalidReference(String),

    #[error("Reference points to a {0}, not a track")]
    NotATrack(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
