use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::auth::{self, Authenticator, CachedToken};
use crate::catalog::{Catalog, CatalogError, SpotifyClient, UnavailableCatalog, http_client};
use crate::config::{CatalogSettings, Settings};
use crate::preview::{AudioOutput, Player, RodioOutput, SilentOutput};
use crate::workflow::Notice;

/// Build the catalog client, authorizing interactively if needed.
///
/// Must run before the terminal enters raw mode: consent happens on plain
/// stdin/stdout. Failure never aborts startup; the catalog is replaced by an
/// `UnavailableCatalog` and the reason is returned as a notice to show.
pub fn connect_catalog(settings: &CatalogSettings) -> (Box<dyn Catalog>, Option<Notice>) {
    match authorize(settings) {
        Ok(client) => (Box::new(client), None),
        Err(e) => {
            warn!(error = %e, "catalog unavailable, continuing without it");
            let notice = Notice::error(
                "Spotify unavailable",
                format!("{e}\nSearching and adding will fail until setlist is restarted."),
            );
            (Box::new(UnavailableCatalog::new(e.to_string())), Some(notice))
        }
    }
}

fn authorize(settings: &CatalogSettings) -> Result<SpotifyClient, CatalogError> {
    if !settings.has_credentials() {
        return Err(CatalogError::Unavailable(
            "no client credentials: set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET \
             or catalog.client_id / catalog.client_secret"
                .to_string(),
        ));
    }

    let http = http_client(Duration::from_secs(settings.timeout_secs))?;
    let authenticator = Authenticator::new(http.clone(), settings.clone());
    let cache = settings.token_cache_path.as_deref();

    let cached = cache.and_then(auth::load_cached);
    let token = match cached {
        Some(token) if !token.is_expired() => {
            info!("using cached access token");
            token
        }
        Some(CachedToken {
            refresh_token: Some(refresh),
            ..
        }) => match authenticator.refresh(&refresh) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "cached token could not be refreshed");
                consent(settings, &authenticator)?
            }
        },
        _ => consent(settings, &authenticator)?,
    };

    if let Some(path) = cache {
        if let Err(e) = auth::store_cached(path, &token) {
            warn!(path = %path.display(), error = %e, "failed to write token cache");
        }
    }

    Ok(SpotifyClient::new(http, settings, token))
}

/// Ask the user to approve access in a browser and paste back where they landed.
fn consent(
    settings: &CatalogSettings,
    authenticator: &Authenticator,
) -> Result<CachedToken, CatalogError> {
    let url = auth::authorize_url(settings)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let prompt = format!(
        "setlist needs permission to create playlists on your Spotify account.\n\n\
         1. Open this URL in a browser and approve access:\n\n   {url}\n\n\
         2. You will land on {}. Paste the full URL from the address bar here\n   \
         (or press Enter to continue without Spotify):\n> ",
        settings.redirect_uri
    );
    stdout
        .write_all(prompt.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| CatalogError::Auth(format!("cannot prompt for consent: {e}")))?;

    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .map_err(|e| CatalogError::Auth(format!("cannot read redirect URL: {e}")))?;

    let code = auth::code_from_redirect(&line)?;
    let token = authenticator.exchange_code(&code)?;
    info!("authorization granted");
    Ok(token)
}

/// A player on the default audio device, or one that only reports why there is none.
pub fn open_player(settings: &Settings) -> Player {
    let output: Box<dyn AudioOutput> = match RodioOutput::open_default() {
        Ok(out) => Box::new(out),
        Err(e) => Box::new(SilentOutput::new(e.to_string())),
    };
    let timeout = Duration::from_secs(settings.preview.download_timeout_secs);
    let http = http_client(timeout).unwrap_or_default();
    Player::new(output, http, timeout)
}
