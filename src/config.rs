//! Settings for the catalog client, library scan, previews, UI and logging.
//!
//! Values come from `SETLIST__*` environment variables, then the TOML file,
//! then built-in defaults; see `Settings::load`.

mod load;
mod schema;

pub use load::{default_config_path, default_log_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
