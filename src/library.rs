//! Local side of a review: which files to walk through and what their tags say.
//!
//! `scan` enumerates candidate files under a directory; `metadata` reads the
//! embedded tags of one file and derives the search query suggested for it.

mod metadata;
mod model;
mod scan;

pub use metadata::{MetadataReader, TagReader, default_query, format_duration};
pub use model::{CandidateFile, LocalMetadata};
pub use scan::scan;

#[cfg(test)]
mod tests;
