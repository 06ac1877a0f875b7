//! Review workflow: walks a batch of local files and resolves each one to at
//! most one catalog track appended to the session playlist.
//!
//! `ReviewWorkflow` is an explicit state machine driven by user actions; the
//! terminal front-end only renders its current `Stage`. Its collaborators
//! (catalog, metadata reader, player) are injected trait objects.

mod model;
mod review;
mod session;

pub use model::{FileReview, InputField, Notice, NoticeLevel, Stage, Summary};
pub use review::ReviewWorkflow;
