//! Persistence of the last-notified fingerprint between check runs.
//!
//! The check pipeline never writes state itself. After a notify decision the
//! CLI calls [`FingerprintStore::save`] on whichever backend is configured.

pub mod error;
pub mod file;
pub mod github;
pub mod store;

pub use error::StateError;
pub use file::FileStore;
pub use github::GithubVariableStore;
pub use store::{EnvStore, FingerprintStore, StateStore};
