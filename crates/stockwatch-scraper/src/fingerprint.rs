//! Fingerprint engine: a stable digest of a [`StockSnapshot`].
//!
//! The snapshot is serialized as compact JSON (no whitespace, field order
//! fixed by the struct declarations, array order preserved) and hashed with
//! SHA-256. The same snapshot always yields the same hex string, on any
//! platform and across runs.

use sha2::{Digest, Sha256};

use crate::error::ScraperError;
use crate::types::StockSnapshot;

/// Lowercase hex SHA-256 of a snapshot's canonical serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Fingerprint {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// The exact bytes that get hashed.
///
/// # Errors
///
/// Returns [`ScraperError::Fingerprint`] if serialization fails, which does
/// not happen for well-formed snapshots.
pub fn canonical_bytes(snapshot: &StockSnapshot) -> Result<Vec<u8>, ScraperError> {
    serde_json::to_vec(snapshot).map_err(ScraperError::Fingerprint)
}

/// Compute the fingerprint of a complete snapshot.
///
/// # Errors
///
/// Returns [`ScraperError::Fingerprint`] if serialization fails.
pub fn fingerprint(snapshot: &StockSnapshot) -> Result<Fingerprint, ScraperError> {
    let bytes = canonical_bytes(snapshot)?;
    Ok(Fingerprint(format!("{:x}", Sha256::digest(&bytes))))
}
