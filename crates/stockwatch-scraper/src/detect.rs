//! Change detector: decides whether a run's result is worth a notification.

use crate::fingerprint::Fingerprint;

/// Outcome of comparing a run against the last notified state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// No preferred store has stock; nothing to report.
    NoStock,
    /// Stock exists but the snapshot matches the last notification.
    Unchanged,
    /// Stock exists and differs from the last notification.
    Changed(Fingerprint),
}

/// Compare a freshly computed fingerprint with the previous one.
///
/// Absence of stock wins over everything else, even when the snapshot moved
/// from stocked to unstocked. Otherwise the comparison is exact string
/// equality, so an empty `previous` never matches.
#[must_use]
pub fn detect_change(any_in_stock: bool, fingerprint: Fingerprint, previous: &str) -> Change {
    if !any_in_stock {
        Change::NoStock
    } else if fingerprint == *previous {
        Change::Unchanged
    } else {
        Change::Changed(fingerprint)
    }
}
