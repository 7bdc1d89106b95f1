//! Typed failures surfaced by a refresh run.

use thiserror::Error;

/// Errors that abort a refresh or indicate broken configuration.
///
/// Per-champion lookup failures never appear here; they become gaps in the
/// dataset instead.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The version listing could not be fetched or was empty.
    #[error("could not determine the latest provider version: {0}")]
    VersionUnavailable(String),
    /// No provider could list the champion roster.
    #[error("could not obtain a champion roster: {0}")]
    RosterUnavailable(String),
    /// Two internal names map to the same display name.
    #[error("display name {display:?} is produced by both {first:?} and {second:?}")]
    NameCollision {
        /// Name both entries render to.
        display: String,
        /// Internal name that claimed the key first.
        first: String,
        /// Internal name that collided with it.
        second: String,
    },
    /// Configuration values that cannot drive a run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
