//! Error types for tracker-core.

use thiserror::Error;

/// Errors raised while validating an export snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(String),
}
