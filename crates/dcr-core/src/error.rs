//! Error types for DCR

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DcrError {
    // Validation errors
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    // Lookup errors
    #[error("Report not found: {id}")]
    ReportNotFound { id: String },

    // Remote store errors
    #[error("Remote store unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    // Legacy import errors
    #[error("Legacy import failed: {reason}")]
    LegacyImport { reason: String },

    // Export errors
    #[error("Export to {kind} failed: {reason}")]
    ExportFailed { kind: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DcrError>;
