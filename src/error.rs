//! Error types for the rptable CLI

use rptable_core::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to read an input file
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Partition table rejected
    #[error("{path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: LoadError,
    },

    /// No preset with that name
    #[error("Unknown preset '{0}' (see `rptable presets`)")]
    UnknownPreset(String),

    /// Region layout could not be rendered
    #[error("Failed to render region layout: {0}")]
    Export(#[from] toml::ser::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
