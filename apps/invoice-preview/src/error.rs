//! Error types for the invoice preview.

use std::path::PathBuf;

use innkeep_core::CoreError;
use thiserror::Error;

/// Result type alias for preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Everything that can stop a preview run.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Reading the input document or config file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input document is not valid JSON for an invoice.
    #[error("Invalid invoice document: {0}")]
    Json(#[from] serde_json::Error),

    /// billing.toml could not be parsed.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config values are out of range.
    #[error("Invalid billing configuration: {0}")]
    Config(String),

    /// The engine rejected the line items.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PreviewError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PreviewError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_core::ValidationError;

    #[test]
    fn test_core_error_is_transparent() {
        let err: PreviewError = CoreError::from(ValidationError::MustBePositive {
            field: "line_items[0].quantity".into(),
        })
        .into();
        assert!(err.to_string().contains("line_items[0].quantity"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = PreviewError::io(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().starts_with("Failed to read missing.json"));
    }
}
