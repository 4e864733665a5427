//! Error handling for Cadenza
//!
//! Every error in the console core is locally recoverable: the surface that
//! hit it stays interactive and resubmission is always possible.

use thiserror::Error;

/// Result type alias for Cadenza operations
pub type Result<T> = std::result::Result<T, CadenzaError>;

/// Main error type for Cadenza operations
#[derive(Error, Debug)]
pub enum CadenzaError {
    // Request Validation Errors
    #[error("Empty prompt: describe what should be generated")]
    EmptyPrompt,

    #[error("Engine '{engine}' does not serve {kind} generation")]
    EngineMismatch { engine: String, kind: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    // Job Lifecycle Errors
    #[error("A {surface} generation is already in flight")]
    JobBusy { surface: String },

    // Provider Errors
    #[error("Generation provider error: {reason}")]
    ProviderError { reason: String },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CadenzaError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CadenzaError::EmptyPrompt => "EMPTY_PROMPT",
            CadenzaError::EngineMismatch { .. } => "ENGINE_MISMATCH",
            CadenzaError::InvalidRequest { .. } => "INVALID_REQUEST",
            CadenzaError::JobBusy { .. } => "JOB_BUSY",
            CadenzaError::ProviderError { .. } => "PROVIDER_ERROR",
            CadenzaError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// The console must remain interactive after any failure, so everything
    /// short of a serialization bug is recoverable by correcting the input
    /// or resubmitting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CadenzaError::Serialization(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CadenzaError::JobBusy {
            surface: "track".to_string(),
        };
        assert_eq!(err.error_code(), "JOB_BUSY");
        assert_eq!(CadenzaError::EmptyPrompt.error_code(), "EMPTY_PROMPT");
    }

    #[test]
    fn test_recoverable() {
        assert!(CadenzaError::EmptyPrompt.is_recoverable());
        assert!(CadenzaError::JobBusy {
            surface: "video".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_display_names_the_surface() {
        let err = CadenzaError::JobBusy {
            surface: "stem-split".to_string(),
        };
        assert!(err.to_string().contains("stem-split"));
    }
}
