use thiserror::Error;

/// Failures inside the analysis pipeline.
///
/// Only `Validation` ever reaches a caller. The other variants are produced at
/// section or tokenizer boundaries, logged, and degraded locally.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{stage} collaborator failed on section {section}: {message}")]
    Collaborator {
        stage: &'static str,
        section: usize,
        message: String,
    },

    #[error("{stage} collaborator timed out on section {section} after {secs}s")]
    Timeout {
        stage: &'static str,
        section: usize,
        secs: u64,
    },

    #[error("sentence tokenizer failed: {0}")]
    Segmentation(String),
}

impl PipelineError {
    pub fn collaborator(stage: &'static str, section: usize, err: impl std::fmt::Display) -> Self {
        Self::Collaborator {
            stage,
            section,
            message: err.to_string(),
        }
    }

    /// True for the one variant that should be shown to the user as their fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_message() {
        let err = PipelineError::collaborator("classify", 2, "connection refused");
        assert_eq!(
            err.to_string(),
            "classify collaborator failed on section 2: connection refused"
        );
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_validation_is_user_facing() {
        let err = PipelineError::Validation("no article content provided".into());
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "invalid input: no article content provided");
    }
}
