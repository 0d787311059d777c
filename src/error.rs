use std::fmt;
use thiserror::Error;

/// A failure reported by one of the external providers (language model or
/// media generation service).
#[derive(Debug, Clone, Error)]
#[error("{provider} error: {message}")]
pub struct ProviderError {
    pub provider: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Flattens an `anyhow` chain into a single message, keeping every cause.
    pub fn from_anyhow(provider: impl Into<String>, err: anyhow::Error) -> Self {
        Self::new(provider, format!("{:#}", err))
    }
}

/// One structural mismatch between a language-model reply and the shape we
/// expected, addressed by a JSON-pointer-like path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub problem: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to parse language model response as JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid response structure: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
