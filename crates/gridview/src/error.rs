//! Error types for grid rendering and search resolution.

use gridview_seeker::SeekerError;
use thiserror::Error;

/// Errors surfaced by grid components.
///
/// `Configuration` is meant for the developer wiring a grid up, not for the
/// end user: it fires when a model offers neither explicit configuration nor
/// the capability that would let the component discover it.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("{0}")]
    Configuration(String),

    /// Malformed formatting template.
    #[error("invalid format template '{template}': {reason}")]
    Template { template: String, reason: String },

    #[error("unknown cast type '{0}'")]
    UnknownCast(String),

    #[error("cast type '{cast}' has no method '{method}'")]
    UnknownCastMethod { cast: String, method: String },

    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    /// Retained grid state could not be read or written.
    #[error("invalid grid state: {0}")]
    State(#[from] serde_json::Error),

    /// Model configuration document could not be parsed.
    #[error("invalid model configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("fragment rendering failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error(transparent)]
    Query(#[from] SeekerError),
}

impl GridError {
    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        GridError::Template {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
