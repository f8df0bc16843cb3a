use std::path::PathBuf;

/// Shown when the form is submitted without an image or without a query.
pub const MISSING_INPUT_MESSAGE: &str = "Please upload an image and enter a query.";

/// Shown when the backend rejects a request without saying why.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Every way a form interaction can fail.
///
/// All variants end up in the same error panel; [`FormError::user_message`] is the
/// only text the user ever sees.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// No image selected or empty query. Raised before any network activity.
    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,

    /// The backend answered with a non-success status.
    #[error("{}", .detail.as_deref().unwrap_or(FALLBACK_ERROR_MESSAGE))]
    Server {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FormError {
    /// The text rendered into the error panel.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the failure happened on our side of the wire, before or without a
    /// server verdict.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, FormError::Transport(_) | FormError::Decode(_))
    }
}
