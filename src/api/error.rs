use http::StatusCode;

/// Failure of a backend call. The display text is fit to be shown to the user as is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to call `{path}`")]
    Transport {
        path: String,

        #[source]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The backend rejected the session. The local session is already cleared.
    #[error("{message}")]
    SessionExpired { message: String },

    #[error("Expected JSON response from {path} but received malformed data.")]
    MalformedJson {
        path: String,

        #[source]
        source: serde_json::Error,
    },

    #[error("failed to update the local session")]
    Session(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    pub(super) fn session(error: anyhow::Error) -> Self {
        Self::Session(error.into())
    }
}
