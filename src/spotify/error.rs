use thiserror::Error;

use crate::spotify::auth::AuthError;

/// Failures of the Spotify client layer.
///
/// `Api` is what Spotify itself reported; every other variant is a failure
/// on our side of the wire.
#[derive(Error, Debug)]
pub enum SpotifyError {
    #[error("Spotify API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("invalid API URL: {0}")]
    Url(String),
}

impl SpotifyError {
    pub fn is_api(&self) -> bool {
        matches!(self, SpotifyError::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, SpotifyError>;
