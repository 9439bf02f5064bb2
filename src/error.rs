use thiserror::Error;

/// Errors every service driver reports, whatever backend it talks to.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("service driver error: {0}")]
    ServiceDriver(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
}

impl DriverError {
    /// True for `NotFound` and its playlist specialization.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NotFound(_) | DriverError::PlaylistNotFound(_))
    }
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;
