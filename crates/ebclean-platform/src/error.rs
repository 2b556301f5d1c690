use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to list versions of application {application}: {message}")]
    FetchVersions {
        application: String,
        message: String,
    },

    #[error("failed to list environments of application {application}: {message}")]
    FetchEnvironments {
        application: String,
        message: String,
    },

    #[error("failed to delete version {label}: {message}")]
    DeleteVersion { label: String, message: String },

    #[error("invalid response from platform: {0}")]
    InvalidResponse(String),
}

impl PlatformError {
    /// Whether the error came from a listing call, which aborts the whole run.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            PlatformError::FetchVersions { .. }
                | PlatformError::FetchEnvironments { .. }
                | PlatformError::InvalidResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
