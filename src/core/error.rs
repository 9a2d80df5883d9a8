use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Version file not found: {0}")]
    VersionFileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidVersion(_) => "INVALID_VERSION",
            Error::VersionFileNotFound(_) => "VERSION_FILE_NOT_FOUND",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Other(_) => "ERROR",
        }
    }
}
