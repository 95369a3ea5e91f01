// API error type
// Every failure of the data API maps to a status code and a plain-text body

use hyper::StatusCode;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API endpoint not found")]
    EndpointNotFound,

    #[error("File not found")]
    FileNotFound,

    #[error("Error reading files: {0}")]
    ListFiles(#[source] io::Error),

    #[error("Error reading file: {0}")]
    ReadFile(#[source] io::Error),

    #[error("Internal server error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::EndpointNotFound | Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::ListFiles(_) | Self::ReadFile(_) | Self::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_message() {
        assert_eq!(ApiError::EndpointNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::FileNotFound.to_string(), "File not found");

        let err = ApiError::ReadFile(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error reading file: bad utf-8");
    }
}
