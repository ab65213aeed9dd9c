//! Request failure taxonomy
//!
//! Every variant is terminal for its request and maps to one status code
//! with a short plaintext body.

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("method {0} not allowed")]
    MethodNotAllowed(hyper::Method),

    #[error("missing or malformed multipart body: {0}")]
    MalformedUpload(#[source] multer::Error),

    #[error("no file field in upload")]
    MissingFileField,

    #[error("unusable upload filename {0:?}")]
    InvalidFilename(String),

    #[error("missing file query parameter")]
    MissingFileParameter,

    #[error("upload exceeds {limit} bytes")]
    UploadTooLarge { limit: u64 },

    #[error("file {0:?} not found")]
    NotFound(String),

    #[error("failed to save upload: {0}")]
    Save(#[source] std::io::Error),

    #[error("failed to read stored file: {0}")]
    Read(#[source] std::io::Error),
}

impl ExchangeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedUpload(_)
            | Self::MissingFileField
            | Self::InvalidFilename(_)
            | Self::MissingFileParameter => StatusCode::BAD_REQUEST,
            Self::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Save(_) | Self::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client; internal details stay on the diagnostic stream
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "Method not allowed",
            Self::MalformedUpload(_) | Self::MissingFileField => "Failed to upload file",
            Self::InvalidFilename(_) => "Invalid filename",
            Self::MissingFileParameter => "Missing file parameter",
            Self::UploadTooLarge { .. } => "File too large",
            Self::NotFound(_) => "File not found",
            Self::Save(_) => "Failed to save file",
            Self::Read(_) => "Failed to read file",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<multer::Error> for ExchangeError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::StreamSizeExceeded { limit } => Self::UploadTooLarge { limit },
            other => Self::MalformedUpload(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ExchangeError::MethodNotAllowed(hyper::Method::GET).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ExchangeError::MissingFileField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ExchangeError::NotFound("a.txt".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ExchangeError::UploadTooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ExchangeError::Save(io);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "Failed to save file");
    }

    #[test]
    fn test_multer_size_error_maps_to_413() {
        let err = ExchangeError::from(multer::Error::StreamSizeExceeded { limit: 1024 });
        assert!(matches!(err, ExchangeError::UploadTooLarge { limit: 1024 }));

        let err = ExchangeError::from(multer::Error::NoMultipart);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
