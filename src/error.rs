use std::path::PathBuf;
use thiserror::Error;

pub use crate::remote::RemoteEditError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Malformed data URL")]
    MalformedDataUrl,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No image loaded")]
    NoImage,
    #[error("{0}")]
    Decode(#[source] IngestError),
    #[error("Export would be {width}x{height} pixels, which is too large")]
    TooLarge { width: u64, height: u64 },
    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterParseError {
    #[error("Unknown filter function '{0}'")]
    UnknownFunction(String),
    #[error("Invalid argument '{value}' for {function}()")]
    InvalidArgument { function: String, value: String },
    #[error("Malformed filter expression near '{0}'")]
    Malformed(String),
}

/// Anything the editor shell can surface in its status line.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Remote(#[from] RemoteEditError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_readable() {
        let err = FilterParseError::InvalidArgument { function: "blur".into(), value: "3em".into() };
        assert_eq!(err.to_string(), "Invalid argument '3em' for blur()");

        let wrapped: EditorError = ExportError::NoImage.into();
        assert_eq!(wrapped.to_string(), "No image loaded");
    }
}
