// error.rs — viewer error taxonomy

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("{0} delivered to an unmounted surface")]
    Unmounted(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerError {
    /// Errors the viewer survives by keeping its last rendered state.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ViewerError::ContextUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_lost_context_is_fatal() {
        assert!(!ViewerError::ContextUnavailable("no adapter".into()).is_recoverable());
        assert!(ViewerError::AssetNotFound("missing.jpg".into()).is_recoverable());
        assert!(ViewerError::Unmounted("wheel").is_recoverable());
    }
}
