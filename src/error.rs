//! Error kinds surfaced by layout, rendering and persistence

use thiserror::Error;

/// Everything that can go wrong while producing a sheet.
///
/// Layout errors are raised before any page is produced; renderer errors abort
/// the remaining draw calls and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetError {
    /// Cell count is non-positive, non-integer, unparsable or above policy.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Page or grid configuration breaks its own invariants.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The grid does not fit on the page for this request.
    #[error("layout overflow: {0}")]
    LayoutOverflow(String),

    /// The document backend failed to draw, finalize or persist.
    #[error("renderer failure: {0}")]
    RendererFailure(String),
}

impl SheetError {
    /// Short machine-readable code, used by the WASM bridge.
    pub fn code(&self) -> &'static str {
        match self {
            SheetError::InvalidInput(_) => "INVALID_INPUT",
            SheetError::InvalidConfig(_) => "INVALID_CONFIG",
            SheetError::LayoutOverflow(_) => "LAYOUT_OVERFLOW",
            SheetError::RendererFailure(_) => "RENDERER_FAILURE",
        }
    }
}

impl From<std::io::Error> for SheetError {
    fn from(err: std::io::Error) -> Self {
        SheetError::RendererFailure(err.to_string())
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(err: serde_json::Error) -> Self {
        SheetError::InvalidConfig(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tempfile::PersistError> for SheetError {
    fn from(err: tempfile::PersistError) -> Self {
        SheetError::RendererFailure(err.error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SheetError::InvalidInput("cell count must be at least 1".into());
        assert_eq!(err.to_string(), "invalid input: cell count must be at least 1");
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_io_error_is_renderer_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SheetError = io.into();
        assert!(matches!(err, SheetError::RendererFailure(_)));
    }

    #[test]
    fn test_json_error_is_invalid_config() {
        let parse = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: SheetError = parse.into();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }
}
