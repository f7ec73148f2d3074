//! Structured error types for pictoview.

/// All errors that can occur while parsing, laying out, or rendering a grid.
#[derive(Debug, thiserror::Error)]
pub enum PictoviewError {
    /// CSV input error (missing header, bad field, unreadable row).
    #[error("CSV parsing: {0}")]
    Csv(String),

    /// Layout computation failure.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PictoviewError>;

impl From<String> for PictoviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for PictoviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<PictoviewError> for wasm_bindgen::JsValue {
    fn from(e: PictoviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
