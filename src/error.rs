//! Structured error types for wingrid.
//!
//! The grid engine degrades silently wherever it can (defaults, clamping,
//! zero-extent guards); these are the few conditions that cannot be absorbed.

/// All errors that can occur while configuring or attaching a grid.
#[derive(Debug, thiserror::Error)]
pub enum WingridError {
    /// The vertical scrollbar was attached without its enclosing body container.
    #[error("Unable to find the body container enclosing the vertical scrollbar")]
    MissingScrollContainer,

    /// Malformed JSON configuration or data file.
    #[error("Configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Invalid A1-style cell reference or range.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WingridError>;

#[cfg(target_arch = "wasm32")]
impl From<WingridError> for wasm_bindgen::JsValue {
    fn from(e: WingridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
