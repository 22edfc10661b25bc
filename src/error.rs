use thiserror::Error;

/// Errors that can occur while exporting the drawing to the clipboard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// There is no rendered surface to export
    #[error("export target not found")]
    MissingTarget,
    /// The surface could not be turned into markup
    #[error("failed to serialize export target: {0}")]
    Serialization(String),
    /// The system clipboard refused the write
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}
