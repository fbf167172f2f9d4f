//! Error types for fragment annotation and slide conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while annotating a document or loading its content.
///
/// The conversion engine itself never fails: every annotation field has a
/// defined default, so rendering is total over any operation list.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The host has no selection, or the selection is empty.
    #[error("No text selected")]
    EmptySelection,

    /// A range lies outside the document or splits an atomic run.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A localization key has no entry in the translation table.
    #[error("Translation key not found: {0}")]
    UnknownTranslationKey(String),

    /// The requested language has no translations.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The operation list could not be parsed from JSON.
    #[error("Delta parsing error: {0}")]
    DeltaParseError(#[from] serde_json::Error),

    /// The markup of an annotated run could not be parsed.
    #[error("Annotated run markup error: {0}")]
    NodeParseError(String),
}

impl Error {
    /// Localization key of the user-facing notice for this error, if any.
    pub fn notice_key(&self) -> Option<&'static str> {
        match self {
            Error::EmptySelection => Some("ui.selectText"),
            _ => None,
        }
    }
}
