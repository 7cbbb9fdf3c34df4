use thiserror::Error;

/// Caller-facing argument and lookup errors. Plumbing failures (I/O, SQLite)
/// travel as `anyhow::Error` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OratioError {
    #[error("invalid highlight range {start}..{end}: start must be before end")]
    InvalidRange { start: usize, end: usize },

    #[error("unsupported language '{0}'")]
    UnknownLanguage(String),

    #[error("unknown note category '{0}'")]
    UnknownNoteCategory(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("novena '{0}' is already in progress")]
    NovenaAlreadyActive(String),
}
