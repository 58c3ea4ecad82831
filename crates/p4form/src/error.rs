use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

/// Errors reported by the structured (`Result`-returning) entry points.
///
/// The boolean `parse` methods never produce these; they signal failure by
/// returning `false` and leave the decision to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no field headers found in form text")]
    NoFields,

    #[error("view line must have exactly two paths, found {tokens}: {line:?}")]
    MalformedViewLine { line: String, tokens: usize },

    #[error("unterminated quote in line: {0:?}")]
    UnterminatedQuote(String),

    #[error("malformed {kind} entry: {line:?}")]
    MalformedEntry { kind: &'static str, line: String },

    #[error("invalid field definition: {0:?}")]
    InvalidFieldDefinition(String),
}
