//! Submodule defining the errors used across the crate.

use crate::sql::{LexerError, Position};

/// Errors that make a whole parse fail.
///
/// Recoverable conditions are not errors: they are reported as
/// [`Diagnostic`](crate::Diagnostic)s and parsing continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input buffer has zero length.
    #[error("empty input")]
    EmptyInput,
    /// The input ended inside a `CREATE TABLE` statement.
    #[error("{position}: unexpected eof (wanted {expected})")]
    UnexpectedEof {
        /// What the parser was looking for.
        expected: &'static str,
        /// The end of the input.
        position: Position,
    },
    /// A comment or literal inside a `CREATE TABLE` statement is not closed.
    #[error(transparent)]
    Lexer(#[from] LexerError),
}

impl Error {
    /// Where in the input the failure happened, if anywhere.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::EmptyInput => None,
            Self::UnexpectedEof { position, .. } => Some(*position),
            Self::Lexer(error) => Some(error.start()),
        }
    }
}
