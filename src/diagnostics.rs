//! Diagnostics reported while recognizing a schema.
//!
//! Recoverable conditions never abort a parse. Each one is recorded as a
//! [`Diagnostic`] in the parse outcome and emitted through `tracing`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::sql::Position;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    /// Trace message, only recorded in verbose mode.
    Note,
    /// Something in the input was ignored or could not be linked.
    Warning,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticKind {
    /// A token other than the one the grammar needs.
    #[error("unexpected: {found} (wanted \"{expected}\")")]
    UnexpectedToken {
        /// Text of the offending token.
        found: String,
        /// What was expected instead.
        expected: &'static str,
    },
    /// The input ended while skipping a statement.
    #[error("unexpected eof")]
    UnexpectedEof,
    /// A `CREATE` statement that does not create a table.
    #[error("ignoring non-table creation")]
    IgnoredCreation,
    /// A `FOREIGN KEY (col)` constraint naming a column the table lacks.
    #[error("cannot find column: {column}")]
    UnknownLocalColumn {
        /// Table holding the constraint.
        table: String,
        /// The column name in the constraint.
        column: String,
    },
    /// A foreign key pointing at a table that was never declared.
    #[error("unknown foreign key table on {table}.{column}: {target_table}.{target_column}")]
    UnknownForeignTable {
        /// Table of the referencing column.
        table: String,
        /// The referencing column.
        column: String,
        /// Referenced table.
        target_table: String,
        /// Referenced column.
        target_column: String,
    },
    /// A foreign key pointing at a column its table does not have.
    #[error("unknown foreign key column on {table}.{column}: {target_table}.{target_column}")]
    UnknownForeignColumn {
        /// Table of the referencing column.
        table: String,
        /// The referencing column.
        column: String,
        /// Referenced table.
        target_table: String,
        /// Referenced column.
        target_column: String,
    },
    /// A second foreign key for a column that is already linked.
    #[error("foreign key exists on {table}.{column}: {target_table}.{target_column}")]
    ForeignKeyExists {
        /// Table of the referencing column.
        table: String,
        /// The referencing column.
        column: String,
        /// Table of the link that is kept.
        target_table: String,
        /// Column of the link that is kept.
        target_column: String,
    },
    /// A top-level statement that is not a `CREATE`.
    #[error("ignoring top-level statement")]
    IgnoredStatement,
    /// A table was recognized.
    #[error("added table: {table}")]
    TableAdded {
        /// The table name.
        table: String,
    },
    /// A column was recognized.
    #[error("added column: {table}.{column}")]
    ColumnAdded {
        /// The table name.
        table: String,
        /// The column name.
        column: String,
    },
    /// A `REFERENCES` clause or `FOREIGN KEY` constraint was recorded.
    #[error("added reference to {table}.{column}: {target_table}.{target_column}")]
    ReferenceAdded {
        /// Table of the referencing column.
        table: String,
        /// The referencing column.
        column: String,
        /// Referenced table.
        target_table: String,
        /// Referenced column.
        target_column: String,
    },
}

impl DiagnosticKind {
    /// The severity of this kind of diagnostic.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::IgnoredStatement
            | Self::TableAdded { .. }
            | Self::ColumnAdded { .. }
            | Self::ReferenceAdded { .. } => Severity::Note,
            Self::UnexpectedToken { .. }
            | Self::UnexpectedEof
            | Self::IgnoredCreation
            | Self::UnknownLocalColumn { .. }
            | Self::UnknownForeignTable { .. }
            | Self::UnknownForeignColumn { .. }
            | Self::ForeignKeyExists { .. } => Severity::Warning,
        }
    }
}

/// A recoverable condition found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// Where the condition was found, if it has a location in the input.
    ///
    /// Foreign-key resolution runs after the whole input was read, so its
    /// diagnostics carry no position.
    pub position: Option<Position>,
    /// What happened.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// The severity of this diagnostic.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Display this diagnostic prefixed by the name of its source.
    ///
    /// Produces `source:line:column: message`, or `source: message` for
    /// diagnostics without a position.
    #[must_use]
    pub fn display<'a>(&'a self, source: &'a str) -> DiagnosticDisplay<'a> {
        DiagnosticDisplay {
            source,
            diagnostic: self,
        }
    }
}

/// Helper returned by [`Diagnostic::display`].
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticDisplay<'a> {
    source: &'a str,
    diagnostic: &'a Diagnostic,
}

impl Display for DiagnosticDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostic.position {
            Some(position) => write!(f, "{}:{position}: {}", self.source, self.diagnostic.kind),
            None => write!(f, "{}: {}", self.source, self.diagnostic.kind),
        }
    }
}

/// Collects diagnostics for one parse and mirrors them to `tracing`.
#[derive(Debug)]
pub(crate) struct Reporter<'source> {
    source: &'source str,
    verbose: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'source> Reporter<'source> {
    pub(crate) fn new(source: &'source str, verbose: bool) -> Self {
        Self {
            source,
            verbose,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn source(&self) -> &'source str {
        self.source
    }

    /// Record `kind` at `position`. Notes are kept only in verbose mode.
    pub(crate) fn report(&mut self, position: Option<Position>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic { position, kind };
        self.emit(&diagnostic);
        if self.verbose || diagnostic.severity() == Severity::Warning {
            self.diagnostics.push(diagnostic);
        }
    }

    fn emit(&self, diagnostic: &Diagnostic) {
        let source = self.source;
        let kind = &diagnostic.kind;
        match (diagnostic.severity(), diagnostic.position) {
            (Severity::Warning, Some(at)) => {
                tracing::warn!(source, line = at.line, column = at.column, "{kind}");
            }
            (Severity::Warning, None) => tracing::warn!(source, "{kind}"),
            (Severity::Note, Some(at)) => {
                tracing::debug!(source, line = at.line, column = at.column, "{kind}");
            }
            (Severity::Note, None) => tracing::debug!(source, "{kind}"),
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
