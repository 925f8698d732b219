//! Recognizer for `CREATE TABLE` statements.
//!
//! Only `CREATE [TEMP|TEMPORARY] TABLE [IF NOT EXISTS] name (...) [WITHOUT
//! ROWID];` is parsed. Every other statement is skipped up to its `;`
//! without being understood, and inside a column definition everything but
//! the column name, nested parentheses and `REFERENCES` clauses is ignored.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::lexer::{Lexer, LexerError, Position, Token};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Reporter, Severity};
use crate::errors::Error;
use crate::schema::{Column, ColumnId, PendingForeignKey, Schema, Table, TableFlags};

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Also record trace notes ("added table", ...) as diagnostics.
    pub verbose: bool,
}

/// The result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSchema {
    /// The recognized tables with resolved foreign keys.
    pub schema: Schema,
    /// Everything reported while parsing, in the order it was found.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedSchema {
    /// Diagnostics of [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Warning)
    }
}

/// Why the current statement was abandoned.
#[derive(Debug)]
enum Abort {
    /// Malformed statement: resynchronize at the next `;`.
    Syntax,
    /// Nothing more can be parsed.
    Fatal(Error),
}

impl From<Error> for Abort {
    fn from(error: Error) -> Self {
        Self::Fatal(error)
    }
}

impl From<LexerError> for Abort {
    fn from(error: LexerError) -> Self {
        Self::Fatal(Error::Lexer(error))
    }
}

/// What follows one entry of a column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnOutcome {
    /// The entry ended with `,`.
    MoreColumns,
    /// The entry ended with the `)` closing the list.
    Done,
}

/// What the top-level loop found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Table,
    Skipped,
    EndOfInput,
}

/// Parser turning schema text into a [`Schema`].
///
/// # Example
///
/// ```rust
/// use sqlite_schema_rs::SchemaParser;
///
/// let parsed = SchemaParser::new(
///     "schema.sql",
///     "CREATE TABLE a (id, name); CREATE TABLE b (id, aid REFERENCES a(id));",
/// )
/// .parse()
/// .unwrap();
///
/// let b = parsed.schema.table_by_name("b").unwrap();
/// let aid = b.column_by_name("aid").unwrap();
/// let fk = parsed.schema.foreign_key(aid).unwrap();
/// assert_eq!(fk.target_table.name(), "a");
/// assert_eq!(fk.target_column.name(), "id");
/// assert!(parsed.diagnostics.is_empty());
/// ```
#[derive(Debug)]
pub struct SchemaParser<'input> {
    lexer: Lexer<'input>,
    reporter: Reporter<'input>,
    schema: Schema,
    pending: Vec<PendingForeignKey>,
    /// Whether the last token consumed was `;`.
    at_terminator: bool,
}

impl<'input> SchemaParser<'input> {
    /// Create a parser for `input`, naming it `source` in diagnostics.
    #[must_use]
    pub fn new(source: &'input str, input: &'input str) -> Self {
        Self {
            lexer: Lexer::new(input),
            reporter: Reporter::new(source, false),
            schema: Schema::new(),
            pending: Vec::new(),
            at_terminator: false,
        }
    }

    /// Set the parse options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.reporter = Reporter::new(self.reporter.source(), options.verbose);
        self
    }

    /// Parse every statement, then resolve foreign keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, or if it ends (or a comment
    /// or literal is left open) inside a `CREATE TABLE` statement. Other
    /// problems are reported as diagnostics.
    pub fn parse(mut self) -> Result<ParsedSchema, Error> {
        if self.lexer.is_exhausted() {
            return Err(Error::EmptyInput);
        }

        loop {
            match self.statement() {
                Ok(Step::EndOfInput) => break,
                Ok(Step::Table | Step::Skipped) => {}
                Err(Abort::Syntax) => self.skip_statement(),
                Err(Abort::Fatal(error)) => {
                    tracing::warn!(source = self.reporter.source(), "{error}");
                    return Err(error);
                }
            }
        }

        let pending = core::mem::take(&mut self.pending);
        self.schema
            .resolve_foreign_keys(pending, &mut self.reporter);

        Ok(ParsedSchema {
            schema: self.schema,
            diagnostics: self.reporter.into_diagnostics(),
        })
    }

    /// Recognize one top-level statement.
    fn statement(&mut self) -> Result<Step, Abort> {
        let (comment, token) = match self.comment_run() {
            Ok(run) => run,
            // A comment left open at the end of the file is tolerated here.
            Err(error) => {
                tracing::debug!(source = self.reporter.source(), "{error}");
                return Ok(Step::EndOfInput);
            }
        };

        if token.is_eof() {
            return Ok(Step::EndOfInput);
        }
        if self.at_terminator {
            return Ok(Step::Skipped);
        }
        if !token.is_keyword("create") {
            self.note(token.position, DiagnosticKind::IgnoredStatement);
            self.skip_statement();
            return Ok(Step::Skipped);
        }

        let mut flags = TableFlags::empty();
        let mut token = self.next_significant("table")?;
        if token.is_keyword("temp") || token.is_keyword("temporary") {
            flags |= TableFlags::TEMPORARY;
            token = self.next_significant("table")?;
        }
        if !token.is_keyword("table") {
            self.reporter
                .report(Some(token.position), DiagnosticKind::IgnoredCreation);
            self.skip_statement();
            return Ok(Step::Skipped);
        }

        self.create_table(comment, flags)?;
        Ok(Step::Table)
    }

    /// Parse what follows `CREATE [TEMP] TABLE`, up to and including `;`.
    fn create_table(&mut self, comment: Option<String>, mut flags: TableFlags) -> Result<(), Abort> {
        let mut token = self.next_significant("table name")?;
        if token.is_keyword("if") {
            self.expect("not")?;
            self.expect("exists")?;
            flags |= TableFlags::IF_NOT_EXISTS;
            token = self.next_significant("table name")?;
        }
        if !token.is_name() {
            return Err(self.unexpected(token, "table name"));
        }

        let mut table = Table::new(self.schema.next_table_id(), token.text, comment, flags);
        let mut pending = Vec::new();

        self.expect("(")?;
        while self.column(&mut table, &mut pending)? == ColumnOutcome::MoreColumns {}

        let mut token = self.next_significant(";")?;
        if token.is_keyword("without") {
            self.expect("rowid")?;
            token = self.next_significant(";")?;
        }
        if !token.is_punct(b';') {
            return Err(self.unexpected(token, ";"));
        }

        self.note(
            token.position,
            DiagnosticKind::TableAdded {
                table: table.name().to_string(),
            },
        );
        self.schema.insert_table(table);
        self.pending.append(&mut pending);
        Ok(())
    }

    /// Parse one entry of a column list, including its trailing `,` or `)`.
    fn column(
        &mut self,
        table: &mut Table,
        pending: &mut Vec<PendingForeignKey>,
    ) -> Result<ColumnOutcome, Abort> {
        let (comment, token) = self.comment_run()?;
        if token.is_eof() {
            return Err(Error::UnexpectedEof {
                expected: "column definition",
                position: token.position,
            }
            .into());
        }

        let column = if token.is_keyword("foreign") {
            self.table_foreign_key(table, pending)?;
            None
        } else if token.is_keyword("unique") {
            None
        } else if token.is_name() {
            let id = table.push_column(token.text, comment);
            self.note(
                token.position,
                DiagnosticKind::ColumnAdded {
                    table: table.name().to_string(),
                    column: token.text.to_string(),
                },
            );
            Some(id)
        } else {
            return Err(self.unexpected(token, "column name"));
        };

        // Skip the type and constraints, balancing parentheses.
        let mut depth = 1_usize;
        loop {
            let token = self.next_significant(")")?;
            if let Some(id) = column.filter(|_| token.is_keyword("references")) {
                self.column_reference(table, id, pending)?;
            } else if token.is_punct(b'(') {
                depth += 1;
            } else if token.is_punct(b',') && depth == 1 {
                return Ok(ColumnOutcome::MoreColumns);
            } else if token.is_punct(b')') {
                depth -= 1;
                if depth == 0 {
                    return Ok(ColumnOutcome::Done);
                }
            }
        }
    }

    /// Parse the rest of `FOREIGN KEY (col) REFERENCES table(col)`.
    fn table_foreign_key(
        &mut self,
        table: &Table,
        pending: &mut Vec<PendingForeignKey>,
    ) -> Result<(), Abort> {
        self.expect("key")?;
        self.expect("(")?;
        let local = self.expect_name("column name")?;
        let column = table.column_by_name(local.text).map(Column::id);
        if column.is_none() {
            self.reporter.report(
                Some(local.position),
                DiagnosticKind::UnknownLocalColumn {
                    table: table.name().to_string(),
                    column: local.text.to_string(),
                },
            );
        }
        self.expect(")")?;
        self.expect("references")?;

        let (target_table, target_column) = self.reference_target()?;
        if column.is_some() {
            self.note(
                local.position,
                DiagnosticKind::ReferenceAdded {
                    table: table.name().to_string(),
                    column: local.text.to_string(),
                    target_table: target_table.clone(),
                    target_column: target_column.clone(),
                },
            );
        }
        pending.push(PendingForeignKey {
            column,
            target_table,
            target_column,
        });
        Ok(())
    }

    /// Parse the rest of an inline `REFERENCES table(col)` clause.
    fn column_reference(
        &mut self,
        table: &Table,
        column: ColumnId,
        pending: &mut Vec<PendingForeignKey>,
    ) -> Result<(), Abort> {
        let position = self.lexer.position();
        let (target_table, target_column) = self.reference_target()?;
        self.note(
            position,
            DiagnosticKind::ReferenceAdded {
                table: table.name().to_string(),
                column: table
                    .column(column.declaration_index())
                    .map(|c| c.name().to_string())
                    .unwrap_or_default(),
                target_table: target_table.clone(),
                target_column: target_column.clone(),
            },
        );
        pending.push(PendingForeignKey {
            column: Some(column),
            target_table,
            target_column,
        });
        Ok(())
    }

    /// Parse `table ( column )` after `REFERENCES`.
    fn reference_target(&mut self) -> Result<(String, String), Abort> {
        let target_table = self.expect_name("referenced table")?.text.to_string();
        self.expect("(")?;
        let target_column = self.expect_name("referenced column")?.text.to_string();
        self.expect(")")?;
        Ok((target_table, target_column))
    }

    /// Collect the comments before the next token, concatenated.
    fn comment_run(&mut self) -> Result<(Option<String>, Token<'input>), LexerError> {
        let mut comment: Option<String> = None;
        loop {
            let token = self.lexer.next_token()?;
            if !token.is_comment() {
                self.at_terminator = token.is_punct(b';');
                return Ok((comment, token));
            }
            comment.get_or_insert_with(String::new).push_str(token.text);
        }
    }

    /// The next non-comment token; the end of input is fatal.
    fn next_significant(&mut self, expected: &'static str) -> Result<Token<'input>, Abort> {
        loop {
            let token = self.lexer.next_token()?;
            if token.is_eof() {
                return Err(Error::UnexpectedEof {
                    expected,
                    position: token.position,
                }
                .into());
            }
            if !token.is_comment() {
                self.at_terminator = token.is_punct(b';');
                return Ok(token);
            }
        }
    }

    /// The next token, which must be the word or punctuation `expected`.
    fn expect(&mut self, expected: &'static str) -> Result<Token<'input>, Abort> {
        let token = self.next_significant(expected)?;
        if token.is_keyword(expected) {
            Ok(token)
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    /// The next token, which must be able to name a table or column.
    fn expect_name(&mut self, expected: &'static str) -> Result<Token<'input>, Abort> {
        let token = self.next_significant(expected)?;
        if token.is_name() {
            Ok(token)
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    fn unexpected(&mut self, token: Token<'input>, expected: &'static str) -> Abort {
        self.reporter.report(
            Some(token.position),
            DiagnosticKind::UnexpectedToken {
                found: token.text.to_string(),
                expected,
            },
        );
        Abort::Syntax
    }

    fn note(&mut self, position: Position, kind: DiagnosticKind) {
        self.reporter.report(Some(position), kind);
    }

    /// Discard tokens up to and including the next `;`.
    ///
    /// Reaching the end of the input here ends the parse with a warning.
    fn skip_statement(&mut self) {
        if self.at_terminator {
            return;
        }
        loop {
            match self.lexer.next_token() {
                Ok(token) if token.is_eof() => {
                    self.reporter
                        .report(Some(token.position), DiagnosticKind::UnexpectedEof);
                    return;
                }
                Ok(token) if token.is_punct(b';') => {
                    self.at_terminator = true;
                    return;
                }
                Ok(_) => {}
                Err(error) => {
                    self.reporter
                        .report(Some(error.start()), DiagnosticKind::UnexpectedEof);
                    return;
                }
            }
        }
    }
}
