//! Recognizer for the `CREATE TABLE` subset of SQLite DDL.
//!
//! This module provides a lightweight lexer and parser that only understand
//! enough SQL to build a [`Schema`](crate::Schema):
//! - `CREATE [TEMP|TEMPORARY] TABLE [IF NOT EXISTS]` statements
//! - inline `REFERENCES` clauses and table-level `FOREIGN KEY` constraints
//! - comments, kept as documentation for the table or column that follows
//!
//! Any other statement is skipped up to its terminating `;`.

mod lexer;
mod parser;

pub use lexer::{Lexer, LexerError, Position, Token, TokenKind};
pub use parser::{ParseOptions, ParsedSchema, SchemaParser};
