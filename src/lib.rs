#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod diagnostics;
pub mod errors;
mod ident;
pub mod render;
pub mod schema;
pub mod sql;

pub use diagnostics::{Diagnostic, DiagnosticDisplay, DiagnosticKind, Severity};
pub use errors::Error;
pub use ident::sanitize_identifier;
pub use render::{Dot, Html, Render};
pub use schema::{Column, ColumnId, ForeignKey, Schema, Table, TableFlags, TableId};
pub use sql::{ParseOptions, ParsedSchema, SchemaParser};
