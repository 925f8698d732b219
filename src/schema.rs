//! The schema model built from `CREATE TABLE` statements.
mod foreign_key;
mod model;
mod table;

pub(crate) use foreign_key::PendingForeignKey;
pub use model::{ForeignKey, Schema};
pub use table::{Column, ColumnId, Table, TableFlags, TableId};
