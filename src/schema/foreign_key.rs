//! Foreign-key resolution.
//!
//! While parsing, every `REFERENCES` clause and `FOREIGN KEY` constraint is
//! recorded as a [`PendingForeignKey`] holding raw names. Once the whole
//! input has been read, [`Schema::resolve_foreign_keys`] turns them into
//! column-to-column links, so references may point forward or backward.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::model::Schema;
use super::table::{Column, ColumnId, TableId};
use crate::diagnostics::{DiagnosticKind, Reporter};

/// An unresolved foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingForeignKey {
    /// The referencing column, absent when a table-level constraint named a
    /// column the table does not have.
    pub(crate) column: Option<ColumnId>,
    /// Referenced table name, as written.
    pub(crate) target_table: String,
    /// Referenced column name, as written.
    pub(crate) target_column: String,
}

impl Schema {
    /// Link columns to the columns they reference.
    ///
    /// Pending keys are applied in creation order. A missing target table or
    /// column, or a column that is already linked, produces a warning and the
    /// key is dropped: the first link of a column wins.
    pub(crate) fn resolve_foreign_keys(
        &mut self,
        pending: Vec<PendingForeignKey>,
        reporter: &mut Reporter<'_>,
    ) {
        let lookups: Vec<(ColumnId, Result<ColumnId, DiagnosticKind>)> = {
            let by_name = self.tables_by_name();
            pending
                .into_iter()
                .filter_map(|fkey| {
                    let owner = fkey.column?;
                    Some((owner, self.lookup_target(&by_name, owner, &fkey)))
                })
                .collect()
        };

        for (owner, target) in lookups {
            let target = match target {
                Ok(target) => target,
                Err(kind) => {
                    reporter.report(None, kind);
                    continue;
                }
            };
            if let Some(kind) = self.existing_link(owner) {
                reporter.report(None, kind);
                continue;
            }
            if let Some(column) = self.column_mut(owner) {
                column.set_foreign_key(target);
            }
        }
    }

    /// Tables by exact name; the first in alphabetical order wins.
    fn tables_by_name(&self) -> HashMap<&str, TableId> {
        let mut by_name = HashMap::with_capacity(self.len());
        for table in self.tables() {
            by_name.entry(table.name()).or_insert(table.id());
        }
        by_name
    }

    fn lookup_target(
        &self,
        by_name: &HashMap<&str, TableId>,
        owner: ColumnId,
        fkey: &PendingForeignKey,
    ) -> Result<ColumnId, DiagnosticKind> {
        let (table, column) = self.names(owner);
        let Some(target_table) = by_name
            .get(fkey.target_table.as_str())
            .and_then(|&id| self.table(id))
        else {
            return Err(DiagnosticKind::UnknownForeignTable {
                table,
                column,
                target_table: fkey.target_table.clone(),
                target_column: fkey.target_column.clone(),
            });
        };
        target_table
            .column_by_name(&fkey.target_column)
            .map(Column::id)
            .ok_or_else(|| DiagnosticKind::UnknownForeignColumn {
                table,
                column,
                target_table: fkey.target_table.clone(),
                target_column: fkey.target_column.clone(),
            })
    }

    /// A conflict diagnostic if `owner` is already linked.
    fn existing_link(&self, owner: ColumnId) -> Option<DiagnosticKind> {
        let existing = self.column(owner)?.foreign_key()?;
        let (table, column) = self.names(owner);
        let (target_table, target_column) = self.names(existing);
        Some(DiagnosticKind::ForeignKeyExists {
            table,
            column,
            target_table,
            target_column,
        })
    }

    fn names(&self, id: ColumnId) -> (String, String) {
        let table = self.table(id.table).map(|t| t.name().to_string());
        let column = self.column(id).map(|c| c.name().to_string());
        (table.unwrap_or_default(), column.unwrap_or_default())
    }
}
