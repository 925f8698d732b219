//! The schema model: every table recognized in one input.

use alloc::vec::Vec;
use core::str::FromStr;

use super::table::{Column, ColumnId, Table, TableId};
use crate::errors::Error;
use crate::sql::SchemaParser;

/// Tables, columns and resolved foreign keys recognized in one input.
///
/// Tables are stored in parse order, so a [`TableId`] is an index into the
/// model; [`Schema::tables`] yields them alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schema {
    tables: Vec<Table>,
    /// Table indices sorted by name, ties in parse order.
    sorted: Vec<usize>,
}

/// A resolved foreign key, seen from the referencing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey<'a> {
    /// Table of the referencing column.
    pub table: &'a Table,
    /// The referencing column.
    pub column: &'a Column,
    /// Referenced table.
    pub target_table: &'a Table,
    /// Referenced column.
    pub target_column: &'a Column,
}

impl Schema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier the next inserted table will receive.
    pub(crate) fn next_table_id(&self) -> TableId {
        TableId(self.tables.len())
    }

    /// Insert a fully parsed table at its alphabetical position.
    pub(crate) fn insert_table(&mut self, table: Table) -> TableId {
        let id = self.next_table_id();
        debug_assert_eq!(table.id(), id, "tables must be inserted in id order");
        let at = self
            .sorted
            .partition_point(|&i| self.tables[i].name() <= table.name());
        self.sorted.insert(at, id.0);
        self.tables.push(table);
        id
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.tables
            .get_mut(id.table.0)
            .and_then(|table| table.column_mut(id.column))
    }

    /// Number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in alphabetical order (ties in parse order).
    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.sorted.iter().map(|&i| &self.tables[i])
    }

    /// Tables in parse order, indexed by [`TableId::index`].
    #[must_use]
    pub fn tables_by_index(&self) -> &[Table] {
        &self.tables
    }

    /// The table with the given identifier.
    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    /// The first table, in alphabetical order, named exactly `name`.
    #[must_use]
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables().find(|table| table.name() == name)
    }

    /// The column with the given identifier.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.table(id.table).and_then(|table| table.column(id.column))
    }

    /// The resolved foreign key of `column`, if any.
    #[must_use]
    pub fn foreign_key<'a>(&'a self, column: &'a Column) -> Option<ForeignKey<'a>> {
        let target = column.foreign_key()?;
        Some(ForeignKey {
            table: self.table(column.table())?,
            column,
            target_table: self.table(target.table)?,
            target_column: self.column(target)?,
        })
    }

    /// Every resolved foreign key, by referencing table then column name.
    pub fn foreign_keys(&self) -> impl Iterator<Item = ForeignKey<'_>> + '_ {
        self.tables()
            .flat_map(Table::columns)
            .filter_map(|column| self.foreign_key(column))
    }
}

impl FromStr for Schema {
    type Err = Error;

    /// Parse schema text, discarding diagnostics.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaParser::new("<input>", s)
            .parse()
            .map(|parsed| parsed.schema)
    }
}
