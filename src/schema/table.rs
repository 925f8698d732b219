//! Table and column records of a recognized schema.

use alloc::string::String;
use alloc::vec::Vec;

bitflags::bitflags! {
    /// Modifiers written in a `CREATE TABLE` statement.
    ///
    /// These are informational only: renderers do not use them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct TableFlags: u8 {
        /// `CREATE TEMP TABLE` or `CREATE TEMPORARY TABLE`.
        const TEMPORARY = 0x01;
        /// `CREATE TABLE IF NOT EXISTS`.
        const IF_NOT_EXISTS = 0x02;
    }
}

/// Stable identifier of a table: the order in which tables were parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableId(pub(crate) usize);

impl TableId {
    /// The 0-based table index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable identifier of a column: its table plus its declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnId {
    pub(crate) table: TableId,
    pub(crate) column: usize,
}

impl ColumnId {
    /// The table owning the column.
    #[must_use]
    pub fn table(self) -> TableId {
        self.table
    }

    /// The 0-based position of the column in source order.
    #[must_use]
    pub fn declaration_index(self) -> usize {
        self.column
    }
}

/// A column declared in a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Column {
    id: ColumnId,
    name: String,
    comment: Option<String>,
    foreign_key: Option<ColumnId>,
}

impl Column {
    /// The identifier of this column.
    #[must_use]
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// The table owning this column.
    #[must_use]
    pub fn table(&self) -> TableId {
        self.id.table
    }

    /// The 0-based position of this column in source order.
    ///
    /// This is independent of the alphabetical order in which
    /// [`Table::columns`] yields columns.
    #[must_use]
    pub fn declaration_index(&self) -> usize {
        self.id.column
    }

    /// The column name, as written (quotes removed).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comments written immediately before the column, concatenated.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The column this one references, once foreign keys are resolved.
    #[must_use]
    pub fn foreign_key(&self) -> Option<ColumnId> {
        self.foreign_key
    }

    pub(crate) fn set_foreign_key(&mut self, target: ColumnId) {
        self.foreign_key = Some(target);
    }
}

/// A table declared by a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Table {
    id: TableId,
    name: String,
    comment: Option<String>,
    flags: TableFlags,
    /// Columns in declaration order, indexed by declaration index.
    columns: Vec<Column>,
    /// Declaration indices sorted by column name, ties in declaration order.
    sorted: Vec<usize>,
}

impl Table {
    pub(crate) fn new(
        id: TableId,
        name: impl Into<String>,
        comment: Option<String>,
        flags: TableFlags,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            comment,
            flags,
            columns: Vec::new(),
            sorted: Vec::new(),
        }
    }

    /// Declare a new column, returning its identifier.
    pub(crate) fn push_column(
        &mut self,
        name: impl Into<String>,
        comment: Option<String>,
    ) -> ColumnId {
        let name = name.into();
        let id = ColumnId {
            table: self.id,
            column: self.columns.len(),
        };
        let at = self
            .sorted
            .partition_point(|&i| self.columns[i].name <= name);
        self.sorted.insert(at, id.column);
        self.columns.push(Column {
            id,
            name,
            comment,
            foreign_key: None,
        });
        id
    }

    pub(crate) fn column_mut(&mut self, declaration_index: usize) -> Option<&mut Column> {
        self.columns.get_mut(declaration_index)
    }

    /// The identifier of this table.
    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// The 0-based order in which this table was parsed.
    #[must_use]
    pub fn index(&self) -> usize {
        self.id.0
    }

    /// The table name, as written (quotes removed).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comments written immediately before the statement, concatenated.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Modifiers of the `CREATE TABLE` statement.
    #[must_use]
    pub fn flags(&self) -> TableFlags {
        self.flags
    }

    /// Number of columns declared.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in alphabetical order (ties in declaration order).
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.sorted.iter().map(|&i| &self.columns[i])
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns_by_declaration(&self) -> &[Column] {
        &self.columns
    }

    /// The column with the given declaration index.
    #[must_use]
    pub fn column(&self, declaration_index: usize) -> Option<&Column> {
        self.columns.get(declaration_index)
    }

    /// The first column, in alphabetical order, named exactly `name`.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns().find(|column| column.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn names(table: &Table) -> Vec<(&str, usize)> {
        table
            .columns()
            .map(|c| (c.name(), c.declaration_index()))
            .collect()
    }

    #[test]
    fn test_columns_sorted_by_name() {
        let mut table = Table::new(TableId(0), "t", None, TableFlags::empty());
        table.push_column("zeta", None);
        table.push_column("alpha", None);
        table.push_column("mid", None);

        assert_eq!(names(&table), vec![("alpha", 1), ("mid", 2), ("zeta", 0)]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.columns_by_declaration()[0].name(), "zeta");
    }

    #[test]
    fn test_equal_names_keep_declaration_order() {
        let mut table = Table::new(TableId(3), "t", None, TableFlags::empty());
        table.push_column("b", None);
        table.push_column("a", Some("first".into()));
        table.push_column("a", Some("second".into()));

        assert_eq!(names(&table), vec![("a", 1), ("a", 2), ("b", 0)]);
        assert_eq!(table.column_by_name("a").unwrap().comment(), Some("first"));
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let mut table = Table::new(TableId(0), "t", None, TableFlags::empty());
        table.push_column("b", None);
        table.push_column("B", None);
        table.push_column("_", None);

        let order: Vec<&str> = table.columns().map(Column::name).collect();
        assert_eq!(order, vec!["B", "_", "b"]);
    }

    #[test]
    fn test_column_ids_point_back_to_table() {
        let mut table = Table::new(TableId(7), "t", None, TableFlags::TEMPORARY);
        let id = table.push_column("c", None);
        assert_eq!(id.table(), TableId(7));
        assert_eq!(id.declaration_index(), 0);
        assert_eq!(table.column(0).unwrap().table().index(), 7);
        assert!(table.flags().contains(TableFlags::TEMPORARY));
        assert!(table.column(1).is_none());
    }
}
