//! Differential tests against SQLite itself.
//!
//! Each schema is executed in an in-memory rusqlite database and the
//! tables, columns and foreign keys SQLite reports are compared with what
//! the parser recognizes. Only schemas made of column definitions and
//! `UNIQUE` / `FOREIGN KEY` constraints are used, since other table
//! constraints are read as columns by the parser.

use std::collections::BTreeSet;

use rusqlite::Connection;
use sqlite_schema_rs::{Schema, SchemaParser};

/// `(table, column, target table, target column)`.
type Link = (String, String, String, String);

#[derive(Debug, PartialEq, Eq)]
struct Catalog {
    tables: Vec<String>,
    /// Column names per table, in declaration order.
    columns: Vec<Vec<String>>,
    foreign_keys: BTreeSet<Link>,
}

fn sqlite_catalog(sql: &str) -> Catalog {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    conn.execute_batch(sql).expect("SQLite rejected the schema");

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_schema
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .unwrap();
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let mut columns = Vec::new();
    let mut foreign_keys = BTreeSet::new();
    for table in &tables {
        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([table], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        columns.push(names);

        let mut stmt = conn
            .prepare("SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1)")
            .unwrap();
        let links = stmt
            .query_map([table], |row| {
                Ok((table.clone(), row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        for link in links {
            foreign_keys.insert(link.unwrap());
        }
    }

    Catalog {
        tables,
        columns,
        foreign_keys,
    }
}

fn parsed_catalog(schema: &Schema) -> Catalog {
    Catalog {
        tables: schema.tables().map(|t| t.name().to_string()).collect(),
        columns: schema
            .tables()
            .map(|t| {
                t.columns_by_declaration()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect()
            })
            .collect(),
        foreign_keys: schema
            .foreign_keys()
            .map(|fk| {
                (
                    fk.table.name().to_string(),
                    fk.column.name().to_string(),
                    fk.target_table.name().to_string(),
                    fk.target_column.name().to_string(),
                )
            })
            .collect(),
    }
}

fn assert_parity(sql: &str) {
    let parsed = SchemaParser::new("parity.sql", sql)
        .parse()
        .expect("Failed to parse schema");
    assert_eq!(
        parsed.warnings().count(),
        0,
        "unexpected warnings: {:?}",
        parsed.diagnostics
    );
    assert_eq!(parsed_catalog(&parsed.schema), sqlite_catalog(sql));
}

#[test]
fn test_parity_single_table() {
    assert_parity("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT);");
}

#[test]
fn test_parity_inline_references() {
    assert_parity(
        "CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE books (
             id INTEGER PRIMARY KEY,
             author INTEGER REFERENCES authors(id) ON DELETE CASCADE,
             title TEXT DEFAULT ('untitled')
         );",
    );
}

#[test]
fn test_parity_table_constraints() {
    assert_parity(
        "CREATE TABLE a (id INTEGER PRIMARY KEY, code TEXT);
         CREATE TABLE b (
             x INTEGER,
             y TEXT,
             UNIQUE (x, y),
             FOREIGN KEY (x) REFERENCES a(id)
         );",
    );
}

#[test]
fn test_parity_forward_and_self_references() {
    assert_parity(
        "CREATE TABLE nodes (
             id INTEGER PRIMARY KEY,
             parent INTEGER REFERENCES nodes(id),
             kind INTEGER REFERENCES kinds(id)
         );
         CREATE TABLE kinds (id INTEGER PRIMARY KEY, label TEXT);",
    );
}

#[test]
fn test_parity_quoted_names_and_modifiers() {
    assert_parity(
        "-- Line items.
         CREATE TABLE IF NOT EXISTS \"order items\" (
             \"line no\" INTEGER,
             qty NUMERIC(10, 2) NOT NULL
         );
         CREATE TABLE totals (
             k TEXT PRIMARY KEY,
             line INTEGER REFERENCES \"order items\"(\"line no\")
         ) WITHOUT ROWID;
         INSERT INTO totals VALUES ('a;b', 1);",
    );
}

#[test]
fn test_parity_comments_everywhere() {
    assert_parity(
        "/* header */
         CREATE TABLE t (
             /* first */ a INTEGER, -- trailing
             b /* inline */ TEXT
         );
         -- done
         ",
    );
}
