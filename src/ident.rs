//! Display-safe identifiers for anchors and graph ports.

use alloc::string::String;

/// Map a table name, or a table and column name pair, to an identifier
/// usable as an HTML anchor or Graphviz port.
///
/// The parts are joined with `.`. ASCII alphanumerics, `-`, `_` and `.`
/// are kept; every other character becomes `_`.
///
/// # Example
///
/// ```rust
/// use sqlite_schema_rs::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("order items", None), "order_items");
/// assert_eq!(sanitize_identifier("users", Some("e-mail")), "users.e-mail");
/// ```
#[must_use]
pub fn sanitize_identifier(table: &str, column: Option<&str>) -> String {
    let mut id = String::with_capacity(table.len() + column.map_or(0, |c| c.len() + 1));
    push_sanitized(&mut id, table);
    if let Some(column) = column {
        id.push('.');
        push_sanitized(&mut id, column);
    }
    id
}

fn push_sanitized(out: &mut String, part: &str) {
    out.extend(part.chars().map(|c| {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            c
        } else {
            '_'
        }
    }));
}
