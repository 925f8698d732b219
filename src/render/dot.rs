//! Graphviz output: one node per table, one edge per foreign key.

use core::fmt::{self, Write};

use super::{Escaped, Render};
use crate::ident::sanitize_identifier;
use crate::schema::Schema;

/// Renders a schema as a Graphviz `digraph`.
///
/// Each table is a node `table<index>` whose HTML-like label has one row
/// per column, with port `f<declaration index>`. Each resolved foreign key
/// is an edge between the two ports. Node and port names use the stable
/// indices, so they do not change when names sort differently.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dot;

impl Render for Dot {
    fn render<W: Write>(&self, schema: &Schema, out: &mut W) -> fmt::Result {
        writeln!(out, "digraph G {{")?;
        for table in schema.tables() {
            writeln!(
                out,
                "\ttable{} [shape=plaintext, label=<<TABLE HREF=\"#tab-{}\">",
                table.index(),
                sanitize_identifier(table.name(), None)
            )?;
            writeln!(
                out,
                "\t\t\t<TR><TD><B>{}</B></TD></TR>",
                Escaped::label(table.name())
            )?;
            for column in table.columns() {
                writeln!(
                    out,
                    "\t\t\t<TR><TD HREF=\"#col-{}\" PORT=\"f{}\">{}</TD></TR>",
                    sanitize_identifier(table.name(), Some(column.name())),
                    column.declaration_index(),
                    Escaped::label(column.name())
                )?;
            }
            writeln!(out, "\t\t</TABLE>>];")?;
            for column in table.columns() {
                if let Some(target) = column.foreign_key() {
                    writeln!(
                        out,
                        "\ttable{}:f{} -> table{}:f{};",
                        table.index(),
                        column.declaration_index(),
                        target.table().index(),
                        target.declaration_index()
                    )?;
                }
            }
        }
        writeln!(out, "}}")
    }
}
