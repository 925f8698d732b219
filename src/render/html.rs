//! Hypertext documentation of the tables and their comments.

use core::fmt::{self, Write};

use super::{Escaped, Render};
use crate::ident::sanitize_identifier;
use crate::schema::Schema;

/// Renders a schema as an HTML definition list.
///
/// Tables get the anchor `tab-<name>` and columns `col-<table>.<column>`,
/// matching the `HREF`s produced by [`Dot`](super::Dot), so a rendered graph
/// can link into the documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

impl Render for Html {
    fn render<W: Write>(&self, schema: &Schema, out: &mut W) -> fmt::Result {
        writeln!(out, "<dl class=\"tabs\">")?;
        for table in schema.tables() {
            writeln!(
                out,
                "\t<dt id=\"tab-{}\">{}</dt>",
                sanitize_identifier(table.name(), None),
                Escaped::prose(table.name())
            )?;
            writeln!(out, "\t<dd>")?;
            if let Some(comment) = table.comment() {
                writeln!(out, "\t\t<div class=\"comment\">")?;
                writeln!(out, "\t\t\t{}", Escaped::prose(comment))?;
                writeln!(out, "\t\t</div>")?;
            }
            writeln!(out, "\t\t<dl class=\"cols\">")?;
            for column in table.columns() {
                writeln!(
                    out,
                    "\t\t\t<dt id=\"col-{}\">{}</dt>",
                    sanitize_identifier(table.name(), Some(column.name())),
                    Escaped::prose(column.name())
                )?;
                writeln!(out, "\t\t\t<dd>")?;
                if let Some(comment) = column.comment() {
                    writeln!(out, "\t\t\t\t<div class=\"comment\">")?;
                    writeln!(out, "\t\t\t\t\t{}", Escaped::prose(comment))?;
                    writeln!(out, "\t\t\t\t</div>")?;
                }
                writeln!(out, "\t\t\t</dd>")?;
            }
            writeln!(out, "\t\t</dl>")?;
            writeln!(out, "\t</dd>")?;
        }
        writeln!(out, "</dl>")
    }
}
