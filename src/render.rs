//! Renderers consuming a finished [`Schema`].
//!
//! Renderers only read the model: they walk tables and columns in
//! alphabetical order and use [`sanitize_identifier`](crate::sanitize_identifier)
//! for anchors and ports.

use alloc::string::String;
use core::fmt::{self, Display, Write};

use crate::schema::Schema;

mod dot;
mod html;

pub use dot::Dot;
pub use html::Html;

/// Trait for output formats a schema can be rendered to.
pub trait Render {
    /// Write `schema` to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` fails.
    fn render<W: Write>(&self, schema: &Schema, out: &mut W) -> fmt::Result;

    /// Render `schema` into a new string.
    fn render_to_string(&self, schema: &Schema) -> String {
        let mut out = String::new();
        self.render(schema, &mut out)
            .expect("writing to a String cannot fail");
        out
    }
}

/// Text escaped for HTML and Graphviz HTML-like labels.
struct Escaped<'a> {
    text: &'a str,
    /// Replace every whitespace character by a plain space.
    flatten_whitespace: bool,
}

impl<'a> Escaped<'a> {
    fn label(text: &'a str) -> Self {
        Self {
            text,
            flatten_whitespace: false,
        }
    }

    fn prose(text: &'a str) -> Self {
        Self {
            text,
            flatten_whitespace: true,
        }
    }
}

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.text.chars() {
            match c {
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '&' => f.write_str("&amp;")?,
                c if self.flatten_whitespace && c.is_whitespace() => f.write_char(' ')?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}
