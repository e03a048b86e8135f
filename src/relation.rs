//! Qualified table names.

use std::fmt;

use serde::Deserialize;

/// A qualified table name `(schema, table)`.
///
/// Only equality and hashing are meaningful — relations are lookup keys,
/// never ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Relation {
    schema: String,
    table: String,
}

impl Relation {
    /// Create a relation from a schema and table name.
    #[must_use]
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// The schema name.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

fn is_bare_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn quote_identifier(ident: &str) -> String {
    if is_bare_identifier(ident) {
        ident.to_owned()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

impl fmt::Display for Relation {
    /// Renders as `schema.table`, quoting each part only when required.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            quote_identifier(&self.schema),
            quote_identifier(&self.table)
        )
    }
}
