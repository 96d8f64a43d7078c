//! SQL `insert` synthesis for replaying a dataset.
//!
//! The builder is pure: it only looks at column definitions, never at data.
//! Column names and placeholders always line up one-to-one, which is what
//! positional binding in [`InsertStatement::bind_values`] relies on.

use sea_orm::DatabaseBackend;
use std::collections::HashSet;
use std::fmt;

use crate::model::{ColumnDefinition, ColumnType, Record, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Positional,
    /// `:name`, derived from the column name
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: String,
    columns: Vec<String>,
    column_types: Vec<ColumnType>,
    placeholders: Vec<Placeholder>,
}

pub struct InsertStatementBuilder;

impl InsertStatementBuilder {
    /// Same as [`build`](Self::build) with positional `?` placeholders.
    pub fn build_positional(
        table: &str,
        definitions: &[ColumnDefinition],
        excluded: &[&str],
    ) -> InsertStatement {
        Self::build(table, definitions, false, excluded)
    }

    pub fn build(
        table: &str,
        definitions: &[ColumnDefinition],
        use_bind_variables: bool,
        excluded: &[&str],
    ) -> InsertStatement {
        let excluded: HashSet<String> = excluded.iter().map(|c| c.to_uppercase()).collect();

        let mut kept: Vec<&ColumnDefinition> = definitions
            .iter()
            .filter(|d| !excluded.contains(&d.name.to_uppercase()))
            .collect();
        kept.sort_by_key(|d| d.ordinal);

        let columns: Vec<String> = kept.iter().map(|d| d.name.clone()).collect();
        let column_types = kept.iter().map(|d| d.runtime_type).collect();
        let placeholders = if use_bind_variables {
            bind_markers(&columns)
                .into_iter()
                .map(Placeholder::Named)
                .collect()
        } else {
            vec![Placeholder::Positional; columns.len()]
        };

        InsertStatement {
            table: table.to_string(),
            columns,
            column_types,
            placeholders,
        }
    }
}

impl InsertStatement {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Runtime types of [`columns`](Self::columns), same order.
    pub fn column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Backend-neutral statement text (`?` or `:name` markers).
    pub fn sql(&self) -> String {
        self.render_with(|_, placeholder| match placeholder {
            Placeholder::Positional => "?".to_string(),
            Placeholder::Named(name) => format!(":{name}"),
        })
    }

    /// Statement text in the marker syntax the backend's driver binds.
    pub fn render(&self, backend: DatabaseBackend) -> String {
        self.render_with(|idx, placeholder| match (backend, placeholder) {
            (DatabaseBackend::Postgres, _) => format!("${}", idx + 1),
            (DatabaseBackend::Sqlite, Placeholder::Named(_)) => format!("?{}", idx + 1),
            _ => "?".to_string(),
        })
    }

    /// Values of `record` in statement column order; absent columns bind null.
    pub fn bind_values(&self, record: &Record) -> Vec<Value> {
        self.columns
            .iter()
            .map(|column| record.get(column).cloned().unwrap_or(Value::Null))
            .collect()
    }

    fn render_with(&self, marker: impl Fn(usize, &Placeholder) -> String) -> String {
        let values = self
            .placeholders
            .iter()
            .enumerate()
            .map(|(idx, p)| marker(idx, p))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "insert into {} ({}) values ({})",
            self.table,
            self.columns.join(", "),
            values
        )
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

/// One marker per column; names that sanitise to the same marker get a suffix.
fn bind_markers(columns: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(columns.len());
    columns
        .iter()
        .map(|column| {
            let mut base: String = column
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
                base.insert_str(0, "c_");
            }
            let mut marker = base.clone();
            let mut n = 2;
            while !taken.insert(marker.to_ascii_lowercase()) {
                marker = format!("{base}_{n}");
                n += 1;
            }
            marker
        })
        .collect()
}
