use serde_json::Value as JsonValue;

use super::value::{ColumnType, Value};
use crate::error::{ConduitError, ConduitResult};

/// Column of a dataset. `ordinal` is 1-based and fixed once assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub runtime_type: ColumnType,
    pub ordinal: usize,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, runtime_type: ColumnType, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            runtime_type,
            ordinal,
        }
    }
}

/// One row: `(column, value)` pairs in the order the source emitted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Builds a record from a flat JSON object, keeping key order.
    pub fn from_json(value: JsonValue) -> ConduitResult<Self> {
        let map = match value {
            JsonValue::Object(map) => map,
            other => {
                return Err(ConduitError::format(format!(
                    "expected a JSON object per row, got {}",
                    json_kind(&other)
                )));
            }
        };
        let mut record = Record::new();
        for (name, value) in map {
            let value = Value::from_json(value).map_err(|_| {
                ConduitError::format(format!("column '{name}' holds a nested value"))
            })?;
            record.push(name, value);
        }
        Ok(record)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Format-agnostic table exchanged between a source and a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    column_definitions: Vec<ColumnDefinition>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_definitions(&self) -> &[ColumnDefinition] {
        &self.column_definitions
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn column_definition(&self, name: &str) -> Option<&ColumnDefinition> {
        self.column_definitions.iter().find(|d| d.name == name)
    }

    pub fn has_column_definition(&self, name: &str) -> bool {
        self.column_definition(name).is_some()
    }

    /// Adds `definition` unless a column with the same name exists.
    /// Returns `false` (and keeps the original ordinal) for duplicates.
    /// An ordinal not above every assigned one is replaced by the next free ordinal.
    pub fn add_column_definition(&mut self, mut definition: ColumnDefinition) -> bool {
        if self.has_column_definition(&definition.name) {
            return false;
        }
        let next = self.next_ordinal();
        if definition.ordinal < next {
            definition.ordinal = next;
        }
        self.column_definitions.push(definition);
        true
    }

    fn next_ordinal(&self) -> usize {
        self.column_definitions
            .iter()
            .map(|d| d.ordinal)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Appends `record` and defines every column it names that is not known yet.
    pub fn add_row(&mut self, record: Record) {
        for (name, value) in record.iter() {
            if self.has_column_definition(name) {
                continue;
            }
            // 序号按首次出现顺序递增，已分配的不再调整
            let ordinal = self.next_ordinal();
            self.column_definitions
                .push(ColumnDefinition::new(name, value.column_type(), ordinal));
        }
        self.add_record(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for record in iter {
            dataset.add_row(record);
        }
        dataset
    }
}
