use crate::error::{ConduitError, ConduitResult};
use crate::model::{ContextProperty, DataContext};

pub const DEFAULT_DELIMITER: u8 = b',';

/// Decoding settings for delimited text, taken from the context properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConf {
    pub delimiter: u8,
    /// Explicit header; `None` means the first line is the header.
    pub columns: Option<Vec<String>>,
}

impl Default for CsvConf {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            columns: None,
        }
    }
}

impl CsvConf {
    pub fn from_context(context: &DataContext) -> ConduitResult<Self> {
        let delimiter = match context.property(ContextProperty::Delimiter) {
            None => DEFAULT_DELIMITER,
            Some(raw) => parse_delimiter(raw)?,
        };
        Ok(Self {
            delimiter,
            columns: context.property(ContextProperty::Columns).and_then(parse_columns),
        })
    }
}

// 只取第一个字符作为分隔符
fn parse_delimiter(raw: &str) -> ConduitResult<u8> {
    let first = raw.chars().next().ok_or_else(|| {
        ConduitError::configuration(format!("{} must not be empty", ContextProperty::Delimiter))
    })?;
    if !first.is_ascii() {
        return Err(ConduitError::configuration(format!(
            "{} must be an ASCII character, got '{first}'",
            ContextProperty::Delimiter
        )));
    }
    Ok(first as u8)
}

fn parse_columns(raw: &str) -> Option<Vec<String>> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.split(',').map(|c| c.trim().to_string()).collect())
}
