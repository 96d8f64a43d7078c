use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConduitError;

/// Location protocol, taken from the part of a url before the first `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Jdbc,
    File,
    Http,
    Https,
}

impl Protocol {
    pub const ALL: [Protocol; 4] = [Self::Jdbc, Self::File, Self::Http, Self::Https];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jdbc => "jdbc",
            Self::File => "file",
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Exact, case-sensitive lookup; unknown tags yield `None`.
    pub fn find(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ConduitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| ConduitError::not_found("protocol", s))
    }
}

/// Logical data kind a source service reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Relational database reached through a driver url
    Jdbc,
    /// Delimited text
    Csv,
    /// Array of flat JSON objects
    Json,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [Self::Jdbc, Self::Csv, Self::Json];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jdbc => "jdbc",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn find(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = ConduitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| ConduitError::not_found("source type", s))
    }
}

/// Recognised keys of the data context property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextProperty {
    /// Comma separated header override for delimited text
    Columns,
    /// Field separator for delimited text
    Delimiter,
    /// Table a dataset is replayed into
    TargetTable,
    /// `true` for named bind markers, `false` for `?`
    UseBindVariables,
}

impl ContextProperty {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Columns => "columns",
            Self::Delimiter => "delimiter",
            Self::TargetTable => "target_table",
            Self::UseBindVariables => "use_bind_variables",
        }
    }
}

impl fmt::Display for ContextProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
