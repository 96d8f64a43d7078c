//! Transfer job configuration loaded from TOML.
//!
//! ```toml
//! [source]
//! source_type = "csv"
//! url = "file:///data/insured.csv"
//! [source.properties]
//! delimiter = "|"
//!
//! [target]
//! source_type = "jdbc"
//! url = "jdbc:postgresql://localhost:5432/insurance"
//! driver = "postgres"
//! user = "jim"
//! [target.properties]
//! target_table = "spinsured"
//! use_bind_variables = "false"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConduitError, ConduitResult};
use crate::model::{ContextProperty, DataContext, SourceType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferConf {
    pub source: DataContext,
    pub target: DataContext,
}

impl TransferConf {
    pub fn from_toml_str(raw: &str) -> ConduitResult<Self> {
        toml::from_str(raw)
            .map_err(|e| ConduitError::configuration(format!("parse transfer conf fail: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> ConduitResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConduitError::configuration(format!("read {} fail: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> ConduitResult<()> {
        self.source.validate()?;
        self.target.validate()?;
        if self.target.source_type() != SourceType::Jdbc {
            return Err(ConduitError::configuration(format!(
                "target must be a jdbc source, got {}",
                self.target.source_type()
            )));
        }
        let table = self.target.property_or(ContextProperty::TargetTable, "");
        if table.trim().is_empty() {
            return Err(ConduitError::configuration(format!(
                "target.{} must not be empty",
                ContextProperty::TargetTable
            )));
        }
        Ok(())
    }
}
