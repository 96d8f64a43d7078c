use async_trait::async_trait;
use log::debug;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::error::{ConduitError, ConduitResult};
use crate::model::{DataContext, Record, SourceType, json_kind};
use crate::registry::ProtocolRegistry;
use crate::service::SourceService;

/// Reads a resource holding a top-level array of flat JSON objects.
pub struct JsonSourceService {
    protocols: Arc<ProtocolRegistry>,
}

impl JsonSourceService {
    pub fn new(protocols: Arc<ProtocolRegistry>) -> Self {
        Self { protocols }
    }
}

#[async_trait]
impl SourceService for JsonSourceService {
    fn source_type(&self) -> SourceType {
        SourceType::Json
    }

    fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    async fn retrieve(&self, context: &DataContext) -> ConduitResult<Vec<Record>> {
        let resource = self.initialize(context).await?.into_resource()?;
        let name = resource.describe();
        let bytes = resource.read_bytes().await?;
        let records = decode_records(&bytes)?;
        debug!("[json] {} rows from {}", records.len(), name);
        Ok(records)
    }
}

pub fn decode_records(input: &[u8]) -> ConduitResult<Vec<Record>> {
    let value: JsonValue = serde_json::from_slice(input)
        .map_err(|e| ConduitError::format_with("malformed JSON document", e))?;
    let rows = match value {
        JsonValue::Array(rows) => rows,
        other => {
            return Err(ConduitError::format(format!(
                "expected a top-level array of objects, got {}",
                json_kind(&other)
            )));
        }
    };
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            Record::from_json(row).map_err(|e| ConduitError::format(format!("row {idx}: {e}")))
        })
        .collect()
}
