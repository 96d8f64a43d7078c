//! Source → dataset → target replay.

use log::info;
use std::sync::Arc;

use crate::config::TransferConf;
use crate::error::ConduitResult;
use crate::model::{DataContext, Dataset, Record};
use crate::registry::{ProtocolRegistry, SourceTypeRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub records: usize,
    pub columns: usize,
}

/// Entry point resolving the service for each context's source type.
#[derive(Clone)]
pub struct Conduit {
    services: SourceTypeRegistry,
}

impl Conduit {
    pub fn new(services: SourceTypeRegistry) -> Self {
        Self { services }
    }

    pub fn with_defaults() -> Self {
        let protocols = Arc::new(ProtocolRegistry::with_defaults());
        Self::new(SourceTypeRegistry::with_defaults(protocols))
    }

    pub fn services(&self) -> &SourceTypeRegistry {
        &self.services
    }

    pub async fn retrieve(&self, context: &DataContext) -> ConduitResult<Vec<Record>> {
        self.services
            .resolve(context.source_type())?
            .retrieve(context)
            .await
    }

    pub async fn retrieve_dataset(&self, context: &DataContext) -> ConduitResult<Dataset> {
        self.services
            .resolve(context.source_type())?
            .retrieve_dataset(context)
            .await
    }

    pub async fn insert_dataset(&self, context: &DataContext, dataset: &Dataset) -> ConduitResult<()> {
        self.services
            .resolve(context.source_type())?
            .insert_dataset(context, dataset)
            .await
    }

    /// Reads `source` fully, then replays it into `target`.
    pub async fn transfer(
        &self,
        source: &DataContext,
        target: &DataContext,
    ) -> ConduitResult<TransferSummary> {
        // 两端服务都先解析，避免读完数据才发现目标不可用
        let reader = self.services.resolve(source.source_type())?;
        let writer = self.services.resolve(target.source_type())?;

        let dataset = reader.retrieve_dataset(source).await?;
        writer.insert_dataset(target, &dataset).await?;

        let summary = TransferSummary {
            records: dataset.len(),
            columns: dataset.column_definitions().len(),
        };
        info!(
            "transfer {} -> {} done: {} records, {} columns",
            source.url(),
            target.url(),
            summary.records,
            summary.columns
        );
        Ok(summary)
    }

    pub async fn run(&self, conf: &TransferConf) -> ConduitResult<TransferSummary> {
        conf.validate()?;
        self.transfer(&conf.source, &conf.target).await
    }
}
