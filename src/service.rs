//! Source services own the read/write logic for one data kind.

use async_trait::async_trait;

use crate::connector::ConnectorHandle;
use crate::error::{ConduitError, ConduitResult};
use crate::model::{DataContext, Dataset, Record, SourceType};
use crate::registry::ProtocolRegistry;

/// Services are shared between callers and hold no per-request state: the
/// handle opened by [`initialize`](SourceService::initialize) is returned to
/// the calling operation and dropped with it.
#[async_trait]
pub trait SourceService: Send + Sync {
    fn source_type(&self) -> SourceType;

    /// Registry used to resolve the context's protocol.
    fn protocols(&self) -> &ProtocolRegistry;

    /// Resolves the connector for `context` and opens a handle.
    async fn initialize(&self, context: &DataContext) -> ConduitResult<ConnectorHandle> {
        let protocol = context.protocol()?;
        let connector = self.protocols().resolve(protocol)?;
        connector.connect(context).await
    }

    /// Rows in source emission order.
    async fn retrieve(&self, context: &DataContext) -> ConduitResult<Vec<Record>>;

    /// Retrieves then folds into a dataset. Services that decode row by row
    /// override this to fold in a single pass.
    async fn retrieve_dataset(&self, context: &DataContext) -> ConduitResult<Dataset> {
        let records = self.retrieve(context).await?;
        Ok(records.into_iter().collect())
    }

    async fn insert_dataset(&self, _context: &DataContext, _dataset: &Dataset) -> ConduitResult<()> {
        Err(ConduitError::unsupported(format!(
            "{} sources cannot be written",
            self.source_type()
        )))
    }
}
