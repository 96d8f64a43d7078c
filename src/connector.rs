//! Connectors turn a data context into a live handle.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::fmt;

use crate::error::{ConduitError, ConduitResult};
use crate::file::Resource;
use crate::model::{DataContext, Protocol};

#[async_trait]
pub trait Connector: Send + Sync {
    fn supported_protocol(&self) -> Protocol;

    /// Opens exactly one handle; nothing is left open when this fails.
    async fn connect(&self, context: &DataContext) -> ConduitResult<ConnectorHandle>;
}

/// Live handle produced by a connector, owned by a single service call.
pub enum ConnectorHandle {
    Database(DatabaseConnection),
    Resource(Resource),
}

impl ConnectorHandle {
    pub fn into_database(self) -> ConduitResult<DatabaseConnection> {
        match self {
            Self::Database(db) => Ok(db),
            Self::Resource(resource) => Err(ConduitError::configuration(format!(
                "expected a database handle, got resource {}",
                resource.describe()
            ))),
        }
    }

    pub fn into_resource(self) -> ConduitResult<Resource> {
        match self {
            Self::Resource(resource) => Ok(resource),
            Self::Database(_) => Err(ConduitError::configuration(
                "expected a readable resource, got a database handle",
            )),
        }
    }
}

impl fmt::Debug for ConnectorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(db) => write!(f, "Database({:?})", db.get_database_backend()),
            Self::Resource(resource) => write!(f, "Resource({})", resource.describe()),
        }
    }
}
