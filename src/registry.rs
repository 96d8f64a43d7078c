//! Explicit lookup tables built once at startup and shared by reference.

use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::connector::Connector;
use crate::error::{ConduitError, ConduitResult};
use crate::file::FileConnector;
use crate::jdbc::{JdbcSourceService, RelationalConnector};
use crate::json::JsonSourceService;
use crate::model::{Protocol, SourceType};
use crate::service::SourceService;

/// Protocol → connector.
#[derive(Default, Clone)]
pub struct ProtocolRegistry {
    connectors: HashMap<Protocol, Arc<dyn Connector>>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relational connector for `jdbc`, file connector for `file` (and
    /// `http`/`https` when remote resources are enabled).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Protocol::Jdbc, Arc::new(RelationalConnector::default()));

        let file: Arc<dyn Connector> = Arc::new(FileConnector::new());
        registry.register(Protocol::File, file.clone());
        #[cfg(feature = "http")]
        {
            registry.register(Protocol::Http, file.clone());
            registry.register(Protocol::Https, file);
        }
        registry
    }

    pub fn register(&mut self, protocol: Protocol, connector: Arc<dyn Connector>) -> &mut Self {
        info!("loaded connector for {} protocol", protocol);
        self.connectors.insert(protocol, connector);
        self
    }

    pub fn resolve(&self, protocol: Protocol) -> ConduitResult<Arc<dyn Connector>> {
        self.connectors
            .get(&protocol)
            .cloned()
            .ok_or_else(|| ConduitError::not_found("connector", protocol.as_str()))
    }

    pub fn contains(&self, protocol: Protocol) -> bool {
        self.connectors.contains_key(&protocol)
    }
}

/// Source type → service.
#[derive(Default, Clone)]
pub struct SourceTypeRegistry {
    services: HashMap<SourceType, Arc<dyn SourceService>>,
}

impl SourceTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(protocols: Arc<ProtocolRegistry>) -> Self {
        let mut registry = Self::new();
        registry.register(
            SourceType::Jdbc,
            Arc::new(JdbcSourceService::new(protocols.clone())),
        );
        #[cfg(feature = "csv")]
        registry.register(
            SourceType::Csv,
            Arc::new(crate::delimited::CsvSourceService::new(protocols.clone())),
        );
        registry.register(SourceType::Json, Arc::new(JsonSourceService::new(protocols)));
        registry
    }

    pub fn register(
        &mut self,
        source_type: SourceType,
        service: Arc<dyn SourceService>,
    ) -> &mut Self {
        info!("loaded source service for {} type", source_type);
        self.services.insert(source_type, service);
        self
    }

    pub fn resolve(&self, source_type: SourceType) -> ConduitResult<Arc<dyn SourceService>> {
        self.services
            .get(&source_type)
            .cloned()
            .ok_or_else(|| ConduitError::not_found("source service", source_type.as_str()))
    }

    pub fn contains(&self, source_type: SourceType) -> bool {
        self.services.contains_key(&source_type)
    }
}
