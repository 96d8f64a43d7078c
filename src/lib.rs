//! conduit-connectors: move tabular data between relational databases, CSV
//! files and JSON documents through one in-memory [`Dataset`], and replay a
//! dataset into a relational target.
//!
//! 模块划分：
//! - registry：协议 → Connector、数据类型 → SourceService
//! - jdbc / file：连接器实现
//! - jdbc / delimited / json：SourceService 实现
//! - transfer：源到目标的数据回放

pub mod config;
pub mod connector;
pub mod error;
pub mod file;
pub mod jdbc;
pub mod json;
pub mod model;
pub mod registry;
pub mod service;
pub mod transfer;

// CSV：默认启用，关闭 `csv` 特性后不再注册分隔文本服务
#[cfg(feature = "csv")]
pub mod delimited;

pub use connector::{Connector, ConnectorHandle};
pub use error::{ConduitError, ConduitResult};
pub use model::{
    ColumnDefinition, ColumnType, ContextProperty, DataContext, Dataset, Protocol, Record,
    SourceType, Value,
};
pub use registry::{ProtocolRegistry, SourceTypeRegistry};
pub use service::SourceService;
pub use transfer::{Conduit, TransferSummary};
