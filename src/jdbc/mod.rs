//! Relational sources and targets reached through `jdbc:` urls
//!
//! 模块划分：
//! - config：驱动标识与连接池参数
//! - connector：RelationalConnector
//! - row：结果行解码
//! - service：查询读取与数据集回放
//! - statement：insert 语句生成

mod config;
mod connector;
mod row;
mod service;
mod statement;

pub use config::{DriverKind, PoolConf};
pub use connector::RelationalConnector;
pub use service::{EXCLUDED_ID_COLUMN, JdbcSourceService};
pub use statement::{InsertStatement, InsertStatementBuilder, Placeholder};
