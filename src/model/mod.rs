//! Exchange model: access contexts, records and datasets.

mod context;
mod dataset;
mod types;
mod value;

pub use context::{DataContext, DataContextBuilder};
pub use dataset::{ColumnDefinition, Dataset, Record};
pub use types::{ContextProperty, Protocol, SourceType};
pub use value::{ColumnType, Value};

pub(crate) use dataset::json_kind;
