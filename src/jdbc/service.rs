use async_trait::async_trait;
use log::debug;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value as DbValue};
use std::sync::Arc;

use super::row::decode_row;
use super::statement::{InsertStatement, InsertStatementBuilder};
use crate::error::{ConduitError, ConduitResult};
use crate::model::{ColumnType, ContextProperty, DataContext, Dataset, Record, SourceType, Value};
use crate::registry::ProtocolRegistry;
use crate::service::SourceService;

/// Column never replayed into a target; targets generate their own keys.
pub const EXCLUDED_ID_COLUMN: &str = "id";

/// Reads query results and replays datasets through a relational connector.
pub struct JdbcSourceService {
    protocols: Arc<ProtocolRegistry>,
}

impl JdbcSourceService {
    pub fn new(protocols: Arc<ProtocolRegistry>) -> Self {
        Self { protocols }
    }

    async fn query_records(db: &DatabaseConnection, query: &str) -> ConduitResult<Vec<Record>> {
        let stmt = Statement::from_string(db.get_database_backend(), query.to_string());
        let rows = db
            .query_all(stmt)
            .await
            .map_err(|e| ConduitError::source_with(format!("query fail: {query}"), e))?;
        rows.iter().map(decode_row).collect()
    }

    async fn replay(
        db: &DatabaseConnection,
        stmt: &InsertStatement,
        dataset: &Dataset,
    ) -> ConduitResult<u64> {
        let backend = db.get_database_backend();
        let sql = stmt.render(backend);
        debug!("[jdbc] {}", sql);

        let types = bind_types(stmt, dataset);
        let mut affected = 0;
        for record in dataset.records() {
            debug!("[jdbc] record: {:?}", record);
            let values: Vec<DbValue> = stmt
                .bind_values(record)
                .iter()
                .zip(&types)
                .map(|(value, ty)| to_db_value(value, *ty))
                .collect();
            let result = db
                .execute(Statement::from_sql_and_values(backend, sql.clone(), values))
                .await
                .map_err(|e| {
                    ConduitError::source_with(
                        format!("insert into {} fail", stmt.table()),
                        e,
                    )
                })?;
            affected += result.rows_affected();
        }
        Ok(affected)
    }
}

#[async_trait]
impl SourceService for JdbcSourceService {
    fn source_type(&self) -> SourceType {
        SourceType::Jdbc
    }

    fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    async fn retrieve(&self, context: &DataContext) -> ConduitResult<Vec<Record>> {
        let query = context
            .query()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ConduitError::configuration("jdbc retrieve requires a query"))?;

        let db = self.initialize(context).await?.into_database()?;
        let result = Self::query_records(&db, query).await;
        close(db).await;
        result
    }

    async fn insert_dataset(&self, context: &DataContext, dataset: &Dataset) -> ConduitResult<()> {
        let conf = InsertConf::from_context(context)?;
        let stmt = InsertStatementBuilder::build(
            &conf.table,
            dataset.column_definitions(),
            conf.use_bind_variables,
            &[EXCLUDED_ID_COLUMN],
        );
        if stmt.columns().is_empty() {
            return Err(ConduitError::configuration(format!(
                "dataset has no columns to insert into {}",
                conf.table
            )));
        }

        let db = self.initialize(context).await?.into_database()?;
        let result = Self::replay(&db, &stmt, dataset).await;
        close(db).await;
        let affected = result?;
        debug!("[jdbc] {} rows written to {}", affected, conf.table);
        Ok(())
    }
}

/// Target settings read from the context property bag.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InsertConf {
    pub table: String,
    pub use_bind_variables: bool,
}

impl InsertConf {
    pub fn from_context(context: &DataContext) -> ConduitResult<Self> {
        let table = context
            .property(ContextProperty::TargetTable)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ConduitError::configuration(format!(
                    "{} must not be empty",
                    ContextProperty::TargetTable
                ))
            })?
            .to_string();
        let raw = context.property_or(ContextProperty::UseBindVariables, "true");
        let use_bind_variables = match raw.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(ConduitError::configuration(format!(
                    "{} must be true or false, got '{other}'",
                    ContextProperty::UseBindVariables
                )));
            }
        };
        Ok(Self {
            table,
            use_bind_variables,
        })
    }
}

/// Column types used for null binds. A column first seen as null takes the
/// type of its first non-null value in the dataset.
fn bind_types(stmt: &InsertStatement, dataset: &Dataset) -> Vec<ColumnType> {
    stmt.columns()
        .iter()
        .zip(stmt.column_types())
        .map(|(column, ty)| match ty {
            ColumnType::Null => dataset
                .records()
                .iter()
                .filter_map(|record| record.get(column))
                .find(|value| !value.is_null())
                .map_or(ColumnType::Null, Value::column_type),
            other => *other,
        })
        .collect()
}

fn to_db_value(value: &Value, ty: ColumnType) -> DbValue {
    match value {
        Value::Null => typed_null(ty),
        Value::Boolean(b) => (*b).into(),
        Value::Integer(i) => (*i).into(),
        Value::Float(f) => (*f).into(),
        Value::Decimal(d) => (*d).into(),
        Value::String(s) => s.clone().into(),
        Value::DateTime(dt) => (*dt).into(),
    }
}

// postgres 不接受 text 类型的 NULL 写入非文本列
fn typed_null(ty: ColumnType) -> DbValue {
    match ty {
        ColumnType::Boolean => DbValue::Bool(None),
        ColumnType::Integer => DbValue::BigInt(None),
        ColumnType::Float => DbValue::Double(None),
        ColumnType::Decimal => DbValue::Decimal(None),
        ColumnType::DateTime => DbValue::ChronoDateTime(None),
        ColumnType::String | ColumnType::Null => DbValue::String(None),
    }
}

async fn close(db: DatabaseConnection) {
    if let Err(e) = db.close().await {
        debug!("[jdbc] close connection fail: {}", e);
    }
}
