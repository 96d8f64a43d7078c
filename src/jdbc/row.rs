//! Result-set row → [`Record`] decoding.
//!
//! Each column is decoded by trying the driver types in a fixed order and
//! taking the first one the driver accepts. A column nothing accepts fails
//! the whole read.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryResult, TryGetable};

use crate::error::{ConduitError, ConduitResult};
use crate::model::{Record, Value};

pub(crate) fn decode_row(row: &QueryResult) -> ConduitResult<Record> {
    let mut record = Record::new();
    for (idx, label) in row.column_names().into_iter().enumerate() {
        let value = decode_column(row, idx).ok_or_else(|| {
            ConduitError::source(format!("column '{label}' holds a type that cannot be decoded"))
        })?;
        record.push(label, value);
    }
    Ok(record)
}

fn decode_column(row: &QueryResult, idx: usize) -> Option<Value> {
    // 整数优先：sqlite 的 bool/datetime 也接受 INTEGER
    attempt::<i64>(row, idx, Value::Integer)
        .or_else(|| attempt::<i32>(row, idx, |v| Value::Integer(v.into())))
        .or_else(|| attempt::<i16>(row, idx, |v| Value::Integer(v.into())))
        .or_else(|| attempt::<u64>(row, idx, unsigned))
        .or_else(|| attempt::<bool>(row, idx, Value::Boolean))
        .or_else(|| attempt::<f64>(row, idx, Value::Float))
        .or_else(|| attempt::<f32>(row, idx, |v| Value::Float(v.into())))
        .or_else(|| attempt::<Decimal>(row, idx, Value::Decimal))
        .or_else(|| attempt::<NaiveDateTime>(row, idx, Value::DateTime))
        .or_else(|| attempt::<DateTime<Utc>>(row, idx, |v| Value::DateTime(v.naive_utc())))
        .or_else(|| {
            attempt::<NaiveDate>(row, idx, |v| Value::DateTime(v.and_time(NaiveTime::MIN)))
        })
        .or_else(|| attempt::<String>(row, idx, Value::String))
}

/// `None` when the driver rejects `T` for this column; SQL NULL decodes as `Value::Null`.
fn attempt<T: TryGetable>(
    row: &QueryResult,
    idx: usize,
    convert: impl FnOnce(T) -> Value,
) -> Option<Value> {
    row.try_get_by_index::<Option<T>>(idx)
        .ok()
        .map(|value| value.map_or(Value::Null, convert))
}

fn unsigned(value: u64) -> Value {
    i64::try_from(value)
        .map(Value::Integer)
        .unwrap_or_else(|_| Value::Decimal(Decimal::from(value)))
}
