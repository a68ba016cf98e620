//! Conversion from Arrow record batches to a [`Dataset`].
//!
//! String columns go through [`Value::parse`] so that a CSV read with every
//! column as `Utf8` is typed the same way as raw records. Typed Arrow
//! columns map directly; dates and timestamps become ISO text so they
//! infer as dates.

use crate::{Column, Dataset, DatasetError, Value};
use arrow_array::array::*;
use arrow_array::{Array, RecordBatch};
use arrow_schema::{DataType, Schema, TimeUnit};
use chrono::{DateTime, NaiveDate};
use tracing::warn;

/// Days from 0001-01-01 to 1970-01-01 in the proleptic Gregorian calendar.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Builds a dataset from record batches sharing `schema`.
///
/// # Errors
///
/// Returns [`DatasetError::Conversion`] when an array does not match its
/// declared data type or holds an out-of-range date, and the usual shape
/// errors from [`Dataset::new`].
pub fn record_batches_to_dataset(
    schema: &Schema,
    batches: &[RecordBatch],
) -> Result<Dataset, DatasetError> {
    let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut columns = Vec::with_capacity(schema.fields().len());

    for (index, field) in schema.fields().iter().enumerate() {
        let mut values = Vec::with_capacity(total_rows);
        for batch in batches {
            let array = batch.columns().get(index).ok_or_else(|| {
                DatasetError::conversion(field.name(), "record batch is missing this column")
            })?;
            for row in 0..array.len() {
                values.push(arrow_value(array, row, field.name())?);
            }
        }
        columns.push(Column::new(field.name().clone(), values));
    }

    Dataset::new(columns)
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, column: &str) -> Result<&'a T, DatasetError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DatasetError::conversion(
            column,
            format!("array does not match data type {}", array.data_type()),
        )
    })
}

/// Converts one Arrow cell to a [`Value`].
pub fn arrow_value(array: &ArrayRef, row: usize, column: &str) -> Result<Value, DatasetError> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(array, column)?.value(row)),
        DataType::Int8 => Value::Int(downcast::<Int8Array>(array, column)?.value(row).into()),
        DataType::Int16 => Value::Int(downcast::<Int16Array>(array, column)?.value(row).into()),
        DataType::Int32 => Value::Int(downcast::<Int32Array>(array, column)?.value(row).into()),
        DataType::Int64 => Value::Int(downcast::<Int64Array>(array, column)?.value(row)),
        DataType::UInt8 => Value::Int(downcast::<UInt8Array>(array, column)?.value(row).into()),
        DataType::UInt16 => Value::Int(downcast::<UInt16Array>(array, column)?.value(row).into()),
        DataType::UInt32 => Value::Int(downcast::<UInt32Array>(array, column)?.value(row).into()),
        DataType::UInt64 => {
            let raw = downcast::<UInt64Array>(array, column)?.value(row);
            i64::try_from(raw)
                .map(Value::Int)
                .unwrap_or(Value::Float(raw as f64))
        }
        DataType::Float32 => float(downcast::<Float32Array>(array, column)?.value(row).into()),
        DataType::Float64 => float(downcast::<Float64Array>(array, column)?.value(row)),
        DataType::Utf8 => Value::parse(downcast::<StringArray>(array, column)?.value(row)),
        DataType::LargeUtf8 => {
            Value::parse(downcast::<LargeStringArray>(array, column)?.value(row))
        }
        DataType::Date32 => {
            let days = downcast::<Date32Array>(array, column)?.value(row);
            let date = days
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .ok_or_else(|| DatasetError::conversion(column, "date out of range"))?;
            Value::Text(date.format("%Y-%m-%d").to_string())
        }
        DataType::Timestamp(unit, _) => {
            let (seconds, nanos) = match unit {
                TimeUnit::Second => {
                    (downcast::<TimestampSecondArray>(array, column)?.value(row), 0)
                }
                TimeUnit::Millisecond => {
                    let ms = downcast::<TimestampMillisecondArray>(array, column)?.value(row);
                    (ms.div_euclid(1_000), ms.rem_euclid(1_000) * 1_000_000)
                }
                TimeUnit::Microsecond => {
                    let us = downcast::<TimestampMicrosecondArray>(array, column)?.value(row);
                    (us.div_euclid(1_000_000), us.rem_euclid(1_000_000) * 1_000)
                }
                TimeUnit::Nanosecond => {
                    let ns = downcast::<TimestampNanosecondArray>(array, column)?.value(row);
                    (ns.div_euclid(1_000_000_000), ns.rem_euclid(1_000_000_000))
                }
            };
            let datetime = DateTime::from_timestamp(seconds, nanos as u32)
                .ok_or_else(|| DatasetError::conversion(column, "timestamp out of range"))?;
            Value::Text(datetime.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
        }
        other => {
            warn!(column, data_type = ?other, "Unsupported Arrow type, treating values as null");
            Value::Null
        }
    };
    Ok(value)
}

fn float(value: f64) -> Value {
    if value.is_finite() {
        Value::Float(value)
    } else {
        Value::Null
    }
}
