//! Partitioned ("window") computations expressed as an explicit
//! group-key → value map that is then broadcast back onto the rows.
//!
//! Keeping the map step separate from the lookup step means nothing here
//! depends on an ordered window primitive: the group-by runs through polars,
//! the broadcast is a plain per-row lookup that preserves input order.

use crate::error::EtlResult;
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Null keys form their own partition, mirroring group-by semantics.
pub type PartitionKey = Option<String>;

const VALUE_ALIAS: &str = "__partition_value";

/// Evaluates `agg` once per distinct value of `key`.
///
/// Groups whose aggregate is null (e.g. the mean of an all-null column) are
/// absent from the returned map.
pub fn partition_aggregate(
    df: &DataFrame,
    key: &str,
    agg: Expr,
) -> EtlResult<HashMap<PartitionKey, f64>> {
    let grouped = df
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([agg.alias(VALUE_ALIAS)])
        .collect()?;

    let keys = grouped.column(key)?.str()?;
    let values = grouped.column(VALUE_ALIAS)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    Ok(keys
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(k, v)| v.map(|v| (k.map(str::to_owned), v)))
        .collect())
}

/// Looks up every row's partition value, in row order.
pub fn broadcast(
    df: &DataFrame,
    key: &str,
    values: &HashMap<PartitionKey, f64>,
) -> EtlResult<Vec<Option<f64>>> {
    let keys = df.column(key)?.str()?;
    Ok(keys
        .into_iter()
        .map(|k| values.get(&k.map(str::to_owned)).copied())
        .collect())
}

/// Competition rank ("1, 1, 3") of `value` in descending order within each
/// `key` partition.
///
/// A row's rank is the number of rows in its partition with a strictly
/// greater value, plus one. Nulls sort after every value and share the rank
/// following the last non-null row.
pub fn competition_rank_desc(df: &DataFrame, key: &str, value: &str) -> EtlResult<Vec<u32>> {
    let keys = df.column(key)?.str()?;
    let values = df.column(value)?.f64()?;

    let mut sorted: HashMap<PartitionKey, Vec<f64>> = HashMap::new();
    for (k, v) in keys.into_iter().zip(values.into_iter()) {
        let partition = sorted.entry(k.map(str::to_owned)).or_default();
        if let Some(v) = v {
            partition.push(v);
        }
    }
    for partition in sorted.values_mut() {
        partition.sort_by(|a, b| descending(*a, *b));
    }

    let ranks = keys
        .into_iter()
        .zip(values.into_iter())
        .map(|(k, v)| {
            let partition = sorted
                .get(&k.map(str::to_owned))
                .map(Vec::as_slice)
                .unwrap_or_default();
            let higher = match v {
                Some(v) => partition.partition_point(|other| descending(*other, v).is_lt()),
                None => partition.len(),
            };
            higher as u32 + 1
        })
        .collect();

    Ok(ranks)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
