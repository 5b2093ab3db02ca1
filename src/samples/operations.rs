//! Pure per-leaf operations on sample id sequences.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::data::domain::DataType;
use crate::foundation::core::{
    ComparisonOp, GroupKey, as_number, compare_values, is_undefined, stringify_value,
};
use crate::samples::attributes::AttributeInfo;
use crate::samples::state::SampleId;

/// Whether a nominal filter keeps or drops the listed values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NominalFilterAction {
    /// Keep samples whose value is listed.
    Retain,
    /// Drop samples whose value is listed.
    Remove,
}

/// Accessor used for sorting: ordinal attributes compare by their position in
/// the scale's domain, everything else by value.
pub fn comparison_accessor(info: &AttributeInfo) -> impl Fn(&str) -> Value + '_ {
    let domain = match info.data_type {
        DataType::Ordinal => info.scale_domain(),
        DataType::Quantitative | DataType::Nominal => None,
    };
    move |sample: &str| {
        let value = (info.accessor)(sample);
        match domain {
            Some(domain) => domain
                .iter()
                .position(|d| *d == value)
                .map_or(Value::Null, Value::from),
            None => value,
        }
    }
}

/// Stable ascending sort; undefined values go last.
pub fn sort(samples: &[SampleId], accessor: impl Fn(&str) -> Value) -> Vec<SampleId> {
    let mut keyed: Vec<(Value, &SampleId)> = samples
        .iter()
        .map(|s| (accessor(s.as_str()), s))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(Some(a), Some(b)));
    keyed.into_iter().map(|(_, s)| s.clone()).collect()
}

/// Keep the first sample of every distinct value.
pub fn retain_first_of_each(
    samples: &[SampleId],
    accessor: impl Fn(&str) -> Value,
) -> Vec<SampleId> {
    let mut seen = HashSet::new();
    samples
        .iter()
        .filter(|s| seen.insert(GroupKey::from_value(&accessor(s.as_str()))))
        .cloned()
        .collect()
}

/// Keep samples whose numeric value satisfies `value <op> operand`.
pub fn filter_quantitative(
    samples: &[SampleId],
    accessor: impl Fn(&str) -> Value,
    operator: ComparisonOp,
    operand: f64,
) -> Vec<SampleId> {
    samples
        .iter()
        .filter(|s| {
            as_number(Some(&accessor(s.as_str()))).is_some_and(|v| operator.test(v, operand))
        })
        .cloned()
        .collect()
}

/// Keep or drop samples whose value is one of `values`.
pub fn filter_nominal(
    samples: &[SampleId],
    accessor: impl Fn(&str) -> Value,
    action: NominalFilterAction,
    values: &[Value],
) -> Vec<SampleId> {
    let listed_keys: IndexSet<GroupKey> = values.iter().map(GroupKey::from_value).collect();
    samples
        .iter()
        .filter(|s| {
            let listed = listed_keys.contains(&GroupKey::from_value(&accessor(s.as_str())));
            match action {
                NominalFilterAction::Retain => listed,
                NominalFilterAction::Remove => !listed,
            }
        })
        .cloned()
        .collect()
}

/// Drop samples with a missing, null or NaN value.
pub fn filter_undefined(samples: &[SampleId], accessor: impl Fn(&str) -> Value) -> Vec<SampleId> {
    samples
        .iter()
        .filter(|s| !is_undefined(Some(&accessor(s.as_str()))))
        .cloned()
        .collect()
}

/// Partition samples by value in first-seen order. Partitions are named by
/// the stringified value.
pub fn group_by(
    samples: &[SampleId],
    accessor: impl Fn(&str) -> Value,
) -> Vec<(String, Vec<SampleId>)> {
    let mut groups: IndexMap<GroupKey, Vec<SampleId>> = IndexMap::new();
    for s in samples {
        groups
            .entry(GroupKey::from_value(&accessor(s.as_str())))
            .or_default()
            .push(s.clone());
    }
    groups
        .into_iter()
        .map(|(key, members)| (stringify_value(&key.to_value()), members))
        .collect()
}

/// Quantile of ascending `values` with linear interpolation between closest ranks.
pub fn quantile_sorted(values: &[f64], p: f64) -> Option<f64> {
    let n = values.len();
    let first = *values.first()?;
    if n < 2 || p <= 0.0 {
        return Some(first);
    }
    if p >= 1.0 {
        return values.last().copied();
    }
    let i = (n - 1) as f64 * p;
    let i0 = i.floor() as usize;
    let lo = values[i0];
    let hi = values[(i0 + 1).min(n - 1)];
    Some(lo + (hi - lo) * (i - i0 as f64))
}

/// Quartile thresholds of the numeric values of `samples`. Empty when no
/// sample has a numeric value.
pub fn quartiles(samples: &[SampleId], accessor: impl Fn(&str) -> Value) -> Vec<f64> {
    let mut values: Vec<f64> = samples
        .iter()
        .filter_map(|s| as_number(Some(&accessor(s.as_str()))))
        .collect();
    let gaps = samples.len() - values.len();
    if gaps > 0 {
        tracing::warn!(gaps, "excluded undefined or non-numeric values from quartiles");
    }
    values.sort_by(f64::total_cmp);
    [0.25, 0.5, 0.75]
        .into_iter()
        .filter_map(|p| quantile_sorted(&values, p))
        .collect()
}

/// Index of the first threshold strictly greater than the value, the number
/// of thresholds when none is, or `Null` for a non-numeric value.
pub fn quantile_bucket(value: &Value, thresholds: &[f64]) -> Value {
    let Some(v) = as_number(Some(value)) else {
        return Value::Null;
    };
    let index = thresholds
        .iter()
        .position(|t| v < *t)
        .unwrap_or(thresholds.len());
    Value::from(index)
}

#[cfg(test)]
#[path = "../../tests/unit/samples/operations.rs"]
mod tests;
