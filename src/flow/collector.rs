use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::data::group::Group;
use crate::foundation::core::{Datum, FieldPath, GroupKey, compare_values, one_or_many};
use crate::foundation::error::{GentrackError, GentrackResult};

/// Sort direction for a comparator field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Comparator configuration: one or more fields with matching orders.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompareParams {
    /// Fields to compare, most significant first.
    #[serde(deserialize_with = "one_or_many")]
    pub field: Vec<String>,
    /// Per-field order; missing entries default to ascending.
    #[serde(default, deserialize_with = "one_or_many")]
    pub order: Vec<SortOrder>,
}

impl CompareParams {
    /// Ascending comparator on a single field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            field: vec![name.into()],
            order: Vec::new(),
        }
    }
}

/// Collector configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CollectorParams {
    /// Fields to group by, outermost first.
    #[serde(default)]
    pub groupby: Vec<String>,
    /// Optional comparator applied within every group.
    #[serde(default)]
    pub sort: Option<CompareParams>,
}

/// Terminal node buffering propagated records into a grouped hierarchy.
///
/// Records are bucketed by the composite `groupby` key in first-seen order.
/// On completion each bucket is sorted and the hierarchy is rebuilt, so the
/// exposed [`Group`] always reflects the latest load cycle.
#[derive(Debug)]
pub struct Collector {
    params: CollectorParams,
    groupby: Vec<FieldPath>,
    comparator: Vec<(FieldPath, SortOrder)>,
    buckets: IndexMap<Vec<GroupKey>, Vec<Datum>>,
    data: Option<Group<Datum>>,
}

enum Nested {
    Leaf(Vec<Datum>),
    Branch(IndexMap<GroupKey, Nested>),
}

impl Collector {
    /// Create a collector.
    pub fn new(params: CollectorParams) -> Self {
        let groupby = params.groupby.iter().map(FieldPath::new).collect();
        let comparator = params
            .sort
            .as_ref()
            .map(|sort| {
                sort.field
                    .iter()
                    .enumerate()
                    .map(|(i, f)| {
                        let order = sort.order.get(i).copied().unwrap_or_default();
                        (FieldPath::new(f.as_str()), order)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            params,
            groupby,
            comparator,
            buckets: IndexMap::new(),
            data: None,
        }
    }

    /// Configuration this collector was built from.
    pub fn params(&self) -> &CollectorParams {
        &self.params
    }

    pub(crate) fn reset(&mut self) {
        self.buckets.clear();
        self.data = None;
    }

    pub(crate) fn handle(&mut self, datum: Datum) {
        let key: Vec<GroupKey> = self
            .groupby
            .iter()
            .map(|f| f.get(&datum).map_or(GroupKey::Null, GroupKey::from_value))
            .collect();
        self.buckets.entry(key).or_default().push(datum);
    }

    pub(crate) fn complete(&mut self) {
        let buckets = std::mem::take(&mut self.buckets);

        if self.groupby.is_empty() {
            let mut data: Vec<Datum> = buckets.into_values().flatten().collect();
            self.sort_data(&mut data);
            self.data = Some(Group::leaf(GroupKey::Null, data));
            return;
        }

        let mut root: IndexMap<GroupKey, Nested> = IndexMap::new();
        for (keys, mut data) in buckets {
            self.sort_data(&mut data);
            insert_nested(&mut root, &keys, data);
        }
        self.data = Some(Group::internal(GroupKey::Null, into_groups(root)));
    }

    fn sort_data(&self, data: &mut [Datum]) {
        if self.comparator.is_empty() {
            return;
        }
        data.sort_by(|a, b| {
            for (field, order) in &self.comparator {
                let ord = compare_values(field.get(a), field.get(b));
                let ord = match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    /// `true` once a load cycle has completed.
    pub fn is_complete(&self) -> bool {
        self.data.is_some()
    }

    /// The collected hierarchy of the latest completed load cycle.
    pub fn data(&self) -> GentrackResult<&Group<Datum>> {
        self.data
            .as_ref()
            .ok_or_else(|| GentrackError::flow("collector has not completed a load cycle"))
    }
}

fn insert_nested(level: &mut IndexMap<GroupKey, Nested>, keys: &[GroupKey], data: Vec<Datum>) {
    let Some((first, rest)) = keys.split_first() else {
        return;
    };
    if rest.is_empty() {
        match level.entry(first.clone()).or_insert_with(|| Nested::Leaf(Vec::new())) {
            Nested::Leaf(existing) => existing.extend(data),
            Nested::Branch(_) => {}
        }
        return;
    }
    let entry = level
        .entry(first.clone())
        .or_insert_with(|| Nested::Branch(IndexMap::new()));
    if let Nested::Branch(next) = entry {
        insert_nested(next, rest, data);
    }
}

fn into_groups(level: IndexMap<GroupKey, Nested>) -> Vec<Group<Datum>> {
    level
        .into_iter()
        .map(|(key, nested)| match nested {
            Nested::Leaf(data) => Group::leaf(key, data),
            Nested::Branch(next) => Group::internal(key, into_groups(next)),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/flow/collector.rs"]
mod tests;
