use std::rc::Rc;

use crate::foundation::core::{Datum, GroupKey};
use crate::foundation::error::{GentrackError, GentrackResult};

/// A grouped (faceted) set of records.
///
/// A hierarchy is either a single [`LeafGroup`] holding records, or an
/// [`InternalGroup`] whose subgroups are all leaves or all internal groups.
/// Hierarchies produced by a collector are immutable once exposed; every
/// operation here builds a new hierarchy.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Group<T> {
    /// Terminal group holding records.
    Leaf(LeafGroup<T>),
    /// Group of groups.
    Internal(InternalGroup<T>),
}

/// Terminal group holding the actual records.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LeafGroup<T> {
    /// Group key.
    pub key: GroupKey,
    /// Records in collection order.
    pub data: Vec<T>,
}

/// Group holding ordered subgroups of a single variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InternalGroup<T> {
    /// Group key.
    pub key: GroupKey,
    /// Ordered subgroups.
    pub subgroups: Vec<Group<T>>,
}

impl<T> Group<T> {
    /// Create a leaf group.
    pub fn leaf(key: GroupKey, data: Vec<T>) -> Self {
        Self::Leaf(LeafGroup { key, data })
    }

    /// Create an internal group.
    pub fn internal(key: GroupKey, subgroups: Vec<Group<T>>) -> Self {
        Self::Internal(InternalGroup { key, subgroups })
    }

    /// Key of this group.
    pub fn key(&self) -> &GroupKey {
        match self {
            Self::Leaf(g) => &g.key,
            Self::Internal(g) => &g.key,
        }
    }

    /// `true` for a [`LeafGroup`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Total number of records in the hierarchy.
    pub fn len(&self) -> usize {
        match self {
            Self::Leaf(g) => g.data.len(),
            Self::Internal(g) => g.subgroups.iter().map(Group::len).sum(),
        }
    }

    /// `true` when no leaf holds any record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of leaf groups in the hierarchy.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Internal(g) => g.subgroups.iter().map(Group::leaf_count).sum(),
        }
    }

    /// Leaf groups in pre-order.
    pub fn leaves(&self) -> Vec<&LeafGroup<T>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafGroup<T>>) {
        match self {
            Self::Leaf(g) => out.push(g),
            Self::Internal(g) => {
                for sub in &g.subgroups {
                    sub.collect_leaves(out);
                }
            }
        }
    }

    /// Shape-preserving copy where each leaf's records are replaced by
    /// `transformer(data)`. Keys are kept and `self` is left untouched.
    pub fn map<U, F>(&self, mut transformer: F) -> Group<U>
    where
        F: FnMut(&[T]) -> Vec<U>,
    {
        self.map_with(&mut transformer)
    }

    fn map_with<U, F>(&self, transformer: &mut F) -> Group<U>
    where
        F: FnMut(&[T]) -> Vec<U>,
    {
        match self {
            Self::Leaf(g) => Group::leaf(g.key.clone(), transformer(&g.data)),
            Self::Internal(g) => Group::internal(
                g.key.clone(),
                g.subgroups
                    .iter()
                    .map(|sub| sub.map_with(transformer))
                    .collect(),
            ),
        }
    }

    /// Lazy pre-order traversal over every record of every leaf.
    ///
    /// The iterator borrows the hierarchy; re-derive it to traverse again.
    pub fn flat_data(&self) -> FlatData<'_, T> {
        FlatData::new(self)
    }
}

impl<T: Clone> Group<T> {
    /// Collapse one level of nesting nearest to the leaves.
    ///
    /// Fails on a leaf group. See [`InternalGroup::ungroup`].
    pub fn ungroup(&self) -> GentrackResult<Group<T>> {
        match self {
            Self::Leaf(_) => Err(GentrackError::group("cannot ungroup a leaf group")),
            Self::Internal(g) => g.ungroup(),
        }
    }

    /// Apply [`Group::ungroup`] until a single leaf remains.
    pub fn ungroup_all(&self) -> GentrackResult<LeafGroup<T>> {
        let mut group = match self {
            Self::Leaf(g) => return Ok(g.clone()),
            Self::Internal(g) => g.ungroup()?,
        };
        loop {
            match group {
                Self::Leaf(g) => return Ok(g),
                Self::Internal(g) => group = g.ungroup()?,
            }
        }
    }
}

impl<T> InternalGroup<T> {
    /// Whether the subgroups are leaves. Only the first child is inspected;
    /// an empty group counts as having leaf children.
    pub fn has_leaf_children(&self) -> bool {
        self.subgroups.first().is_none_or(Group::is_leaf)
    }
}

impl<T: Clone> InternalGroup<T> {
    /// Collapse one level of nesting.
    ///
    /// With leaf children the records are concatenated in subgroup order into
    /// one leaf keyed by this group's key; the children's keys are dropped.
    /// With internal children each child is ungrouped recursively and the
    /// result stays internal.
    pub fn ungroup(&self) -> GentrackResult<Group<T>> {
        if self.has_leaf_children() {
            let data = self
                .subgroups
                .iter()
                .flat_map(|sub| sub.flat_data().cloned())
                .collect();
            Ok(Group::leaf(self.key.clone(), data))
        } else {
            let subgroups = self
                .subgroups
                .iter()
                .map(Group::ungroup)
                .collect::<GentrackResult<Vec<_>>>()?;
            Ok(Group::internal(self.key.clone(), subgroups))
        }
    }
}

impl Group<Datum> {
    /// Like [`Group::ungroup`], but every collapsed record gets `field` set to
    /// the key of the leaf it came from.
    pub fn ungroup_with_key(&self, field: &str) -> GentrackResult<Group<Datum>> {
        match self {
            Self::Leaf(_) => Err(GentrackError::group("cannot ungroup a leaf group")),
            Self::Internal(g) => g.ungroup_with_key(field),
        }
    }
}

impl InternalGroup<Datum> {
    /// See [`Group::ungroup_with_key`].
    pub fn ungroup_with_key(&self, field: &str) -> GentrackResult<Group<Datum>> {
        if !self.has_leaf_children() {
            let subgroups = self
                .subgroups
                .iter()
                .map(|sub| sub.ungroup_with_key(field))
                .collect::<GentrackResult<Vec<_>>>()?;
            return Ok(Group::internal(self.key.clone(), subgroups));
        }

        let mut data = Vec::with_capacity(self.subgroups.iter().map(Group::len).sum());
        for sub in &self.subgroups {
            let key = sub.key().to_value();
            for datum in sub.flat_data() {
                let mut row = (**datum).clone();
                row.insert(field.to_string(), key.clone());
                data.push(Rc::new(row));
            }
        }
        Ok(Group::leaf(self.key.clone(), data))
    }
}

/// Forward-only iterator returned by [`Group::flat_data`].
pub struct FlatData<'a, T> {
    stack: Vec<std::slice::Iter<'a, Group<T>>>,
    current: std::slice::Iter<'a, T>,
}

impl<'a, T> FlatData<'a, T> {
    fn new(root: &'a Group<T>) -> Self {
        match root {
            Group::Leaf(g) => Self {
                stack: Vec::new(),
                current: g.data.iter(),
            },
            Group::Internal(g) => Self {
                stack: vec![g.subgroups.iter()],
                current: [].iter(),
            },
        }
    }
}

impl<'a, T> Iterator for FlatData<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.current.next() {
                return Some(item);
            }
            let next_group = loop {
                let top = self.stack.last_mut()?;
                match top.next() {
                    Some(group) => break group,
                    None => {
                        self.stack.pop();
                    }
                }
            };
            match next_group {
                Group::Leaf(g) => self.current = g.data.iter(),
                Group::Internal(g) => self.stack.push(g.subgroups.iter()),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/group.rs"]
mod tests;
