use crate::samples::attributes::AttributeIdentifier;

/// Identifier of a sample.
pub type SampleId = String;

/// A node of the sample hierarchy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SampleGroup {
    /// Terminal group holding sample ids.
    Leaf {
        /// Display name.
        name: String,
        /// Ordered sample ids.
        samples: Vec<SampleId>,
    },
    /// Group of groups.
    Internal {
        /// Display name.
        name: String,
        /// Ordered subgroups.
        groups: Vec<SampleGroup>,
    },
}

/// One applied grouping, recorded at the top of the state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupingStep {
    /// Attribute the samples were grouped by.
    pub name: AttributeIdentifier,
}

/// Whole state of the sample engine. Snapshots are never mutated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleState {
    /// Groupings applied so far, outermost first.
    pub grouping_steps: Vec<GroupingStep>,
    /// Root of the hierarchy.
    pub root_group: SampleGroup,
}

impl SampleGroup {
    /// Name of the group.
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Internal { name, .. } => name,
        }
    }

    /// Sample ids of a leaf; `None` for internal groups.
    pub fn samples(&self) -> Option<&[SampleId]> {
        match self {
            Self::Leaf { samples, .. } => Some(samples),
            Self::Internal { .. } => None,
        }
    }

    /// Every root-to-leaf path, in pre-order. The last node of a path is a leaf.
    pub fn flattened_paths(&self) -> Vec<Vec<&SampleGroup>> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.collect_paths(&mut path, &mut out);
        out
    }

    fn collect_paths<'a>(
        &'a self,
        path: &mut Vec<&'a SampleGroup>,
        out: &mut Vec<Vec<&'a SampleGroup>>,
    ) {
        path.push(self);
        match self {
            Self::Leaf { .. } => out.push(path.clone()),
            Self::Internal { groups, .. } => {
                for g in groups {
                    g.collect_paths(path, out);
                }
            }
        }
        path.pop();
    }

    /// Build a new tree where each leaf is replaced by `rebuild(name, samples)`.
    /// Internal nodes are copied with their names; `self` is left untouched.
    pub fn rebuild_leaves<F>(&self, rebuild: &mut F) -> SampleGroup
    where
        F: FnMut(&str, &[SampleId]) -> SampleGroup,
    {
        match self {
            Self::Leaf { name, samples } => rebuild(name, samples),
            Self::Internal { name, groups } => Self::Internal {
                name: name.clone(),
                groups: groups.iter().map(|g| g.rebuild_leaves(rebuild)).collect(),
            },
        }
    }
}

impl SampleState {
    /// A single `ROOT` leaf holding `samples`.
    pub fn new(samples: Vec<SampleId>) -> Self {
        Self {
            grouping_steps: Vec::new(),
            root_group: SampleGroup::Leaf {
                name: "ROOT".to_string(),
                samples,
            },
        }
    }

    /// Every terminal group, in pre-order.
    pub fn sample_groups(&self) -> Vec<&SampleGroup> {
        self.root_group
            .flattened_paths()
            .into_iter()
            .filter_map(|path| path.last().copied())
            .collect()
    }

    /// A new state whose leaves hold `operation(samples)`.
    pub fn map_samples<F>(&self, mut operation: F) -> SampleState
    where
        F: FnMut(&[SampleId]) -> Vec<SampleId>,
    {
        Self {
            grouping_steps: self.grouping_steps.clone(),
            root_group: self.root_group.rebuild_leaves(&mut |name, samples| SampleGroup::Leaf {
                name: name.to_string(),
                samples: operation(samples),
            }),
        }
    }

    /// A new state where every leaf becomes an internal group of the named
    /// partitions returned by `partition`, and `step` is recorded.
    pub fn group_leaves<F>(&self, step: GroupingStep, mut partition: F) -> SampleState
    where
        F: FnMut(&[SampleId]) -> Vec<(String, Vec<SampleId>)>,
    {
        let mut grouping_steps = self.grouping_steps.clone();
        grouping_steps.push(step);
        Self {
            grouping_steps,
            root_group: self.root_group.rebuild_leaves(&mut |name, samples| SampleGroup::Internal {
                name: name.to_string(),
                groups: partition(samples)
                    .into_iter()
                    .map(|(label, members)| SampleGroup::Leaf {
                        name: label,
                        samples: members,
                    })
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/samples/state.rs"]
mod tests;
