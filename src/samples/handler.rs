use indexmap::IndexMap;
use serde_json::Value;

use crate::foundation::error::{GentrackError, GentrackResult};
use crate::provenance::Provenance;
use crate::samples::actions::SampleAction;
use crate::samples::attributes::{AttributeIdentifier, AttributeInfo, AttributeResolver};
use crate::samples::operations;
use crate::samples::state::{GroupingStep, SampleGroup, SampleId, SampleState};

/// Sorts, filters and groups samples with undo.
///
/// Every successful command pushes one new [`SampleState`] snapshot built from
/// the current one; a failed command leaves the history untouched.
pub struct SampleHandler {
    resolvers: IndexMap<String, AttributeResolver>,
    provenance: Provenance<SampleState, SampleAction>,
}

impl Default for SampleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SampleHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleHandler")
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .field("provenance", &self.provenance)
            .finish()
    }
}

impl SampleHandler {
    /// A handler with an empty `ROOT` group and no resolvers.
    pub fn new() -> Self {
        Self {
            resolvers: IndexMap::new(),
            provenance: Provenance::new(SampleState::new(Vec::new())),
        }
    }

    /// Replace the samples and reset the history.
    pub fn set_samples(&mut self, samples: Vec<SampleId>) {
        self.provenance.set_initial_state(SampleState::new(samples));
    }

    /// Register the resolver for attribute identifiers tagged `kind`.
    pub fn add_attribute_resolver(
        &mut self,
        kind: impl Into<String>,
        resolver: impl Fn(&AttributeIdentifier) -> Option<AttributeInfo> + 'static,
    ) {
        self.resolvers.insert(kind.into(), Box::new(resolver));
    }

    /// Resolve an attribute through its registered resolver.
    pub fn attribute_info(
        &self,
        attribute: &AttributeIdentifier,
    ) -> GentrackResult<AttributeInfo> {
        let resolver = self.resolvers.get(&attribute.kind).ok_or_else(|| {
            GentrackError::attribute(
                format!("no attribute resolver registered for type '{}'", attribute.kind),
                attribute.to_config(),
            )
        })?;
        resolver(attribute)
            .ok_or_else(|| GentrackError::attribute("unknown attribute", attribute.to_config()))
    }

    /// Current state.
    pub fn state(&self) -> &SampleState {
        self.provenance.state()
    }

    /// Undo history.
    pub fn provenance(&self) -> &Provenance<SampleState, SampleAction> {
        &self.provenance
    }

    /// `true` when an `UNDO` would change the state.
    pub fn can_undo(&self) -> bool {
        self.provenance.can_undo()
    }

    /// Every root-to-leaf path of the current hierarchy.
    pub fn flattened_group_hierarchy(&self) -> Vec<Vec<&SampleGroup>> {
        self.state().root_group.flattened_paths()
    }

    /// Terminal groups of the current hierarchy.
    pub fn sample_groups(&self) -> Vec<&SampleGroup> {
        self.state().sample_groups()
    }

    /// Decode an action from JSON and dispatch it.
    ///
    /// A `"type"` outside the vocabulary is [`GentrackError::UnknownAction`].
    pub fn dispatch_json(&mut self, action: &Value) -> GentrackResult<()> {
        let known = action
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| SampleAction::TYPES.contains(&t));
        if !known {
            return Err(GentrackError::UnknownAction(action.clone()));
        }
        let decoded: SampleAction = serde_json::from_value(action.clone())
            .map_err(|e| GentrackError::config(format!("malformed action: {e}"), action))?;
        self.dispatch(decoded)
    }

    /// Apply an action and record the resulting snapshot.
    #[tracing::instrument(skip(self, action), fields(action = action.kind()))]
    pub fn dispatch(&mut self, action: SampleAction) -> GentrackResult<()> {
        let Some(attribute) = action.attribute() else {
            self.provenance.undo();
            tracing::debug!(cursor = self.provenance.cursor(), "undo");
            return Ok(());
        };
        let info = self.attribute_info(attribute)?;
        let accessor = |sample: &str| (info.accessor)(sample);
        let state = self.state();

        let next = match &action {
            SampleAction::Undo => return Ok(()),
            SampleAction::SortBy { .. } => {
                let key = operations::comparison_accessor(&info);
                state.map_samples(|samples| operations::sort(samples, &key))
            }
            SampleAction::RetainFirstOfEach { .. } => {
                state.map_samples(|samples| operations::retain_first_of_each(samples, accessor))
            }
            SampleAction::FilterByQuantitative {
                operator, operand, ..
            } => state.map_samples(|samples| {
                operations::filter_quantitative(samples, accessor, *operator, *operand)
            }),
            SampleAction::FilterByNominal {
                action: mode,
                values,
                ..
            } => state.map_samples(|samples| {
                operations::filter_nominal(samples, accessor, *mode, values)
            }),
            SampleAction::RemoveUndefined { .. } => {
                state.map_samples(|samples| operations::filter_undefined(samples, accessor))
            }
            SampleAction::GroupByNominal { attribute } => {
                let step = GroupingStep {
                    name: attribute.clone(),
                };
                state.group_leaves(step, |samples| operations::group_by(samples, accessor))
            }
            SampleAction::GroupToQuartiles { attribute } => {
                let step = GroupingStep {
                    name: attribute.clone(),
                };
                state.group_leaves(step, |samples| {
                    let thresholds = operations::quartiles(samples, accessor);
                    operations::group_by(samples, |s| {
                        operations::quantile_bucket(&accessor(s), &thresholds)
                    })
                })
            }
        };

        self.provenance.push(next, action);
        tracing::debug!(
            groups = self.state().sample_groups().len(),
            history = self.provenance.len(),
            "dispatched sample action"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/samples/handler.rs"]
mod tests;
