use serde_json::Value;

use crate::foundation::core::ComparisonOp;
use crate::samples::attributes::AttributeIdentifier;
use crate::samples::operations::NominalFilterAction;

/// Command vocabulary of the sample engine, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleAction {
    /// Step back in history.
    Undo,
    /// Sort every terminal group.
    SortBy {
        /// Sort key.
        attribute: AttributeIdentifier,
    },
    /// Keep the first sample of each distinct value.
    RetainFirstOfEach {
        /// Deduplication key.
        attribute: AttributeIdentifier,
    },
    /// Numeric threshold filter.
    FilterByQuantitative {
        /// Filtered attribute.
        attribute: AttributeIdentifier,
        /// Comparison.
        operator: ComparisonOp,
        /// Right-hand side.
        operand: f64,
    },
    /// Categorical filter.
    FilterByNominal {
        /// Filtered attribute.
        attribute: AttributeIdentifier,
        /// Keep or drop the listed values.
        action: NominalFilterAction,
        /// Listed values.
        values: Vec<Value>,
    },
    /// Drop samples with an undefined value.
    RemoveUndefined {
        /// Tested attribute.
        attribute: AttributeIdentifier,
    },
    /// Split every terminal group by value.
    GroupByNominal {
        /// Grouping attribute.
        attribute: AttributeIdentifier,
    },
    /// Split every terminal group into quartiles of its own values.
    GroupToQuartiles {
        /// Grouping attribute.
        attribute: AttributeIdentifier,
    },
}

impl SampleAction {
    /// Every `"type"` tag of the vocabulary.
    pub const TYPES: [&'static str; 8] = [
        "UNDO",
        "SORT_BY",
        "RETAIN_FIRST_OF_EACH",
        "FILTER_BY_QUANTITATIVE",
        "FILTER_BY_NOMINAL",
        "REMOVE_UNDEFINED",
        "GROUP_BY_NOMINAL",
        "GROUP_TO_QUARTILES",
    ];

    /// The `"type"` tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Undo => "UNDO",
            Self::SortBy { .. } => "SORT_BY",
            Self::RetainFirstOfEach { .. } => "RETAIN_FIRST_OF_EACH",
            Self::FilterByQuantitative { .. } => "FILTER_BY_QUANTITATIVE",
            Self::FilterByNominal { .. } => "FILTER_BY_NOMINAL",
            Self::RemoveUndefined { .. } => "REMOVE_UNDEFINED",
            Self::GroupByNominal { .. } => "GROUP_BY_NOMINAL",
            Self::GroupToQuartiles { .. } => "GROUP_TO_QUARTILES",
        }
    }

    /// Attribute the action operates on; `None` for [`SampleAction::Undo`].
    pub fn attribute(&self) -> Option<&AttributeIdentifier> {
        match self {
            Self::Undo => None,
            Self::SortBy { attribute }
            | Self::RetainFirstOfEach { attribute }
            | Self::FilterByQuantitative { attribute, .. }
            | Self::FilterByNominal { attribute, .. }
            | Self::RemoveUndefined { attribute }
            | Self::GroupByNominal { attribute }
            | Self::GroupToQuartiles { attribute } => Some(attribute),
        }
    }
}
