use indexmap::IndexSet;
use serde_json::Value;

use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::{ComparisonOp, Datum, FieldPath, GroupKey, as_number};
use crate::foundation::error::{GentrackError, GentrackResult};

/// Parameters of a `filter` transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Field to test.
    pub field: String,
    /// Numeric comparison, used together with `value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<ComparisonOp>,
    /// Right-hand operand of `op`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Accepted values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Value>>,
}

#[derive(Clone, Debug)]
enum Predicate {
    Compare(ComparisonOp, f64),
    OneOf(IndexSet<GroupKey>),
}

/// Forwards the records that satisfy a predicate, untouched.
#[derive(Clone, Debug)]
pub struct FilterTransform {
    field: FieldPath,
    predicate: Predicate,
}

impl FilterTransform {
    /// Validate parameters. Exactly one of `op`+`value` or `oneOf` must be given.
    pub fn new(params: FilterParams) -> GentrackResult<Self> {
        let predicate = match (params.op, params.value, params.one_of) {
            (Some(op), Some(value), None) => Predicate::Compare(op, value),
            (None, None, Some(values)) => {
                Predicate::OneOf(values.iter().map(GroupKey::from_value).collect())
            }
            (Some(_), None, None) | (None, Some(_), None) => {
                return Err(GentrackError::validation(
                    "filter needs both \"op\" and \"value\"",
                ));
            }
            _ => {
                return Err(GentrackError::validation(
                    "filter needs either \"op\" and \"value\" or \"oneOf\"",
                ));
            }
        };
        Ok(Self {
            field: FieldPath::new(params.field),
            predicate,
        })
    }

    fn accepts(&self, datum: &Datum) -> bool {
        let value = self.field.get(datum);
        match &self.predicate {
            Predicate::Compare(op, operand) => {
                as_number(value).is_some_and(|v| op.test(v, *operand))
            }
            Predicate::OneOf(keys) => {
                keys.contains(&value.map_or(GroupKey::Null, GroupKey::from_value))
            }
        }
    }
}

impl Transform for FilterTransform {
    fn kind(&self) -> &'static str {
        "filter"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Pure
    }

    fn handle(&mut self, datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        if self.accepts(&datum) {
            out.push(datum);
        }
        Ok(())
    }
}
