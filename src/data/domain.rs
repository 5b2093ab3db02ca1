use indexmap::IndexSet;
use serde_json::Value;

use crate::data::group::Group;
use crate::foundation::core::{Datum, FieldPath, GroupKey, as_number, is_undefined};
use crate::foundation::error::{GentrackError, GentrackResult};

/// Measurement type of an encoded field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Continuous numbers.
    Quantitative,
    /// Unordered categories.
    Nominal,
    /// Ordered categories.
    Ordinal,
}

/// Domain of a field as seen by scales: a numeric extent or the distinct
/// categories in first-seen order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Domain {
    /// `[min, max]`, or `None` before any numeric value was seen.
    Quantitative {
        /// Inclusive extent.
        extent: Option<[f64; 2]>,
    },
    /// Distinct nominal values.
    Nominal {
        /// Values in first-seen order.
        values: IndexSet<GroupKey>,
    },
    /// Distinct ordinal values.
    Ordinal {
        /// Values in first-seen order.
        values: IndexSet<GroupKey>,
    },
}

impl Domain {
    /// An empty domain of the given type.
    pub fn empty(kind: DataType) -> Self {
        match kind {
            DataType::Quantitative => Self::Quantitative { extent: None },
            DataType::Nominal => Self::Nominal {
                values: IndexSet::new(),
            },
            DataType::Ordinal => Self::Ordinal {
                values: IndexSet::new(),
            },
        }
    }

    /// A domain from explicitly configured values.
    pub fn from_values(kind: DataType, values: &[Value]) -> Self {
        let mut domain = Self::empty(kind);
        for v in values {
            domain.extend(Some(v));
        }
        domain
    }

    /// Type of the domain.
    pub fn kind(&self) -> DataType {
        match self {
            Self::Quantitative { .. } => DataType::Quantitative,
            Self::Nominal { .. } => DataType::Nominal,
            Self::Ordinal { .. } => DataType::Ordinal,
        }
    }

    /// Include one value. Returns `false` when the value is a gap and was skipped.
    pub fn extend(&mut self, value: Option<&Value>) -> bool {
        match self {
            Self::Quantitative { extent } => {
                let Some(v) = as_number(value) else {
                    return false;
                };
                *extent = Some(match *extent {
                    None => [v, v],
                    Some([lo, hi]) => [lo.min(v), hi.max(v)],
                });
                true
            }
            Self::Nominal { values } | Self::Ordinal { values } => match value {
                Some(v) if !is_undefined(value) => {
                    values.insert(GroupKey::from_value(v));
                    true
                }
                _ => false,
            },
        }
    }

    /// Union with another domain of the same type.
    pub fn extend_all(&mut self, other: &Domain) -> GentrackResult<()> {
        match (self, other) {
            (Self::Quantitative { extent }, Self::Quantitative { extent: other }) => {
                if let Some([lo, hi]) = *other {
                    *extent = Some(match *extent {
                        None => [lo, hi],
                        Some([a, b]) => [a.min(lo), b.max(hi)],
                    });
                }
                Ok(())
            }
            (Self::Nominal { values }, Self::Nominal { values: other })
            | (Self::Ordinal { values }, Self::Ordinal { values: other }) => {
                values.extend(other.iter().cloned());
                Ok(())
            }
            (this, other) => Err(GentrackError::validation(format!(
                "cannot merge {:?} domain with {:?} domain",
                this.kind(),
                other.kind()
            ))),
        }
    }
}

/// Extract the domain of `field` from every record of a collected hierarchy.
///
/// Missing or non-numeric values are skipped for quantitative domains.
pub fn extract_domain(data: &Group<Datum>, field: &FieldPath, kind: DataType) -> Domain {
    let mut domain = Domain::empty(kind);
    let mut gaps = 0usize;
    for datum in data.flat_data() {
        if !domain.extend(field.get(datum)) {
            gaps += 1;
        }
    }
    if gaps > 0 {
        tracing::warn!(
            field = field.name(),
            gaps,
            "skipped undefined or non-numeric values while extracting domain"
        );
    }
    domain
}

#[cfg(test)]
#[path = "../../tests/unit/data/domain.rs"]
mod tests;
