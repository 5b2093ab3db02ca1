use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde_json::Value;

/// A single data record: a JSON object keyed by field name.
pub type Row = serde_json::Map<String, Value>;

/// A record as it travels through a flow. Branches share the allocation.
pub type Datum = Rc<Row>;

/// Key of a group in a grouped hierarchy.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    /// Key of a root group, or of records lacking the grouping field.
    Null,
    /// Boolean key.
    Bool(bool),
    /// Numeric key. `-0.0` and `0.0` are the same key.
    Num(f64),
    /// String key.
    Str(String),
}

impl GroupKey {
    /// Derive a key from a field value. Arrays and objects key by their JSON text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Num),
            Value::String(s) => Self::Str(s.clone()),
            other => Self::Str(other.to_string()),
        }
    }

    /// Convert back into a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Num(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Self::Str(s) => Value::String(s.clone()),
        }
    }

    fn canonical_bits(n: f64) -> u64 {
        if n == 0.0 { 0 } else { n.to_bits() }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Num(a), Self::Num(b)) => Self::canonical_bits(*a) == Self::canonical_bits(*b),
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Num(n) => Self::canonical_bits(*n).hash(state),
            Self::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify_value(&self.to_value()))
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<f64> for GroupKey {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<bool> for GroupKey {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Field accessor over rows. Dots address nested objects (`"info.depth"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    name: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a field name. `\.` escapes a literal dot.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = name.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                '.' => segments.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        segments.push(current);
        Self { name, segments }
    }

    /// The field name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the field. Missing fields read as `None`.
    pub fn get<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut value = row.get(first)?;
        for segment in rest {
            value = value.as_object()?.get(segment)?;
        }
        Some(value)
    }

    /// Read the field as a number.
    pub fn get_f64(&self, row: &Row) -> Option<f64> {
        self.get(row).and_then(Value::as_f64)
    }
}

/// `true` when the value is absent, null, or NaN.
pub fn is_undefined(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => n.as_f64().is_none_or(f64::is_nan),
        Some(_) => false,
    }
}

/// Numeric view of a value; gaps and non-numbers yield `None`.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| !v.is_nan())
}

/// Total order used when sorting records and samples: numbers before booleans
/// before strings, undefined values last.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            _ if is_undefined(v) => 4,
            Some(Value::Number(_)) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::String(_)) => 2,
            _ => 3,
        }
    }

    let (ra, rb) = (rank(a), rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) if ra == 3 => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}

/// String form of a value, as used for group names: integral numbers print
/// without a fraction and missing values print as `undefined`.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => "undefined".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", f as i64),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric comparison used by filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `==`
    Eq,
    /// `>=`
    Gte,
    /// `>`
    Gt,
}

impl ComparisonOp {
    /// Evaluate `value <op> operand`.
    pub fn test(self, value: f64, operand: f64) -> bool {
        match self {
            Self::Lt => value < operand,
            Self::Lte => value <= operand,
            Self::Eq => value == operand,
            Self::Gte => value >= operand,
            Self::Gt => value > operand,
        }
    }
}

/// Accept either a single value or an array of values.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Repr<T> {
        One(T),
        Many(Vec<T>),
    }

    match <Repr<T> as serde::Deserialize>::deserialize(deserializer)? {
        Repr::One(v) => Ok(vec![v]),
        Repr::Many(v) => Ok(v),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
