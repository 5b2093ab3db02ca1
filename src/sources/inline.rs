use serde_json::Value;

use crate::foundation::core::Row;
use crate::foundation::error::GentrackResult;
use crate::sources::DataSource;

/// Rows embedded directly in the spec.
#[derive(Clone, Debug)]
pub struct InlineSource {
    values: Vec<Value>,
}

impl InlineSource {
    /// Create a source from JSON values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create a source from ready-made rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            values: rows.into_iter().map(Value::Object).collect(),
        }
    }
}

pub(crate) fn value_to_row(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        scalar => {
            let mut row = Row::new();
            row.insert("data".to_string(), scalar);
            row
        }
    }
}

impl DataSource for InlineSource {
    fn kind(&self) -> &'static str {
        "inline"
    }

    fn load(&mut self) -> GentrackResult<Vec<Row>> {
        Ok(self.values.iter().cloned().map(value_to_row).collect())
    }
}
