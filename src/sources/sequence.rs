use serde_json::Value;

use crate::foundation::core::Row;
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::DataSource;

/// Parameters of a generated sequence `[start, stop)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceParams {
    /// First value.
    pub start: f64,
    /// Exclusive end.
    pub stop: f64,
    /// Increment; defaults to 1.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Output field name; defaults to `data`.
    #[serde(default = "default_as", rename = "as")]
    pub as_field: String,
}

fn default_step() -> f64 {
    1.0
}

fn default_as() -> String {
    "data".to_string()
}

/// Upper bound on the number of rows a single sequence may generate.
pub const MAX_SEQUENCE_LEN: usize = 10_000_000;

/// Numeric sequence generator.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    params: SequenceParams,
    count: usize,
}

impl SequenceSource {
    /// Validate parameters and create the source.
    pub fn new(params: SequenceParams) -> GentrackResult<Self> {
        if !params.step.is_finite() || params.step == 0.0 {
            return Err(GentrackError::validation("sequence step must be finite and non-zero"));
        }
        if !params.start.is_finite() || !params.stop.is_finite() {
            return Err(GentrackError::validation("sequence bounds must be finite"));
        }
        let count = ((params.stop - params.start) / params.step).ceil().max(0.0);
        if count > MAX_SEQUENCE_LEN as f64 {
            return Err(GentrackError::validation(format!(
                "sequence would generate {count} rows, more than {MAX_SEQUENCE_LEN}"
            )));
        }
        Ok(Self {
            params,
            count: count as usize,
        })
    }

    /// Number of rows produced per load.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when the range is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl DataSource for SequenceSource {
    fn kind(&self) -> &'static str {
        "sequence"
    }

    fn load(&mut self) -> GentrackResult<Vec<Row>> {
        let SequenceParams { start, step, .. } = self.params;
        Ok((0..self.count)
            .map(|i| {
                let v = start + step * i as f64;
                let mut row = Row::new();
                row.insert(
                    self.params.as_field.clone(),
                    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number),
                );
                row
            })
            .collect())
    }
}
