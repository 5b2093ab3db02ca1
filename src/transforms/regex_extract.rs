use std::rc::Rc;

use regex::Regex;
use serde_json::Value;

use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::{Datum, FieldPath, one_or_many};
use crate::foundation::error::{GentrackError, GentrackResult};

/// Parameters of a `regexExtract` transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexExtractParams {
    /// Input field.
    pub field: String,
    /// Pattern with one capture group per output field.
    pub regex: String,
    /// Output fields for capture groups `1..=n`.
    #[serde(rename = "as", deserialize_with = "one_or_many")]
    pub as_fields: Vec<String>,
    /// Forward non-matching records unchanged instead of failing.
    #[serde(default)]
    pub skip_invalid_input: bool,
}

/// Extracts regex capture groups from a string field into new fields.
#[derive(Clone, Debug)]
pub struct RegexExtractTransform {
    field: FieldPath,
    regex: Regex,
    as_fields: Vec<String>,
    skip_invalid_input: bool,
}

impl RegexExtractTransform {
    /// Compile the pattern and check it has one group per output field.
    pub fn new(params: RegexExtractParams) -> GentrackResult<Self> {
        let regex = Regex::new(&params.regex).map_err(|e| {
            GentrackError::validation(format!("invalid regex '{}': {e}", params.regex))
        })?;
        let groups = regex.captures_len() - 1;
        if groups != params.as_fields.len() {
            return Err(GentrackError::validation(format!(
                "regex has {groups} capture group(s) but {} output field(s)",
                params.as_fields.len()
            )));
        }
        Ok(Self {
            field: FieldPath::new(params.field),
            regex,
            as_fields: params.as_fields,
            skip_invalid_input: params.skip_invalid_input,
        })
    }
}

impl Transform for RegexExtractTransform {
    fn kind(&self) -> &'static str {
        "regexExtract"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Modifies
    }

    fn handle(&mut self, mut datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        let input = self.field.get(&datum).and_then(Value::as_str);
        let extracted: Option<Vec<Value>> = input
            .and_then(|s| self.regex.captures(s))
            .map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map_or(Value::Null, |m| Value::String(m.as_str().to_string())))
                    .collect()
            });

        match extracted {
            Some(values) => {
                let row = Rc::make_mut(&mut datum);
                for (name, v) in self.as_fields.iter().zip(values) {
                    row.insert(name.clone(), v);
                }
            }
            None if self.skip_invalid_input => {}
            None => {
                return Err(GentrackError::flow(format!(
                    "\"{}\" does not match /{}/ in field '{}'",
                    self.field.get(&datum).map_or_else(String::new, |v| v.to_string()),
                    self.regex.as_str(),
                    self.field.name()
                )));
            }
        }
        out.push(datum);
        Ok(())
    }
}
