use std::rc::Rc;

use serde_json::Value;

use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::{Datum, FieldPath};
use crate::foundation::error::GentrackResult;

/// Parameters of a `flattenSequence` transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlattenSequenceParams {
    /// String field to expand.
    #[serde(default = "default_field")]
    pub field: String,
    /// Output fields: the character and its position.
    #[serde(default = "default_as", rename = "as")]
    pub as_fields: [String; 2],
}

fn default_field() -> String {
    "sequence".to_string()
}

fn default_as() -> [String; 2] {
    ["sequence".to_string(), "pos".to_string()]
}

impl Default for FlattenSequenceParams {
    fn default() -> Self {
        Self {
            field: default_field(),
            as_fields: default_as(),
        }
    }
}

/// Expands a string field into one record per character.
///
/// Outputs are emitted in ascending position order; every output is a copy of
/// the input with the character and its zero-based position written to the
/// `as` fields. An empty or missing string emits nothing.
#[derive(Clone, Debug)]
pub struct FlattenSequenceTransform {
    field: FieldPath,
    sequence_as: String,
    pos_as: String,
}

impl FlattenSequenceTransform {
    /// Create the transform.
    pub fn new(params: FlattenSequenceParams) -> Self {
        let [sequence_as, pos_as] = params.as_fields;
        Self {
            field: FieldPath::new(params.field),
            sequence_as,
            pos_as,
        }
    }
}

impl Transform for FlattenSequenceTransform {
    fn kind(&self) -> &'static str {
        "flattenSequence"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Clones
    }

    fn handle(&mut self, datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        let Some(Value::String(sequence)) = self.field.get(&datum) else {
            return Ok(());
        };
        for (pos, ch) in sequence.chars().enumerate() {
            let mut row = (*datum).clone();
            row.insert(self.sequence_as.clone(), Value::String(ch.to_string()));
            row.insert(self.pos_as.clone(), Value::from(pos));
            out.push(Rc::new(row));
        }
        Ok(())
    }
}
