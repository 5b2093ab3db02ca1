use std::rc::Rc;

use serde_json::Value;

use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::Datum;
use crate::foundation::error::GentrackResult;

/// Parameters of an `identifier` transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IdentifierParams {
    /// Output field.
    #[serde(default = "default_as", rename = "as")]
    pub as_field: String,
}

fn default_as() -> String {
    "_uniqueId".to_string()
}

impl Default for IdentifierParams {
    fn default() -> Self {
        Self {
            as_field: default_as(),
        }
    }
}

/// Writes a running counter into every record. The counter restarts on each load.
#[derive(Clone, Debug)]
pub struct IdentifierTransform {
    as_field: String,
    next: u64,
}

impl IdentifierTransform {
    /// Create the transform.
    pub fn new(params: IdentifierParams) -> Self {
        Self {
            as_field: params.as_field,
            next: 0,
        }
    }
}

impl Transform for IdentifierTransform {
    fn kind(&self) -> &'static str {
        "identifier"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Modifies
    }

    fn reset(&mut self) {
        self.next = 0;
    }

    fn handle(&mut self, mut datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        Rc::make_mut(&mut datum).insert(self.as_field.clone(), Value::from(self.next));
        self.next += 1;
        out.push(datum);
        Ok(())
    }
}
