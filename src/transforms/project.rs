use std::rc::Rc;

use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::{Datum, FieldPath, Row};
use crate::foundation::error::{GentrackError, GentrackResult};

/// Parameters of a `project` transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectParams {
    /// Fields to keep.
    pub fields: Vec<String>,
    /// Output names, one per field. Defaults to the field names.
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub as_fields: Option<Vec<String>>,
}

/// Builds new records holding only the selected fields.
#[derive(Clone, Debug)]
pub struct ProjectTransform {
    fields: Vec<(FieldPath, String)>,
}

impl ProjectTransform {
    /// Validate parameters and create the transform.
    pub fn new(params: ProjectParams) -> GentrackResult<Self> {
        let names = match params.as_fields {
            Some(names) if names.len() != params.fields.len() => {
                return Err(GentrackError::validation(format!(
                    "\"fields\" and \"as\" have different lengths ({} vs {})",
                    params.fields.len(),
                    names.len()
                )));
            }
            Some(names) => names,
            None => params.fields.clone(),
        };
        Ok(Self {
            fields: params
                .fields
                .into_iter()
                .map(FieldPath::new)
                .zip(names)
                .collect(),
        })
    }
}

impl Transform for ProjectTransform {
    fn kind(&self) -> &'static str {
        "project"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Clones
    }

    fn handle(&mut self, datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        let mut row = Row::new();
        for (field, name) in &self.fields {
            if let Some(v) = field.get(&datum) {
                row.insert(name.clone(), v.clone());
            }
        }
        out.push(Rc::new(row));
        Ok(())
    }
}
