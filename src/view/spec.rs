use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::data::genome::Genome;
use crate::flow::collector::CompareParams;
use crate::foundation::core::one_or_many;
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::DataSpec;

/// Visualization configuration: an optional genome and a root view.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VizSpec {
    /// Assembly used by coordinate linearization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome: Option<Genome>,
    /// Root of the view tree.
    #[serde(flatten)]
    pub view: ViewSpec,
}

/// A node of the view tree.
///
/// A view with a `mark` is a unit view and consumes data through a collector;
/// `layer` and `concat` views only pass their data down to their children.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewSpec {
    /// Unique view name. Unnamed views are named after their position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Data source; inherited from the closest ancestor when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSpec>,
    /// Ordered transforms, each an object tagged by `"type"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<Value>,
    /// Mark configuration, opaque to the data flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<Value>,
    /// Fields the unit view's data is grouped by.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub facet: Vec<String>,
    /// Comparator applied within every facet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<CompareParams>,
    /// Overlaid child views.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layer: Vec<ViewSpec>,
    /// Concatenated child views.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concat: Vec<ViewSpec>,
}

/// Structural kind of a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// Leaf view drawing a mark.
    Unit,
    /// Overlay of children.
    Layer,
    /// Side-by-side children.
    Concat,
}

impl ViewSpec {
    /// Structural kind, or a configuration error when it is ambiguous.
    pub fn kind(&self) -> GentrackResult<ViewKind> {
        match (self.mark.is_some(), !self.layer.is_empty(), !self.concat.is_empty()) {
            (true, false, false) => Ok(ViewKind::Unit),
            (false, true, false) => Ok(ViewKind::Layer),
            (false, false, true) => Ok(ViewKind::Concat),
            _ => Err(GentrackError::config(
                "a view needs exactly one of \"mark\", \"layer\" or \"concat\"",
                &self.to_config(),
            )),
        }
    }

    /// Child views paired with their resolved names.
    pub fn children<'a>(&'a self, name: &str) -> Vec<(String, &'a ViewSpec)> {
        let (label, children) = if self.layer.is_empty() {
            ("concat", &self.concat)
        } else {
            ("layer", &self.layer)
        };
        children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let resolved = child
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{name}_{label}{i}"));
                (resolved, child)
            })
            .collect()
    }

    /// This view as a JSON object, for error context. Children are omitted.
    pub(crate) fn to_config(&self) -> Value {
        let shallow = ViewSpec {
            layer: Vec::new(),
            concat: Vec::new(),
            ..self.clone()
        };
        serde_json::to_value(shallow).unwrap_or(Value::Null)
    }
}

impl VizSpec {
    /// Parse a spec from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GentrackResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| GentrackError::validation(format!("parse visualization JSON: {e}")))
    }

    /// Parse a spec from a JSON string.
    pub fn from_json_str(s: &str) -> GentrackResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a spec from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GentrackResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GentrackError::validation(format!(
                "open visualization JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Name of the root view.
    pub fn root_name(&self) -> String {
        self.view.name.clone().unwrap_or_else(|| "root".to_string())
    }

    /// Every view in pre-order, with resolved names.
    pub fn views(&self) -> Vec<(String, &ViewSpec)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root_name(), &self.view)];
        while let Some((name, view)) = stack.pop() {
            stack.extend(view.children(&name).into_iter().rev());
            out.push((name, view));
        }
        out
    }

    /// Check view structure and name uniqueness.
    pub fn validate(&self) -> GentrackResult<()> {
        let mut seen = HashSet::new();
        for (name, view) in self.views() {
            if name.trim().is_empty() {
                return Err(GentrackError::validation("view name must be non-empty"));
            }
            if !seen.insert(name.clone()) {
                return Err(GentrackError::validation(format!(
                    "duplicate view name '{name}'"
                )));
            }
            view.kind()?;
            if view.mark.is_none() && (!view.facet.is_empty() || view.sort.is_some()) {
                return Err(GentrackError::validation(format!(
                    "view '{name}' sets \"facet\" or \"sort\" but has no mark"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/spec.rs"]
mod tests;
