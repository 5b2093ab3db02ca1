use std::fmt;
use std::path::Path;

use crate::foundation::core::Row;
use crate::foundation::error::{GentrackError, GentrackResult};

pub(crate) mod inline;
pub(crate) mod sequence;
pub(crate) mod url;

pub use inline::InlineSource;
pub use sequence::{MAX_SEQUENCE_LEN, SequenceParams, SequenceSource};
pub use url::{DataFormat, UrlSource};

/// Opaque producer of records at the root of a flow.
///
/// A load cycle calls [`DataSource::load`] once; the graph then pushes every
/// returned row through its children.
pub trait DataSource: fmt::Debug {
    /// Source type name for diagnostics.
    fn kind(&self) -> &'static str;

    /// Produce the rows of one load cycle.
    fn load(&mut self) -> GentrackResult<Vec<Row>>;
}

/// Data configuration of a view.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DataSpec {
    /// Rows embedded in the spec.
    Inline {
        /// Row objects; scalars are wrapped as `{"data": value}`.
        values: Vec<serde_json::Value>,
    },
    /// Generated numeric sequence.
    Sequence {
        /// Generator parameters.
        sequence: SequenceParams,
    },
    /// Rows loaded from a file.
    Url {
        /// Path, relative to the spec's base directory.
        url: String,
        /// File format; inferred from the extension when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<DataFormat>,
    },
}

/// Instantiate the source described by `spec`.
pub fn create_data_source(spec: &DataSpec, base_dir: &Path) -> GentrackResult<Box<dyn DataSource>> {
    let as_config = || serde_json::to_value(spec).unwrap_or(serde_json::Value::Null);
    match spec {
        DataSpec::Inline { values } => Ok(Box::new(InlineSource::new(values.clone()))),
        DataSpec::Sequence { sequence } => {
            let source = SequenceSource::new(sequence.clone())
                .map_err(|e| GentrackError::config(e.to_string(), &as_config()))?;
            Ok(Box::new(source))
        }
        DataSpec::Url { url, format } => {
            if url.trim().is_empty() {
                return Err(GentrackError::config("data url must be non-empty", &as_config()));
            }
            let source = UrlSource::new(base_dir.join(url), *format)
                .map_err(|e| GentrackError::config(e.to_string(), &as_config()))?;
            Ok(Box::new(source))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sources/mod.rs"]
mod tests;
