use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::core::Row;
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::DataSource;
use crate::sources::inline::value_to_row;

/// On-disk row encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// A single JSON array of rows.
    Json,
    /// One JSON value per line.
    Ndjson,
}

impl DataFormat {
    fn infer(path: &std::path::Path) -> GentrackResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None | Some("json") => Ok(Self::Json),
            Some("ndjson" | "jsonl") => Ok(Self::Ndjson),
            Some(ext) => Err(GentrackError::validation(format!(
                "unsupported data file extension '.{ext}' (expected .json, .ndjson or .jsonl)"
            ))),
        }
    }
}

/// Rows read from a local file on every load.
#[derive(Clone, Debug)]
pub struct UrlSource {
    path: PathBuf,
    format: DataFormat,
}

impl UrlSource {
    /// Create a source; the format is inferred from the extension when `None`.
    pub fn new(path: PathBuf, format: Option<DataFormat>) -> GentrackResult<Self> {
        let format = match format {
            Some(f) => f,
            None => DataFormat::infer(&path)?,
        };
        Ok(Self { path, format })
    }
}

impl DataSource for UrlSource {
    fn kind(&self) -> &'static str {
        "url"
    }

    fn load(&mut self) -> GentrackResult<Vec<Row>> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read data file '{}'", self.path.display()))?;
        match self.format {
            DataFormat::Json => {
                let values: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
                    GentrackError::serde(format!(
                        "parse JSON rows '{}': {e}",
                        self.path.display()
                    ))
                })?;
                Ok(values.into_iter().map(value_to_row).collect())
            }
            DataFormat::Ndjson => text
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str(line).map(value_to_row).map_err(|e| {
                        GentrackError::serde(format!(
                            "parse '{}' line {}: {e}",
                            self.path.display(),
                            i + 1
                        ))
                    })
                })
                .collect(),
        }
    }
}
