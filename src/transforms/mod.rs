use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::data::genome::Genome;
use crate::flow::node::Transform;
use crate::foundation::error::{GentrackError, GentrackResult};

pub(crate) mod clone;
pub(crate) mod filter;
pub(crate) mod flatten_sequence;
pub(crate) mod identifier;
pub(crate) mod linearize;
pub(crate) mod project;
pub(crate) mod regex_extract;

pub use clone::CloneTransform;
pub use filter::{FilterParams, FilterTransform};
pub use flatten_sequence::{FlattenSequenceParams, FlattenSequenceTransform};
pub use identifier::{IdentifierParams, IdentifierTransform};
pub use linearize::{LinearizeGenomicCoordinate, LinearizeParams};
pub use project::{ProjectParams, ProjectTransform};
pub use regex_extract::{RegexExtractParams, RegexExtractTransform};

/// Environment available to transforms at construction time.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransformContext<'a> {
    /// Assembly used for coordinate linearization.
    pub genome: Option<&'a Genome>,
}

/// Instantiate a transform from its configuration object.
///
/// The object is tagged by `"type"`. Unknown types and invalid parameters are
/// configuration errors carrying `params`.
pub fn create_transform(
    params: &Value,
    ctx: &TransformContext<'_>,
) -> GentrackResult<Box<dyn Transform>> {
    let kind = params
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GentrackError::config("transform must have a string \"type\"", params))?;

    let built = match kind {
        "clone" => Ok(boxed(CloneTransform)),
        "filter" => parse_params(params).and_then(FilterTransform::new).map(boxed),
        "flattenSequence" => parse_params(params)
            .map(FlattenSequenceTransform::new)
            .map(boxed),
        "identifier" => parse_params(params).map(IdentifierTransform::new).map(boxed),
        "linearizeGenomicCoordinate" => match ctx.genome {
            Some(genome) => parse_params(params)
                .and_then(|p| LinearizeGenomicCoordinate::new(p, genome))
                .map(boxed),
            None => Err(GentrackError::validation("no genome has been configured")),
        },
        "project" => parse_params(params).and_then(ProjectTransform::new).map(boxed),
        "regexExtract" => parse_params(params)
            .and_then(RegexExtractTransform::new)
            .map(boxed),
        other => {
            return Err(GentrackError::config(
                format!("unknown transform type '{other}'"),
                params,
            ));
        }
    };

    built.map_err(|e| match e {
        GentrackError::Config { .. } => e,
        other => GentrackError::config(
            format!("cannot initialize \"{kind}\" transform: {other}"),
            params,
        ),
    })
}

fn boxed<T: Transform + 'static>(t: T) -> Box<dyn Transform> {
    Box::new(t)
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> GentrackResult<T> {
    serde_json::from_value(params.clone()).map_err(|e| GentrackError::serde(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/mod.rs"]
mod tests;
