use std::rc::Rc;

use serde_json::Value;

use crate::data::genome::Genome;
use crate::flow::node::{Behavior, Emit, Transform};
use crate::foundation::core::{Datum, FieldPath, one_or_many};
use crate::foundation::error::{GentrackError, GentrackResult};

/// Parameters of a `linearizeGenomicCoordinate` transform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearizeParams {
    /// Chromosome field.
    pub chrom: String,
    /// Intra-chromosomal position field(s).
    #[serde(deserialize_with = "one_or_many")]
    pub pos: Vec<String>,
    /// Output field(s), one per `pos` field.
    #[serde(rename = "as", deserialize_with = "one_or_many")]
    pub as_fields: Vec<String>,
    /// Constant added to every output, e.g. `-1` for one-based input.
    #[serde(default)]
    pub offset: f64,
}

/// Maps `(chrom, pos)` pairs onto the genome's single linear axis.
#[derive(Clone, Debug)]
pub struct LinearizeGenomicCoordinate {
    genome: Genome,
    chrom: FieldPath,
    pos: Vec<(FieldPath, String)>,
    offset: f64,
    last: Option<(String, u64)>,
}

impl LinearizeGenomicCoordinate {
    /// Validate parameters against `genome` and create the transform.
    pub fn new(params: LinearizeParams, genome: &Genome) -> GentrackResult<Self> {
        if params.pos.len() != params.as_fields.len() {
            return Err(GentrackError::validation(format!(
                "\"pos\" and \"as\" have different lengths ({} vs {})",
                params.pos.len(),
                params.as_fields.len()
            )));
        }
        Ok(Self {
            genome: genome.clone(),
            chrom: FieldPath::new(params.chrom),
            pos: params
                .pos
                .into_iter()
                .map(FieldPath::new)
                .zip(params.as_fields)
                .collect(),
            offset: params.offset,
            last: None,
        })
    }

    fn chrom_offset(&mut self, chrom: &str) -> GentrackResult<u64> {
        if let Some((name, offset)) = &self.last
            && name == chrom
        {
            return Ok(*offset);
        }
        let offset = self.genome.offset(chrom).ok_or_else(|| {
            GentrackError::flow(format!(
                "unknown chromosome '{chrom}' in genome '{}'",
                self.genome.name()
            ))
        })?;
        self.last = Some((chrom.to_string(), offset));
        Ok(offset)
    }
}

/// Numbers, or strings holding a number as produced by `regexExtract`.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Transform for LinearizeGenomicCoordinate {
    fn kind(&self) -> &'static str {
        "linearizeGenomicCoordinate"
    }

    fn behavior(&self) -> Behavior {
        Behavior::Modifies
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn handle(&mut self, mut datum: Datum, out: &mut Emit) -> GentrackResult<()> {
        let chrom = match self.chrom.get(&datum) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(GentrackError::flow(format!(
                    "missing chromosome field '{}'",
                    self.chrom.name()
                )));
            }
        };
        let base = self.chrom_offset(&chrom)? as f64 + self.offset;

        let values: Vec<Value> = self
            .pos
            .iter()
            .map(|(field, _)| {
                field
                    .get(&datum)
                    .and_then(numeric)
                    .and_then(|p| serde_json::Number::from_f64(base + p))
                    .map_or(Value::Null, Value::Number)
            })
            .collect();
        let row = Rc::make_mut(&mut datum);
        for ((_, name), v) in self.pos.iter().zip(values) {
            row.insert(name.clone(), v);
        }
        out.push(datum);
        Ok(())
    }
}
