use indexmap::IndexMap;

use crate::foundation::error::{GentrackError, GentrackResult};

/// A chromosome of an assembly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Chromosome {
    /// Name, e.g. `chr1`.
    pub name: String,
    /// Length in base pairs.
    pub size: u64,
}

/// Genome assembly: ordered chromosomes laid end to end on one linear axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Genome {
    name: String,
    chromosomes: Vec<Chromosome>,
    #[serde(skip)]
    offsets: IndexMap<String, u64>,
}

#[derive(serde::Deserialize)]
struct GenomeDef {
    name: String,
    #[serde(default)]
    chromosomes: Vec<Chromosome>,
}

impl<'de> serde::Deserialize<'de> for Genome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let def = GenomeDef::deserialize(deserializer)?;
        Genome::new(def.name, def.chromosomes).map_err(serde::de::Error::custom)
    }
}

impl Genome {
    /// Build an assembly. Chromosome names must be unique.
    pub fn new(name: impl Into<String>, chromosomes: Vec<Chromosome>) -> GentrackResult<Self> {
        let mut offsets = IndexMap::with_capacity(chromosomes.len());
        let mut offset = 0u64;
        for c in &chromosomes {
            if offsets.insert(c.name.clone(), offset).is_some() {
                return Err(GentrackError::validation(format!(
                    "duplicate chromosome '{}'",
                    c.name
                )));
            }
            offset += c.size;
        }
        Ok(Self {
            name: name.into(),
            chromosomes,
            offsets,
        })
    }

    /// Assembly name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chromosomes in axis order.
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// Total length of the linear axis.
    pub fn total_size(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.size).sum()
    }

    /// Start of a chromosome on the linear axis. `1` and `chr1` are interchangeable.
    pub fn offset(&self, chrom: &str) -> Option<u64> {
        if let Some(o) = self.offsets.get(chrom) {
            return Some(*o);
        }
        match chrom.strip_prefix("chr") {
            Some(bare) => self.offsets.get(bare).copied(),
            None => self.offsets.get(&format!("chr{chrom}")).copied(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/genome.rs"]
mod tests;
