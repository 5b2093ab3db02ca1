pub(crate) mod store;

pub use store::{Provenance, ProvenanceEntry};
