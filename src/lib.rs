//! gentrack turns a declarative genomic visualization spec into record flows
//! and manages the interactive sample hierarchy next to them.
//!
//! - Load and validate a [`VizSpec`]
//! - Build a [`DataFlow`] with [`build_data_flow`] and pump it with [`DataFlow::load_all`]
//! - Read each view's grouped records as a [`Group`]
//! - Sort, filter and group samples through a [`SampleHandler`], with undo
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod data;
mod flow;
mod foundation;
mod provenance;
mod view;

/// Sample command engine.
pub mod samples;
/// Root data sources.
pub mod sources;
/// Record transforms.
pub mod transforms;

pub use crate::foundation::core::{
    ComparisonOp, Datum, FieldPath, GroupKey, Row, compare_values, is_undefined, stringify_value,
};
pub use crate::foundation::error::{GentrackError, GentrackResult};

pub use crate::data::domain::{DataType, Domain, extract_domain};
pub use crate::data::genome::{Chromosome, Genome};
pub use crate::data::group::{FlatData, Group, InternalGroup, LeafGroup};
pub use crate::flow::chain::{Chain, create_chain};
pub use crate::flow::collector::{Collector, CollectorParams, CompareParams, SortOrder};
pub use crate::flow::dataflow::DataFlow;
pub use crate::flow::graph::FlowGraph;
pub use crate::flow::node::{Behavior, Emit, FlowNode, NodeId, Transform};
pub use crate::provenance::{Provenance, ProvenanceEntry};
pub use crate::samples::{
    AttributeIdentifier, AttributeInfo, SampleAction, SampleGroup, SampleHandler, SampleState,
};
pub use crate::sources::{DataSource, DataSpec, create_data_source};
pub use crate::view::{FlowBuilder, FlowOpts, ViewKind, ViewSpec, VizSpec, build_data_flow};
