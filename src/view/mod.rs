pub(crate) mod builder;
pub(crate) mod spec;

pub use builder::{FlowBuilder, FlowOpts, build_data_flow};
pub use spec::{ViewKind, ViewSpec, VizSpec};
