pub(crate) mod actions;
pub(crate) mod attributes;
pub(crate) mod handler;
pub mod operations;
pub(crate) mod state;

pub use actions::SampleAction;
pub use attributes::{Accessor, AttributeIdentifier, AttributeInfo, AttributeResolver};
pub use handler::SampleHandler;
pub use operations::NominalFilterAction;
pub use state::{GroupingStep, SampleGroup, SampleId, SampleState};
