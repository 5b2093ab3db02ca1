pub(crate) mod chain;
pub(crate) mod collector;
pub(crate) mod dataflow;
pub(crate) mod graph;
pub(crate) mod node;
