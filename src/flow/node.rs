use std::fmt;

use smallvec::SmallVec;

use crate::flow::collector::Collector;
use crate::foundation::core::Datum;
use crate::foundation::error::GentrackResult;
use crate::sources::DataSource;

/// Identifier of a node in a [`crate::FlowGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a transform treats the records it receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Never mutates its inputs; may forward them as-is.
    Pure,
    /// Always emits freshly constructed records.
    Clones,
    /// Mutates its inputs in place. Must be preceded by a defensive copy.
    Modifies,
}

/// Records emitted by a transform for a single input.
pub type Emit = SmallVec<[Datum; 4]>;

/// A record transformation inside a flow.
///
/// `handle` is called once per incoming record and pushes zero or more
/// outputs into `out`; the graph forwards them to every child in order.
pub trait Transform: fmt::Debug {
    /// Transform type name as used in configuration.
    fn kind(&self) -> &'static str;

    /// Aliasing behavior of this transform.
    fn behavior(&self) -> Behavior;

    /// Called before each load cycle.
    fn reset(&mut self) {}

    /// Process one record.
    fn handle(&mut self, datum: Datum, out: &mut Emit) -> GentrackResult<()>;
}

/// A node of a transformation graph.
#[derive(Debug)]
pub enum FlowNode {
    /// Root producer of records.
    Source(Box<dyn DataSource>),
    /// Intermediate transform.
    Transform(Box<dyn Transform>),
    /// Terminal buffer feeding a consumer.
    Collector(Collector),
}

impl FlowNode {
    /// Wrap a transform.
    pub fn transform(t: impl Transform + 'static) -> Self {
        Self::Transform(Box::new(t))
    }

    /// Short label for diagnostics, e.g. `"collect"` or `"flattenSequence"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Source(s) => s.kind(),
            Self::Transform(t) => t.kind(),
            Self::Collector(_) => "collect",
        }
    }
}
