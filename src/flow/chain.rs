use crate::data::group::Group;
use crate::flow::collector::{Collector, CollectorParams};
use crate::flow::graph::FlowGraph;
use crate::flow::node::{FlowNode, NodeId};
use crate::foundation::core::Datum;
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::DataSource;

/// A linear flow: one source, a chain of nodes, one collector.
#[derive(Debug)]
pub struct Chain {
    graph: FlowGraph,
    source: NodeId,
    collector: NodeId,
}

/// Connect `source` to `nodes` in order.
///
/// A default collector is appended unless the last node already is one.
pub fn create_chain(
    source: Box<dyn DataSource>,
    mut nodes: Vec<FlowNode>,
) -> GentrackResult<Chain> {
    if !matches!(nodes.last(), Some(FlowNode::Collector(_))) {
        nodes.push(FlowNode::Collector(Collector::new(CollectorParams::default())));
    }
    let mut graph = FlowGraph::new();
    let source_id = graph.add_source(source)?;
    let mut current = source_id;
    for node in nodes {
        current = graph.add_child(current, node)?;
    }
    Ok(Chain {
        graph,
        source: source_id,
        collector: current,
    })
}

impl Chain {
    /// Underlying graph.
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// Terminal collector of the chain.
    pub fn collector(&self) -> NodeId {
        self.collector
    }

    /// Run one load cycle and return the collected hierarchy.
    pub fn load_and_collect(&mut self) -> GentrackResult<&Group<Datum>> {
        self.graph.load(self.source)?;
        self.graph
            .collector(self.collector)
            .ok_or_else(|| GentrackError::flow("chain does not end in a collector"))?
            .data()
    }
}
