use std::rc::Rc;

use crate::flow::collector::Collector;
use crate::flow::node::{Behavior, Emit, FlowNode, NodeId};
use crate::foundation::core::Datum;
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::DataSource;

#[derive(Debug)]
struct NodeSlot {
    node: FlowNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    detached: bool,
}

/// Arena of flow nodes connected by explicit parent→child edges.
///
/// Every node has at most one parent; any node except a collector may have
/// many children, each consuming the parent's output independently.
/// Propagation is synchronous and depth-first: a record is forwarded to all
/// children before the call returns.
#[derive(Debug, Default)]
pub struct FlowGraph {
    nodes: Vec<NodeSlot>,
}

impl FlowGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn push_slot(&mut self, node: FlowNode, parent: Option<NodeId>) -> GentrackResult<NodeId> {
        let id = NodeId(
            self.nodes
                .len()
                .try_into()
                .map_err(|_| GentrackError::flow("node id overflow"))?,
        );
        self.nodes.push(NodeSlot {
            node,
            parent,
            children: Vec::new(),
            detached: false,
        });
        Ok(id)
    }

    fn slot(&self, id: NodeId) -> GentrackResult<&NodeSlot> {
        self.nodes
            .get(id.index())
            .filter(|s| !s.detached)
            .ok_or_else(|| GentrackError::flow(format!("unknown flow node {}", id.0)))
    }

    fn slot_mut(&mut self, id: NodeId) -> GentrackResult<&mut NodeSlot> {
        self.nodes
            .get_mut(id.index())
            .filter(|s| !s.detached)
            .ok_or_else(|| GentrackError::flow(format!("unknown flow node {}", id.0)))
    }

    /// Add a root source node.
    pub fn add_source(&mut self, source: Box<dyn DataSource>) -> GentrackResult<NodeId> {
        self.push_slot(FlowNode::Source(source), None)
    }

    /// Attach `node` as a new child of `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, node: FlowNode) -> GentrackResult<NodeId> {
        match &self.slot(parent)?.node {
            FlowNode::Collector(_) => {
                return Err(GentrackError::flow(
                    "a collector is terminal and cannot have children",
                ));
            }
            FlowNode::Source(_) | FlowNode::Transform(_) => {}
        }
        if matches!(node, FlowNode::Source(_)) {
            return Err(GentrackError::flow("a source cannot have a parent"));
        }
        let id = self.push_slot(node, Some(parent))?;
        self.slot_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.slot(id).ok().map(|s| &s.node)
    }

    /// Children of a node, in attachment order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.slot(id) {
            Ok(s) => &s.children,
            Err(_) => &[],
        }
    }

    /// Parent of a node; `None` for sources.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).ok().and_then(|s| s.parent)
    }

    /// Diagnostic label of a node.
    pub fn label(&self, id: NodeId) -> Option<&'static str> {
        self.node(id).map(FlowNode::label)
    }

    /// Aliasing behavior of a transform node.
    pub fn behavior(&self, id: NodeId) -> Option<Behavior> {
        match self.node(id)? {
            FlowNode::Transform(t) => Some(t.behavior()),
            FlowNode::Source(_) | FlowNode::Collector(_) => None,
        }
    }

    /// Collector by id.
    pub fn collector(&self, id: NodeId) -> Option<&Collector> {
        match self.node(id)? {
            FlowNode::Collector(c) => Some(c),
            FlowNode::Source(_) | FlowNode::Transform(_) => None,
        }
    }

    /// All live source nodes.
    pub fn sources(&self) -> Vec<NodeId> {
        self.live_ids()
            .filter(|id| matches!(self.node(*id), Some(FlowNode::Source(_))))
            .collect()
    }

    /// All live collector nodes.
    pub fn collectors(&self) -> Vec<NodeId> {
        self.live_ids()
            .filter(|id| self.collector(*id).is_some())
            .collect()
    }

    fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.detached)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Path of labels from the root source down to `id`, for diagnostics.
    pub fn lineage(&self, id: NodeId) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            if let Some(label) = self.label(n) {
                out.push(label);
            }
            cur = self.parent(n);
        }
        out.reverse();
        out
    }

    /// Run one load cycle of a source: reset the subtree, push every produced
    /// record, then complete the subtree so collectors expose fresh data.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self, source: NodeId) -> GentrackResult<()> {
        let subtree = self.subtree(source);
        for id in &subtree {
            match &mut self.nodes[id.index()].node {
                FlowNode::Transform(t) => t.reset(),
                FlowNode::Collector(c) => c.reset(),
                FlowNode::Source(_) => {}
            }
        }

        let rows = match &mut self.slot_mut(source)?.node {
            FlowNode::Source(s) => s.load()?,
            other => {
                return Err(GentrackError::flow(format!(
                    "cannot load from a '{}' node",
                    other.label()
                )));
            }
        };
        let count = rows.len();
        for row in rows {
            self.propagate(source, Rc::new(row))?;
        }

        for id in &subtree {
            if let FlowNode::Collector(c) = &mut self.nodes[id.index()].node {
                c.complete();
            }
        }
        tracing::debug!(records = count, "source loaded");
        Ok(())
    }

    /// Load every source in insertion order.
    pub fn load_all(&mut self) -> GentrackResult<()> {
        for source in self.sources() {
            self.load(source)?;
        }
        Ok(())
    }

    /// Forward `datum` to every child of `from`.
    ///
    /// All children but the last receive a shared handle; the last one takes
    /// ownership, so a lone child sees an unshared record.
    pub fn propagate(&mut self, from: NodeId, datum: Datum) -> GentrackResult<()> {
        let n = self.slot(from)?.children.len();
        if n == 0 {
            return Ok(());
        }
        for i in 0..n - 1 {
            let child = self.nodes[from.index()].children[i];
            self.handle(child, Rc::clone(&datum))?;
        }
        let last = self.nodes[from.index()].children[n - 1];
        self.handle(last, datum)
    }

    fn handle(&mut self, id: NodeId, datum: Datum) -> GentrackResult<()> {
        let out = match &mut self.nodes[id.index()].node {
            FlowNode::Collector(c) => {
                c.handle(datum);
                return Ok(());
            }
            FlowNode::Source(s) => {
                return Err(GentrackError::flow(format!(
                    "source '{}' cannot receive records",
                    s.kind()
                )));
            }
            FlowNode::Transform(t) => {
                let mut out = Emit::new();
                t.handle(datum, &mut out)?;
                out
            }
        };
        for d in out {
            self.propagate(id, d)?;
        }
        Ok(())
    }

    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Remove defensive copies that cannot be observed by any other branch:
    /// clone nodes with a single child whose every ancestor up to the source
    /// has exactly one child. Returns the number of removed nodes.
    pub fn elide_redundant_clones(&mut self) -> usize {
        let candidates: Vec<NodeId> = self
            .live_ids()
            .filter(|id| self.label(*id) == Some("clone") && self.children(*id).len() == 1)
            .collect();

        let mut removed = 0;
        for id in candidates {
            if !self.is_unshared_path(id) {
                continue;
            }
            let Some(parent) = self.parent(id) else {
                continue;
            };
            let child = self.nodes[id.index()].children[0];
            for c in &mut self.nodes[parent.index()].children {
                if *c == id {
                    *c = child;
                }
            }
            self.nodes[child.index()].parent = Some(parent);
            let slot = &mut self.nodes[id.index()];
            slot.children.clear();
            slot.parent = None;
            slot.detached = true;
            removed += 1;
            tracing::debug!(node = id.0, "elided redundant defensive copy");
        }
        removed
    }

    fn is_unshared_path(&self, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(n) = cur {
            if self.children(n).len() != 1 {
                return false;
            }
            cur = self.parent(n);
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/graph.rs"]
mod tests;
