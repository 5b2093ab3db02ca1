use indexmap::IndexMap;

use crate::data::domain::{DataType, Domain, extract_domain};
use crate::data::group::Group;
use crate::flow::collector::{Collector, CollectorParams};
use crate::flow::graph::FlowGraph;
use crate::flow::node::{FlowNode, NodeId};
use crate::foundation::core::{Datum, FieldPath};
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::DataSource;

/// All transformation graphs of a visualization, indexed by view name.
///
/// Sources are registered under the view that declared them; collectors under
/// the unit view that consumes them.
#[derive(Debug, Default)]
pub struct DataFlow {
    graph: FlowGraph,
    sources_by_view: IndexMap<String, NodeId>,
    collectors_by_view: IndexMap<String, NodeId>,
}

impl DataFlow {
    /// Create an empty flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph holding every node.
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// Mutable access for wiring transforms between sources and collectors.
    pub fn graph_mut(&mut self) -> &mut FlowGraph {
        &mut self.graph
    }

    /// Register the source declared by `view`.
    pub fn add_data_source(
        &mut self,
        view: impl Into<String>,
        source: Box<dyn DataSource>,
    ) -> GentrackResult<NodeId> {
        let view = view.into();
        if self.sources_by_view.contains_key(&view) {
            return Err(GentrackError::flow(format!(
                "view '{view}' already has a data source"
            )));
        }
        let id = self.graph.add_source(source)?;
        self.sources_by_view.insert(view, id);
        Ok(id)
    }

    /// Attach the collector consumed by `view` below `parent`.
    pub fn add_collector(
        &mut self,
        view: impl Into<String>,
        parent: NodeId,
        params: CollectorParams,
    ) -> GentrackResult<NodeId> {
        let view = view.into();
        if self.collectors_by_view.contains_key(&view) {
            return Err(GentrackError::flow(format!(
                "view '{view}' already has a collector"
            )));
        }
        let id = self
            .graph
            .add_child(parent, FlowNode::Collector(Collector::new(params)))?;
        self.collectors_by_view.insert(view, id);
        Ok(id)
    }

    /// Source node declared by `view`.
    pub fn source_for_view(&self, view: &str) -> Option<NodeId> {
        self.sources_by_view.get(view).copied()
    }

    /// Node id of the collector consumed by `view`.
    pub fn collector_node_for_view(&self, view: &str) -> Option<NodeId> {
        self.collectors_by_view.get(view).copied()
    }

    /// Collector consumed by `view`.
    pub fn collector_for_view(&self, view: &str) -> Option<&Collector> {
        self.collectors_by_view
            .get(view)
            .and_then(|id| self.graph.collector(*id))
    }

    /// Names of the views owning a collector, in build order.
    pub fn views(&self) -> impl Iterator<Item = &str> + '_ {
        self.collectors_by_view.keys().map(String::as_str)
    }

    /// Collected hierarchy of `view` from the latest load cycle.
    pub fn data_for_view(&self, view: &str) -> GentrackResult<&Group<Datum>> {
        self.collector_for_view(view)
            .ok_or_else(|| GentrackError::flow(format!("no collector for view '{view}'")))?
            .data()
    }

    /// Load every source, in registration order.
    #[tracing::instrument(skip(self), fields(sources = self.sources_by_view.len()))]
    pub fn load_all(&mut self) -> GentrackResult<()> {
        for (view, source) in &self.sources_by_view {
            tracing::debug!(view = view.as_str(), "loading data source");
            self.graph.load(*source)?;
        }
        Ok(())
    }

    /// Union of the domains of `field` over the data of several views.
    pub fn domain_for_views<'a>(
        &self,
        views: impl IntoIterator<Item = &'a str>,
        field: &str,
        kind: DataType,
    ) -> GentrackResult<Domain> {
        let field = FieldPath::new(field);
        let mut domain = Domain::empty(kind);
        for view in views {
            domain.extend_all(&extract_domain(self.data_for_view(view)?, &field, kind))?;
        }
        Ok(domain)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/dataflow.rs"]
mod tests;
