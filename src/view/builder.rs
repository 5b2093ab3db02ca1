use std::path::{Path, PathBuf};

use crate::flow::collector::CollectorParams;
use crate::flow::dataflow::DataFlow;
use crate::flow::node::{Behavior, FlowNode, NodeId};
use crate::foundation::error::{GentrackError, GentrackResult};
use crate::sources::create_data_source;
use crate::transforms::{CloneTransform, TransformContext, create_transform};
use crate::view::spec::{ViewKind, ViewSpec, VizSpec};

/// Options controlling flow construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlowOpts {
    /// Drop defensive copies on paths that no other branch shares.
    pub elide_redundant_clones: bool,
}

/// Depth-first builder turning a view tree into a [`DataFlow`].
///
/// The builder owns its stack of "current" upstream nodes: a view starts from
/// its parent's current node, moves it forward through its own source and
/// transforms, and hands the result to its children.
pub struct FlowBuilder<'a> {
    spec: &'a VizSpec,
    base_dir: PathBuf,
    opts: FlowOpts,
    flow: DataFlow,
    stack: Vec<Option<NodeId>>,
}

impl<'a> FlowBuilder<'a> {
    /// Create a builder. Relative data URLs resolve against `base_dir`.
    pub fn new(spec: &'a VizSpec, base_dir: impl AsRef<Path>, opts: FlowOpts) -> Self {
        Self {
            spec,
            base_dir: base_dir.as_ref().to_path_buf(),
            opts,
            flow: DataFlow::new(),
            stack: Vec::new(),
        }
    }

    /// Build the flow. Nothing is loaded yet.
    #[tracing::instrument(skip(self), fields(root = %self.spec.root_name()))]
    pub fn build(mut self) -> GentrackResult<DataFlow> {
        self.spec.validate()?;
        let spec = self.spec;
        self.visit(&spec.root_name(), &spec.view)?;

        if self.opts.elide_redundant_clones {
            let removed = self.flow.graph_mut().elide_redundant_clones();
            tracing::debug!(removed, "elided redundant defensive copies");
        }
        Ok(self.flow)
    }

    fn current(&self) -> Option<NodeId> {
        self.stack.last().copied().flatten()
    }

    fn visit(&mut self, name: &str, view: &ViewSpec) -> GentrackResult<()> {
        let mut current = self.current();

        if let Some(data) = &view.data {
            let source = create_data_source(data, &self.base_dir)?;
            current = Some(self.flow.add_data_source(name, source)?);
        }

        for params in &view.transform {
            let Some(parent) = current else {
                return Err(GentrackError::config(
                    format!("view '{name}' has transforms but no data source"),
                    params,
                ));
            };
            current = Some(self.add_transform(parent, params)?);
        }

        match view.kind()? {
            ViewKind::Unit => {
                let Some(parent) = current else {
                    return Err(GentrackError::config(
                        format!("unit view '{name}' has no data source"),
                        &view.to_config(),
                    ));
                };
                let params = CollectorParams {
                    groupby: view.facet.clone(),
                    sort: view.sort.clone(),
                };
                self.flow.add_collector(name, parent, params)?;
            }
            ViewKind::Layer | ViewKind::Concat => {
                self.stack.push(current);
                let result = view
                    .children(name)
                    .into_iter()
                    .try_for_each(|(child_name, child)| self.visit(&child_name, child));
                self.stack.pop();
                result?;
            }
        }
        Ok(())
    }

    fn add_transform(
        &mut self,
        parent: NodeId,
        params: &serde_json::Value,
    ) -> GentrackResult<NodeId> {
        let ctx = TransformContext {
            genome: self.spec.genome.as_ref(),
        };
        let transform = create_transform(params, &ctx)?;
        let graph = self.flow.graph_mut();

        let parent = if transform.behavior() == Behavior::Modifies {
            tracing::debug!(
                transform = transform.kind(),
                "inserting defensive copy before modifying transform"
            );
            graph.add_child(parent, FlowNode::transform(CloneTransform))?
        } else {
            parent
        };
        graph.add_child(parent, FlowNode::Transform(transform))
    }
}

/// Build the flow of a visualization with the given options.
pub fn build_data_flow(
    spec: &VizSpec,
    base_dir: impl AsRef<Path>,
    opts: FlowOpts,
) -> GentrackResult<DataFlow> {
    FlowBuilder::new(spec, base_dir, opts).build()
}

#[cfg(test)]
#[path = "../../tests/unit/view/builder.rs"]
mod tests;
