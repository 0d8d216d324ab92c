// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dependency-ordered traversal of the active node set.

use crate::graph::ShaderGraph;
use crate::node::NodeId;
use std::collections::HashSet;

/// Error when the graph contains a cycle through input edges
#[derive(Debug, thiserror::Error)]
#[error("Graph contains a cycle through node {node:?}")]
pub struct CycleError {
    /// A node on the detected cycle
    pub node: NodeId,
}

/// Collect the transitive input-dependency closure of `root`.
///
/// Returns every node reachable by following input edges backward from the
/// root, each exactly once, with dependencies strictly before dependents, so
/// emitted statements only reference variables that were already declared.
/// Input slots are visited in declared order, which keeps the result stable
/// for a given graph state.
///
/// `root: None` (no output node designated) yields an empty set. Nodes not
/// reachable from the root are never visited.
pub fn collect_active_nodes(
    graph: &ShaderGraph,
    root: Option<NodeId>,
) -> Result<Vec<NodeId>, CycleError> {
    let Some(root) = root else {
        return Ok(Vec::new());
    };
    if graph.node(root).is_none() {
        return Ok(Vec::new());
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();
    let mut order = Vec::new();
    visit(graph, root, &mut visited, &mut in_stack, &mut order)?;
    Ok(order)
}

fn visit(
    graph: &ShaderGraph,
    node_id: NodeId,
    visited: &mut HashSet<NodeId>,
    in_stack: &mut HashSet<NodeId>,
    order: &mut Vec<NodeId>,
) -> Result<(), CycleError> {
    if in_stack.contains(&node_id) {
        return Err(CycleError { node: node_id });
    }
    if visited.contains(&node_id) {
        return Ok(());
    }

    in_stack.insert(node_id);

    let Some(node) = graph.node(node_id) else {
        // dangling edge target; surfaced later by node validation
        in_stack.remove(&node_id);
        return Ok(());
    };
    for slot in &node.inputs {
        if let Some(edge) = graph.edge_into_slot(node_id, slot.id) {
            visit(graph, edge.from_node, visited, in_stack, order)?;
        }
    }

    in_stack.remove(&node_id);
    visited.insert(node_id);
    order.push(node_id);

    Ok(())
}
