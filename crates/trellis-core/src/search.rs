//! Depth-first search over the ancestors of a policy node
//!
//! The searcher walks every node reachable upward from a start node along
//! parent relations, driving two caller-supplied strategies: a [`Propagator`]
//! fired once per traversed edge, and a [`Visitor`] fired once per node after
//! all of that node's ancestor propagation has completed. What is actually
//! computed (effective privilege sets, reachability, obligation triggers) is
//! entirely up to the strategies; the engine only guarantees ordering and
//! exactly-once semantics, including on diamond-shaped ancestries.

use crate::error::{Error, Result};
use crate::graph::PolicyGraph;
use crate::node::{Node, NodeId};
use std::collections::HashMap;

/// Edge-level strategy: combines information from a parent into a child
///
/// Invoked once for every parent→child edge the traversal covers, after the
/// parent's own ancestor subtree has been fully propagated and visited, and
/// before the child's visitation. The same child sees one call per distinct
/// parent, and the call fires even when the parent side was already covered
/// by an earlier path or an earlier traversal on the same searcher.
pub trait Propagator {
    fn propagate(&mut self, parent: &Node, child: &Node) -> Result<()>;
}

impl<F> Propagator for F
where
    F: FnMut(&Node, &Node) -> Result<()>,
{
    fn propagate(&mut self, parent: &Node, child: &Node) -> Result<()> {
        self(parent, child)
    }
}

/// Node-level strategy: finalizes a node once its ancestor propagation is done
///
/// Invoked exactly once per distinct node across the lifetime of a searcher,
/// no matter how many paths or traversal calls reach it.
pub trait Visitor {
    fn visit(&mut self, node: &Node) -> Result<()>;
}

impl<F> Visitor for F
where
    F: FnMut(&Node) -> Result<()>,
{
    fn visit(&mut self, node: &Node) -> Result<()> {
        self(node)
    }
}

/// Traversal progress for one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    /// On the active work stack; ancestors not yet fully processed
    InProgress,
    /// Visited; all ancestor propagation complete
    Complete,
}

/// Work-stack frame: one node plus its not-yet-processed parents
struct Frame {
    node: Node,
    parents: std::vec::IntoIter<NodeId>,
}

/// Depth-first searcher over the parent relations of a policy graph
///
/// The visited map is owned by the searcher and grows across every
/// [`traverse`](DepthFirstSearcher::traverse) call for its lifetime:
/// re-entering an already covered region is a no-op, so one searcher can
/// accumulate a computation over several start nodes without repeating work.
/// Use [`traverse_once`](DepthFirstSearcher::traverse_once) when each call
/// should start from a clean slate instead.
///
/// A searcher is cheap to construct and meant for single-threaded,
/// non-reentrant use. Strategies that write into shared accumulators bring
/// their own synchronization.
pub struct DepthFirstSearcher<'g, G> {
    graph: &'g G,
    visited: HashMap<NodeId, VisitState>,
}

impl<'g, G: PolicyGraph> DepthFirstSearcher<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            visited: HashMap::new(),
        }
    }

    /// Walk every ancestor of `start`, firing the propagator once per edge
    /// and the visitor once per node.
    ///
    /// Ordering: `propagate(parent, child)` runs only after the parent's own
    /// ancestors have been fully propagated and visited, and `visit(n)` runs
    /// only after every parent edge of `n` within the traversal has
    /// propagated. Ancestors are therefore always visited before their
    /// descendants; the relative order of unrelated branches follows the
    /// order the graph returns parents in.
    ///
    /// If `start` was already visited by an earlier call on this searcher
    /// the call returns immediately without firing either strategy.
    ///
    /// Any error — an unknown identifier surfacing from the graph, a cycle
    /// among the ancestors, or a strategy failure — aborts the call
    /// immediately. Nodes fully visited before the failure stay recorded;
    /// nodes the aborted call had only begun are forgotten, so a later call
    /// can cover them again.
    pub fn traverse<P, V>(&mut self, start: &Node, propagator: &mut P, visitor: &mut V) -> Result<()>
    where
        P: Propagator,
        V: Visitor,
    {
        if self.visited.contains_key(&start.id) {
            return Ok(());
        }

        tracing::debug!("Traversing ancestors of {} (id {})", start.name, start.id);

        let mut stack = Vec::new();
        let outcome = self.walk(start, propagator, visitor, &mut stack);
        if outcome.is_err() {
            // Forget the nodes the aborted call left half-processed.
            for frame in &stack {
                self.visited.remove(&frame.node.id);
            }
        }
        outcome
    }

    /// One-shot traversal with per-call visited state
    ///
    /// Equivalent to running [`traverse`](DepthFirstSearcher::traverse) on a
    /// freshly constructed searcher and discarding it: two consecutive calls
    /// over the same region both do full work.
    pub fn traverse_once<P, V>(
        graph: &'g G,
        start: &Node,
        propagator: &mut P,
        visitor: &mut V,
    ) -> Result<()>
    where
        P: Propagator,
        V: Visitor,
    {
        Self::new(graph).traverse(start, propagator, visitor)
    }

    /// Whether `id` has been fully visited by this searcher.
    pub fn is_visited(&self, id: NodeId) -> bool {
        matches!(self.visited.get(&id), Some(VisitState::Complete))
    }

    /// Number of nodes this searcher has fully visited.
    pub fn visited_count(&self) -> usize {
        self.visited
            .values()
            .filter(|state| **state == VisitState::Complete)
            .count()
    }

    fn walk<P, V>(
        &mut self,
        start: &Node,
        propagator: &mut P,
        visitor: &mut V,
        stack: &mut Vec<Frame>,
    ) -> Result<()>
    where
        P: Propagator,
        V: Visitor,
    {
        let mut visited_nodes = 0usize;
        let mut propagated_edges = 0usize;

        self.push_frame(start.clone(), stack)?;

        while let Some(frame) = stack.last_mut() {
            if let Some(parent_id) = frame.parents.next() {
                match self.visited.get(&parent_id).copied() {
                    Some(VisitState::Complete) => {
                        // Ascending into the parent would be a no-op, but the
                        // edge itself still propagates.
                        let parent = self.graph.node(parent_id)?;
                        propagator.propagate(&parent, &frame.node)?;
                        propagated_edges += 1;
                    }
                    Some(VisitState::InProgress) => {
                        // The ancestry loops back into the active stack.
                        return Err(Error::CycleDetected(parent_id));
                    }
                    None => {
                        let parent = self.graph.node(parent_id)?;
                        self.push_frame(parent, stack)?;
                    }
                }
            } else {
                // All parent edges processed: finalize the node, then
                // propagate along the edge that pushed this frame.
                visitor.visit(&frame.node)?;
                self.visited.insert(frame.node.id, VisitState::Complete);
                visited_nodes += 1;
                if let Some(finished) = stack.pop() {
                    if let Some(below) = stack.last() {
                        propagator.propagate(&finished.node, &below.node)?;
                        propagated_edges += 1;
                    }
                }
            }
        }

        tracing::debug!(
            "Traversal from id {} visited {} nodes, propagated {} edges",
            start.id,
            visited_nodes,
            propagated_edges
        );

        Ok(())
    }

    fn push_frame(&mut self, node: Node, stack: &mut Vec<Frame>) -> Result<()> {
        let parents = self.graph.parents_of(node.id)?;
        self.visited.insert(node.id, VisitState::InProgress);
        stack.push(Frame {
            node,
            parents: parents.into_iter(),
        });
        Ok(())
    }
}
