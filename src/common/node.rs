use super::direction::delta;
use super::Cell;

#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
    pub(crate) position: Cell,
    pub(crate) g_cost: usize,
    pub(crate) h_cost: usize,
    pub(crate) f_cost: usize,
    pub(crate) parent: Option<usize>, // index of the generating node in the arena
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        // Costs are not part of a node's identity.
        self.position == other.position
    }
}

impl Eq for SearchNode {}

// Ordered by f, then by the order nodes were pushed, so the first minimum wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct OpenEntry {
    pub(crate) f_cost: usize,
    pub(crate) sequence: usize,
    pub(crate) index: usize,
}

/// Every node generated during one search. Parents are arena indices.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub(crate) fn push(&mut self, node: SearchNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn get(&self, index: usize) -> &SearchNode {
        &self.nodes[index]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Delta of the step that reached `index`, `None` for the root.
    pub(crate) fn incoming_delta(&self, index: usize) -> Option<(isize, isize)> {
        let node = &self.nodes[index];
        node.parent
            .map(|parent| delta(self.nodes[parent].position, node.position))
    }

    /// Positions from the root to `index`.
    pub(crate) fn trace(&self, mut index: usize) -> Vec<Cell> {
        let mut path = vec![self.nodes[index].position];
        while let Some(parent) = self.nodes[index].parent {
            path.push(self.nodes[parent].position);
            index = parent;
        }
        path.reverse();
        path
    }
}
