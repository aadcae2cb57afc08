//! Search nodes and the arena that links them to their parents.

use crate::board::Board;

/// Handle to a [`SearchNode`] stored in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A board reached after `moves` slides, with a link to where it came from.
#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    moves: usize,
    parent: Option<NodeId>,
    priority: usize,
}

impl SearchNode {
    /// Priority is fixed here as `manhattan + moves`.
    pub fn new(board: Board, moves: usize, parent: Option<NodeId>) -> Self {
        let priority = board.manhattan() + moves;
        Self {
            board,
            moves,
            parent,
            priority,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn priority(&self) -> usize {
        self.priority
    }
}

/// Append-only storage for the nodes of one search.
///
/// Nodes are never removed, so every [`NodeId`] handed out stays valid and
/// parent links always point at older entries.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the root of a search.
    pub fn root(&mut self, board: Board) -> NodeId {
        self.push(SearchNode::new(board, 0, None))
    }

    /// Store `board` as a child of `parent`, one move deeper.
    pub fn child(&mut self, parent: NodeId, board: Board) -> NodeId {
        let moves = self[parent].moves + 1;
        self.push(SearchNode::new(board, moves, Some(parent)))
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Board of the node's parent, if it has one.
    pub fn parent_board(&self, id: NodeId) -> Option<&Board> {
        self[id].parent.map(|p| &self[p].board)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Boards from the root down to `id`, inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<Board> {
        let mut path = Vec::with_capacity(self[id].moves + 1);
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self[current];
            path.push(node.board.clone());
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }
}
