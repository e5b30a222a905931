//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Nodes are never removed; the whole
//! arena is dropped once a move has been chosen.

use engine_core::{Board, BoardError, Move, Player, RulesOracle};

use crate::config::ScoringStrategy;
use crate::node::{NodeId, SearchNode};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes
    nodes: Vec<SearchNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl SearchTree {
    /// Create a new tree rooted at `state` with `to_move` to play.
    pub fn new(state: Board, to_move: Player, last_move: Option<Move>) -> Self {
        let root_node = SearchNode::new_root(state, to_move, last_move);
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[SearchNode] {
        &self.nodes
    }

    /// Append a child to `parent_id` and return its NodeId.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        mv: Move,
        state: Board,
        to_move: Player,
        is_terminal: bool,
    ) -> NodeId {
        let child = SearchNode::new_child(parent_id, mv, state, to_move, is_terminal);
        let child_id = self.allocate(child);

        let parent = self.get_mut(parent_id);
        parent.children.push(child_id);
        parent.child_index.insert(mv, child_id);

        child_id
    }

    /// True when every legal move from this node already has a child.
    ///
    /// Legality is asked of the oracle each time rather than cached.
    pub fn is_fully_expanded<R: RulesOracle>(&self, node_id: NodeId, rules: &R) -> bool {
        let node = self.get(node_id);
        node.children.len() >= rules.legal_moves(&node.state).len()
    }

    /// Add a child for the first legal move (in oracle order) not yet tried.
    ///
    /// Returns `Ok(None)` when the node is terminal or has no untried move.
    pub fn expand<R: RulesOracle>(
        &mut self,
        node_id: NodeId,
        rules: &R,
    ) -> Result<Option<NodeId>, BoardError> {
        let node = self.get(node_id);
        if node.is_terminal {
            return Ok(None);
        }

        let untried = rules
            .legal_moves(&node.state)
            .into_iter()
            .find(|mv| !node.child_index.contains_key(mv));

        let Some(mv) = untried else {
            return Ok(None);
        };

        let player = node.to_move;
        let state = node.state.with_move(mv, player)?;
        // Terminal status is decided after the move is applied.
        let is_terminal = rules.is_terminal(&state, mv);

        Ok(Some(self.add_child(
            node_id,
            mv,
            state,
            player.opponent(),
            is_terminal,
        )))
    }

    /// Score of `child_id` as seen from its parent.
    ///
    /// `uct = mean + c * sqrt(ln(N_parent) / n)`, blended with the parent's RAVE
    /// estimate for the child's move when the strategy asks for it.
    pub fn child_score(
        &self,
        parent_id: NodeId,
        child_id: NodeId,
        exploration: f64,
        scoring: ScoringStrategy,
    ) -> f64 {
        let parent = self.get(parent_id);
        let child = self.get(child_id);
        let uct = child.uct_score(parent.visits, exploration);

        if uct.is_infinite() || !scoring.uses_rave() {
            return uct;
        }

        let rave = match child.mv {
            Some(mv) => parent.rave_stats(mv),
            None => return uct,
        };
        let beta = scoring.rave_weight(child.visits, rave.visits);
        (1.0 - beta) * uct + beta * rave.mean()
    }

    /// Select the best child of a node.
    ///
    /// Ties go to the first child created. Returns None if the node has no children.
    pub fn select_best_child(
        &self,
        node_id: NodeId,
        exploration: f64,
        scoring: ScoringStrategy,
    ) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in &self.get(node_id).children {
            let score = self.child_score(node_id, child_id, exploration, scoring);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }

    /// Child holding the last good reply to the move that led here, if expanded.
    pub fn good_reply_child(&self, node_id: NodeId) -> Option<NodeId> {
        let node = self.get(node_id);
        node.good_reply().and_then(|reply| node.child(reply))
    }

    /// Backpropagate a value from a leaf to the root.
    ///
    /// `value` is scored for the player who moved into the leaf. It is inverted
    /// (`1 - value`) at each level since players strictly alternate.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f64) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visits += 1;
            node.value += current_value;

            current_value = 1.0 - current_value;
            current_id = node.parent;
        }
    }

    /// AMAF update for one simulated continuation.
    ///
    /// Every node on the path from `leaf_id` to the root gets one RAVE update
    /// for each move played below it: the tree edges under it plus
    /// `playout` (the rollout's moves with their movers). Each move is scored
    /// for the player who made it, using that level's outcome.
    pub fn update_rave(&mut self, leaf_id: NodeId, playout: &[(Move, Player)], leaf_value: f64) {
        let mut below: Vec<(Move, Player)> = playout.to_vec();
        let mut current_id = leaf_id;
        let mut value = leaf_value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            let to_move = node.to_move;

            for &(mv, player) in &below {
                let credited = if player == to_move { 1.0 - value } else { value };
                node.update_rave(mv, credited);
            }

            if let Some(mv) = node.mv {
                below.push((mv, node.mover()));
            }

            value = 1.0 - value;
            current_id = node.parent;
        }
    }

    /// Node-scoped LGRF-1 update along the path from `leaf_id`.
    ///
    /// For each edge parent -> child on the path, the child's move is
    /// remembered as the parent's reply to the move that led to the parent when
    /// the child's mover won, and any stored reply is forgotten when they lost.
    pub fn update_good_replies(&mut self, leaf_id: NodeId, leaf_value: f64) {
        let mut current_id = leaf_id;
        let mut value = leaf_value;

        loop {
            let node = self.get(current_id);
            let parent_id = node.parent;
            if parent_id.is_none() {
                break;
            }

            if let Some(reply) = node.mv {
                let parent = self.get_mut(parent_id);
                if let Some(opponent_move) = parent.mv {
                    if value > 0.5 {
                        parent.record_good_reply(opponent_move, reply);
                    } else if value < 0.5 {
                        parent.forget_good_reply(opponent_move);
                    }
                }
            }

            value = 1.0 - value;
            current_id = parent_id;
        }
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Parents are always allocated before their children.
        let mut depths = vec![0u32; self.nodes.len()];
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[idx] = depths[node.parent.0 as usize] + 1;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
