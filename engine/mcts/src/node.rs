//! MCTS tree node representation.
//!
//! Each node owns the board reached by playing `mv` from its parent. Besides the
//! usual visit/value counters it carries two pieces of auxiliary memory scoped to
//! the subtree below it: an all-moves-as-first (RAVE) table and a last-good-reply
//! map.

use std::collections::HashMap;

use engine_core::{Board, Move, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Visit and value totals for one move in a RAVE table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmafStats {
    pub visits: u32,
    pub value: f64,
}

impl AmafStats {
    /// Mean value, 0.0 if the move was never seen.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (NONE for root). Never used for lifetime control.
    pub parent: NodeId,

    /// Move that produced this node from its parent. For the root this is the
    /// opponent's last move, if the caller knows it.
    pub mv: Option<Move>,

    /// Frozen board snapshot at this node
    pub state: Board,

    /// Player whose turn it is at this node
    pub to_move: Player,

    /// Children in creation order
    pub children: Vec<NodeId>,

    /// Move -> child lookup, so expansion and LGR descents avoid linear scans
    pub child_index: HashMap<Move, NodeId>,

    /// Number of completed iterations whose selection path passed through here
    pub visits: u32,

    /// Sum of outcomes credited here, scored for the player who played `mv`
    pub value: f64,

    /// Whether `mv` ended the game
    pub is_terminal: bool,

    /// AMAF statistics for moves played anywhere below this node, scored for
    /// the player who made each move
    pub rave: HashMap<Move, AmafStats>,

    /// Opponent move -> reply that followed it in a favorable simulation
    pub good_replies: HashMap<Move, Move>,
}

impl SearchNode {
    /// Create a new root node.
    pub fn new_root(state: Board, to_move: Player, last_move: Option<Move>) -> Self {
        Self::new(NodeId::NONE, last_move, state, to_move, false)
    }

    /// Create a new child node.
    pub fn new_child(
        parent: NodeId,
        mv: Move,
        state: Board,
        to_move: Player,
        is_terminal: bool,
    ) -> Self {
        Self::new(parent, Some(mv), state, to_move, is_terminal)
    }

    fn new(
        parent: NodeId,
        mv: Option<Move>,
        state: Board,
        to_move: Player,
        is_terminal: bool,
    ) -> Self {
        Self {
            parent,
            mv,
            state,
            to_move,
            children: Vec::new(),
            child_index: HashMap::new(),
            visits: 0,
            value: 0.0,
            is_terminal,
            rave: HashMap::new(),
            good_replies: HashMap::new(),
        }
    }

    /// The player who played `mv` into this node.
    #[inline]
    pub fn mover(&self) -> Player {
        self.to_move.opponent()
    }

    /// Mean value = value / visits. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }

    /// UCB1 score of this node as seen from a parent with `parent_visits`.
    ///
    /// Unvisited nodes score `+inf` so every child is tried once before any
    /// exploitation happens.
    #[inline]
    pub fn uct_score(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        let log_parent = (parent_visits.max(1) as f64).ln();
        self.mean_value() + exploration * (log_parent / visits).sqrt()
    }

    /// RAVE statistics recorded here for `mv`.
    #[inline]
    pub fn rave_stats(&self, mv: Move) -> AmafStats {
        self.rave.get(&mv).copied().unwrap_or_default()
    }

    /// AMAF update: credit `outcome` to `mv` wherever it was played below this node.
    pub fn update_rave(&mut self, mv: Move, outcome: f64) {
        let entry = self.rave.entry(mv).or_default();
        entry.visits += 1;
        entry.value += outcome;
    }

    pub fn record_good_reply(&mut self, opponent_move: Move, reply: Move) {
        self.good_replies.insert(opponent_move, reply);
    }

    pub fn forget_good_reply(&mut self, opponent_move: Move) {
        self.good_replies.remove(&opponent_move);
    }

    /// Reply recorded for the move that led to this node, if any.
    pub fn good_reply(&self) -> Option<Move> {
        self.mv.and_then(|mv| self.good_replies.get(&mv).copied())
    }

    /// Child reached by `mv`, if it has been expanded.
    #[inline]
    pub fn child(&self, mv: Move) -> Option<NodeId> {
        self.child_index.get(&mv).copied()
    }
}
