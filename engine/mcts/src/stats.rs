//! Session-scoped statistics shared by every search of one game.
//!
//! Both tables live for the duration of a game: they are created (or reset) when
//! a new game starts and carried across that game's move decisions. They are
//! passed explicitly into each search; nothing here is global.

use std::collections::HashMap;

use engine_core::{Move, Player};

/// Last-Good-Reply table with forgetting (LGRF-1).
///
/// Keyed by the replying player and the opponent move being answered.
#[derive(Debug, Clone, Default)]
pub struct LastGoodReply {
    replies: [HashMap<Move, Move>; 2],
}

impl LastGoodReply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply `player` last used successfully against `opponent_move`.
    #[inline]
    pub fn reply(&self, player: Player, opponent_move: Move) -> Option<Move> {
        self.replies[player.index()].get(&opponent_move).copied()
    }

    pub fn record(&mut self, player: Player, opponent_move: Move, reply: Move) {
        self.replies[player.index()].insert(opponent_move, reply);
    }

    /// Drop whatever reply `player` had stored against `opponent_move`.
    pub fn forget(&mut self, player: Player, opponent_move: Move) {
        self.replies[player.index()].remove(&opponent_move);
    }

    pub fn len(&self) -> usize {
        self.replies.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for table in &mut self.replies {
            table.clear();
        }
    }
}

/// Transition counts for one (previous move, next move) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NGramCounts {
    pub count: u32,
    pub wins: u32,
}

impl NGramCounts {
    /// Empirical win rate, 0.0 if the pair was never seen.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.wins as f64 / self.count as f64
        }
    }
}

/// Move-pair (2-gram) transition statistics gathered from rollouts.
#[derive(Debug, Clone, Default)]
pub struct NGramTable {
    transitions: HashMap<(Move, Move), NGramCounts>,
    total: u64,
}

impl NGramTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self, prev: Move, next: Move) -> NGramCounts {
        self.transitions
            .get(&(prev, next))
            .copied()
            .unwrap_or_default()
    }

    #[inline]
    pub fn win_rate(&self, prev: Move, next: Move) -> f64 {
        self.counts(prev, next).win_rate()
    }

    /// Record one observed transition.
    pub fn record(&mut self, prev: Move, next: Move, won: bool) {
        let entry = self.transitions.entry((prev, next)).or_default();
        entry.count += 1;
        if won {
            entry.wins += 1;
        }
        self.total += 1;
    }

    /// Sum of all transition counts recorded so far.
    pub fn total_transitions(&self) -> u64 {
        self.total
    }

    /// Number of distinct move pairs seen.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
        self.total = 0;
    }
}

/// All statistics that persist across the move decisions of one game.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub replies: LastGoodReply,
    pub ngrams: NGramTable,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything. Call when a new game begins.
    pub fn reset(&mut self) {
        self.replies.clear();
        self.ngrams.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_is_per_player() {
        let mut lgr = LastGoodReply::new();
        let opp = Move::new(1, 1);

        lgr.record(Player::One, opp, Move::new(0, 0));
        assert_eq!(lgr.reply(Player::One, opp), Some(Move::new(0, 0)));
        assert_eq!(lgr.reply(Player::Two, opp), None);

        lgr.record(Player::One, opp, Move::new(2, 2));
        assert_eq!(lgr.reply(Player::One, opp), Some(Move::new(2, 2)));
        assert_eq!(lgr.len(), 1);
    }

    #[test]
    fn test_forget_removes_entry() {
        let mut lgr = LastGoodReply::new();
        let opp = Move::new(0, 1);
        lgr.record(Player::Two, opp, Move::new(1, 0));
        lgr.forget(Player::Two, opp);
        assert!(lgr.is_empty());

        // Forgetting a missing entry is a no-op
        lgr.forget(Player::Two, opp);
        assert!(lgr.is_empty());
    }

    #[test]
    fn test_ngram_counts_and_win_rate() {
        let mut table = NGramTable::new();
        let (a, b) = (Move::new(0, 0), Move::new(0, 1));

        assert_eq!(table.win_rate(a, b), 0.0);
        table.record(a, b, true);
        table.record(a, b, false);
        table.record(b, a, false);

        assert_eq!(table.counts(a, b), NGramCounts { count: 2, wins: 1 });
        assert!((table.win_rate(a, b) - 0.5).abs() < 1e-12);
        assert_eq!(table.total_transitions(), 3);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_session_reset_clears_both_tables() {
        let mut session = SessionStats::new();
        session
            .replies
            .record(Player::One, Move::new(0, 0), Move::new(1, 1));
        session.ngrams.record(Move::new(0, 0), Move::new(1, 1), true);

        session.reset();

        assert!(session.replies.is_empty());
        assert!(session.ngrams.is_empty());
        assert_eq!(session.ngrams.total_transitions(), 0);
    }
}
