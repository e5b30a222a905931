//! Rollout (playout) policy.
//!
//! A rollout plays a fast pseudo-random game from a leaf to the end. Each ply
//! picks, in order of priority:
//! 1. the session's last good reply to the previous move, if still legal
//! 2. with N-gram enabled: a uniform random move with probability epsilon,
//!    otherwise the legal move with the best (prev -> move) win rate
//! 3. a uniform random move
//!
//! After the game the session tables learn from it (see [`RolloutPolicy::learn`]).

use engine_core::game_utils::{outcome_value, winner_from_outcome};
use engine_core::{Board, BoardError, Move, Player, RulesOracle};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::config::MctsConfig;
use crate::stats::SessionStats;

/// A finished rollout.
#[derive(Debug, Clone, PartialEq)]
pub struct Playout {
    /// Moves played, with the player who made each one
    pub moves: Vec<(Move, Player)>,
    /// Winner, or None for a draw (board exhausted or truncated)
    pub winner: Option<Player>,
}

impl Playout {
    /// Outcome scored for `perspective`: 1 win, 0 loss, 0.5 draw.
    #[inline]
    pub fn outcome(&self, perspective: Player) -> f64 {
        outcome_value(self.winner, perspective)
    }

    /// Number of (previous, next) move pairs, counting `start` as the move
    /// that preceded the first rollout ply.
    pub fn transitions(&self, start: Option<Move>) -> usize {
        match start {
            Some(_) => self.moves.len(),
            None => self.moves.len().saturating_sub(1),
        }
    }
}

/// Rollout policy for one search.
#[derive(Debug)]
pub struct RolloutPolicy<'a, R: RulesOracle> {
    rules: &'a R,
    config: &'a MctsConfig,
    /// The player the search is run for
    player: Player,
}

impl<'a, R: RulesOracle> RolloutPolicy<'a, R> {
    pub fn new(rules: &'a R, config: &'a MctsConfig, player: Player) -> Self {
        Self {
            rules,
            config,
            player,
        }
    }

    /// Play one rollout from `board` and let the session learn from it.
    ///
    /// `last_move` is the move that produced `board`, used as context for the
    /// first ply.
    pub fn run(
        &self,
        board: &Board,
        to_move: Player,
        last_move: Option<Move>,
        session: &mut SessionStats,
        rng: &mut ChaCha20Rng,
    ) -> Result<Playout, BoardError> {
        let playout = self.play(board, to_move, last_move, session, rng)?;
        self.learn(&playout, last_move, session);
        Ok(playout)
    }

    /// Play to a terminal state, an exhausted board, or the ply limit.
    pub fn play(
        &self,
        board: &Board,
        to_move: Player,
        last_move: Option<Move>,
        session: &SessionStats,
        rng: &mut ChaCha20Rng,
    ) -> Result<Playout, BoardError> {
        let mut state = board.clone();
        let mut current = to_move;
        let mut prev = last_move;
        let mut moves = Vec::new();

        loop {
            if let Some(limit) = self.config.max_rollout_plies {
                if moves.len() >= limit as usize {
                    return Ok(Playout {
                        moves,
                        winner: None,
                    });
                }
            }

            let legal = self.rules.legal_moves(&state);
            if legal.is_empty() {
                return Ok(Playout {
                    moves,
                    winner: None,
                });
            }

            let mv = self.choose_move(&legal, current, prev, session, rng);
            state.place(mv, current)?;
            moves.push((mv, current));

            if self.rules.is_terminal(&state, mv) {
                let winner = if self.rules.check_win(&state, mv, current) {
                    current
                } else {
                    current.opponent()
                };
                return Ok(Playout {
                    moves,
                    winner: Some(winner),
                });
            }

            prev = Some(mv);
            current = current.opponent();
        }
    }

    /// Pick a move for `to_move` from a non-empty `legal` list.
    pub fn choose_move(
        &self,
        legal: &[Move],
        to_move: Player,
        prev: Option<Move>,
        session: &SessionStats,
        rng: &mut ChaCha20Rng,
    ) -> Move {
        if self.config.use_last_good_reply {
            if let Some(reply) = prev.and_then(|p| session.replies.reply(to_move, p)) {
                if legal.contains(&reply) {
                    return reply;
                }
            }
        }

        if self.config.use_ngram && rng.gen::<f64>() >= self.config.epsilon {
            return Self::greedy_ngram(legal, prev, session);
        }

        legal[rng.gen_range(0..legal.len())]
    }

    /// Legal move maximizing (win rate after `prev`, move).
    fn greedy_ngram(legal: &[Move], prev: Option<Move>, session: &SessionStats) -> Move {
        let rate = |mv: Move| prev.map_or(0.0, |p| session.ngrams.win_rate(p, mv));

        let mut best = legal[0];
        let mut best_rate = rate(best);
        for &mv in &legal[1..] {
            let r = rate(mv);
            if r > best_rate || (r == best_rate && mv > best) {
                best = mv;
                best_rate = r;
            }
        }
        best
    }

    /// Update the session tables from a finished rollout.
    ///
    /// Last good reply: every ply by the winner becomes the winner's reply to
    /// the opponent move before it; every ply by the loser drops the loser's
    /// stored reply to the move before it. Draws teach nothing.
    ///
    /// N-gram: every consecutive pair is counted, and counted as a win when
    /// the search's player won.
    pub fn learn(&self, playout: &Playout, last_move: Option<Move>, session: &mut SessionStats) {
        let winner = winner_from_outcome(playout.outcome(self.player), self.player);
        let player_won = winner == Some(self.player);

        let mut prev = last_move;
        for &(mv, mover) in &playout.moves {
            if let Some(p) = prev {
                if self.config.use_last_good_reply {
                    match winner {
                        Some(w) if w == mover => session.replies.record(mover, p, mv),
                        Some(_) => session.replies.forget(mover, p),
                        None => {}
                    }
                }
                if self.config.use_ngram {
                    session.ngrams.record(p, mv, player_won);
                }
            }
            prev = Some(mv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Cell;
    use rand::SeedableRng;

    /// Three in a row horizontally.
    struct RowRules;

    impl RulesOracle for RowRules {
        fn check_win(&self, board: &Board, last_move: Move, player: Player) -> bool {
            (0..board.cols() as u16)
                .all(|col| board.cell(Move::new(last_move.row, col)) == Some(Cell::Stone(player)))
        }
    }

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    #[test]
    fn test_rollout_on_full_board_is_draw() {
        let config = MctsConfig::default();
        let policy = RolloutPolicy::new(&RowRules, &config, Player::One);
        let board = Board::from_codes(1, 2, &[1, 2]).unwrap();
        let mut session = SessionStats::new();

        let playout = policy
            .run(&board, Player::One, None, &mut session, &mut rng())
            .unwrap();

        assert!(playout.moves.is_empty());
        assert_eq!(playout.winner, None);
        assert_eq!(playout.outcome(Player::One), 0.5);
    }

    #[test]
    fn test_rollout_reaches_terminal_win() {
        let config = MctsConfig::plain_uct();
        let policy = RolloutPolicy::new(&RowRules, &config, Player::Two);
        // Only one empty cell: player two completes the row
        let board = Board::from_codes(2, 3, &[2, 0, 2, 1, 1, 3]).unwrap();
        let mut session = SessionStats::new();

        let playout = policy
            .run(&board, Player::Two, None, &mut session, &mut rng())
            .unwrap();

        assert_eq!(playout.moves, vec![(Move::new(0, 1), Player::Two)]);
        assert_eq!(playout.winner, Some(Player::Two));
        assert_eq!(playout.outcome(Player::Two), 1.0);
        assert_eq!(playout.outcome(Player::One), 0.0);
    }

    #[test]
    fn test_truncated_rollout_is_draw() {
        let config = MctsConfig::plain_uct().with_max_rollout_plies(2);
        let policy = RolloutPolicy::new(&RowRules, &config, Player::One);
        let board = Board::new(4, 4).unwrap();
        let mut session = SessionStats::new();

        let playout = policy
            .run(&board, Player::One, None, &mut session, &mut rng())
            .unwrap();

        assert_eq!(playout.moves.len(), 2);
        assert_eq!(playout.winner, None);
    }

    #[test]
    fn test_last_good_reply_takes_priority() {
        let config = MctsConfig::full();
        let policy = RolloutPolicy::new(&RowRules, &config, Player::One);
        let mut session = SessionStats::new();
        let prev = Move::new(0, 0);
        let reply = Move::new(1, 1);
        session.replies.record(Player::One, prev, reply);

        let legal = [Move::new(1, 0), Move::new(1, 1), Move::new(1, 2)];
        for _ in 0..20 {
            let mv = policy.choose_move(&legal, Player::One, Some(prev), &session, &mut rng());
            assert_eq!(mv, reply);
        }

        // Skipped once the reply is no longer legal
        let mv = policy.choose_move(&legal[..1], Player::One, Some(prev), &session, &mut rng());
        assert_eq!(mv, Move::new(1, 0));

        // Replies are stored per player
        assert_eq!(session.replies.reply(Player::Two, prev), None);
    }

    #[test]
    fn test_ngram_greedy_picks_best_rate_then_largest_move() {
        let config = MctsConfig::full().with_epsilon(0.0);
        let policy = RolloutPolicy::new(&RowRules, &config, Player::One);
        let mut session = SessionStats::new();
        let prev = Move::new(0, 0);
        let legal = [Move::new(1, 0), Move::new(1, 1), Move::new(1, 2)];

        // No statistics: all rates 0.0, the largest move wins the tie
        let mv = policy.choose_move(&legal, Player::One, Some(prev), &session, &mut rng());
        assert_eq!(mv, Move::new(1, 2));

        session.ngrams.record(prev, Move::new(1, 0), true);
        session.ngrams.record(prev, Move::new(1, 2), false);
        let mv = policy.choose_move(&legal, Player::One, Some(prev), &session, &mut rng());
        assert_eq!(mv, Move::new(1, 0));
    }

    #[test]
    fn test_learn_records_winner_and_forgets_loser() {
        let config = MctsConfig::full();
        let policy = RolloutPolicy::new(&RowRules, &config, Player::One);
        let mut session = SessionStats::new();

        let start = Move::new(2, 2);
        let (a, b, c) = (Move::new(0, 0), Move::new(1, 0), Move::new(0, 1));
        // Stale reply player two had against `a`
        session.replies.record(Player::Two, a, Move::new(2, 0));

        let playout = Playout {
            moves: vec![(a, Player::One), (b, Player::Two), (c, Player::One)],
            winner: Some(Player::One),
        };
        policy.learn(&playout, Some(start), &mut session);

        assert_eq!(session.replies.reply(Player::One, start), Some(a));
        assert_eq!(session.replies.reply(Player::One, b), Some(c));
        assert_eq!(session.replies.reply(Player::Two, a), None);

        assert_eq!(session.ngrams.total_transitions(), 3);
        assert_eq!(playout.transitions(Some(start)), 3);
        assert_eq!(session.ngrams.counts(a, b).wins, 1);
        assert_eq!(session.ngrams.counts(start, a).count, 1);
    }

    #[test]
    fn test_learn_from_draw_only_counts_transitions() {
        let config = MctsConfig::full();
        let policy = RolloutPolicy::new(&RowRules, &config, Player::Two);
        let mut session = SessionStats::new();
        let (a, b) = (Move::new(0, 0), Move::new(0, 1));

        let playout = Playout {
            moves: vec![(a, Player::One), (b, Player::Two)],
            winner: None,
        };
        policy.learn(&playout, None, &mut session);

        assert!(session.replies.is_empty());
        assert_eq!(session.ngrams.counts(a, b).count, 1);
        assert_eq!(session.ngrams.counts(a, b).wins, 0);
        assert_eq!(playout.transitions(None), 1);
    }

    #[test]
    fn test_disabled_tables_are_left_alone() {
        let config = MctsConfig::plain_uct();
        let policy = RolloutPolicy::new(&RowRules, &config, Player::One);
        let mut session = SessionStats::new();

        let playout = Playout {
            moves: vec![(Move::new(0, 0), Player::One), (Move::new(0, 1), Player::Two)],
            winner: Some(Player::One),
        };
        policy.learn(&playout, Some(Move::new(1, 1)), &mut session);

        assert!(session.replies.is_empty());
        assert!(session.ngrams.is_empty());
    }
}
