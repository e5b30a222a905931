//! Shared utilities for scoring two-player game outcomes.

use std::time::Duration;

use crate::board::Player;

/// Score for a finished (or abandoned) game from `perspective`'s point of view.
///
/// # Returns
/// * `1.0` if `perspective` won
/// * `0.0` if `perspective` lost
/// * `0.5` for draws (no winner)
///
/// # Example
/// ```
/// use engine_core::game_utils::outcome_value;
/// use engine_core::Player;
///
/// assert_eq!(outcome_value(Some(Player::One), Player::One), 1.0);
/// assert_eq!(outcome_value(Some(Player::One), Player::Two), 0.0);
/// assert_eq!(outcome_value(None, Player::Two), 0.5);
/// ```
#[inline]
pub fn outcome_value(winner: Option<Player>, perspective: Player) -> f64 {
    match winner {
        Some(player) if player == perspective => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

/// Winner implied by an outcome scored for `perspective`.
///
/// `1.0` means `perspective` won, `0.0` means the opponent won, anything else
/// is treated as a draw.
#[inline]
pub fn winner_from_outcome(outcome: f64, perspective: Player) -> Option<Player> {
    if outcome >= 1.0 {
        Some(perspective)
    } else if outcome <= 0.0 {
        Some(perspective.opponent())
    } else {
        None
    }
}

/// Split the remaining clock evenly over an estimate of the moves still to play.
///
/// A `moves_estimate` of zero is treated as one.
pub fn per_move_budget(remaining: Duration, moves_estimate: u32) -> Duration {
    remaining / moves_estimate.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_value() {
        assert_eq!(outcome_value(Some(Player::Two), Player::Two), 1.0);
        assert_eq!(outcome_value(Some(Player::Two), Player::One), 0.0);
        assert_eq!(outcome_value(None, Player::One), 0.5);
    }

    #[test]
    fn test_winner_from_outcome_roundtrips_outcome_value() {
        for winner in [Some(Player::One), Some(Player::Two), None] {
            let outcome = outcome_value(winner, Player::One);
            assert_eq!(winner_from_outcome(outcome, Player::One), winner);
        }
    }

    #[test]
    fn test_per_move_budget() {
        assert_eq!(
            per_move_budget(Duration::from_secs(60), 30),
            Duration::from_secs(2)
        );
        assert_eq!(
            per_move_budget(Duration::from_secs(3), 0),
            Duration::from_secs(3)
        );
    }
}
