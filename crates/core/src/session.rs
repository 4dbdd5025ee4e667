//! Session module - move budget and win/lose evaluation

use crate::types::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    moves_left: u32,
    score_goal: u32,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(moves: u32, score_goal: u32) -> Self {
        Self {
            moves_left: moves,
            score_goal,
            outcome: None,
        }
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn score_goal(&self) -> u32 {
        self.score_goal
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Spend one move for a committed swap
    pub fn consume_move(&mut self) {
        self.moves_left = self.moves_left.saturating_sub(1);
    }

    /// Decide the session once a resolution has settled.
    ///
    /// Reaching the goal wins even on the last move. Returns the outcome the
    /// first time the session ends, `None` otherwise.
    pub fn evaluate(&mut self, score: u32) -> Option<Outcome> {
        if self.outcome.is_some() {
            return None;
        }
        let outcome = if score >= self.score_goal {
            Outcome::Won
        } else if self.moves_left == 0 {
            Outcome::Lost
        } else {
            return None;
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_reached_wins() {
        let mut session = Session::new(2, 100);
        session.consume_move();
        assert_eq!(session.evaluate(50), None);
        assert_eq!(session.evaluate(100), Some(Outcome::Won));
        assert!(session.is_over());
        // Only reported once
        assert_eq!(session.evaluate(500), None);
    }

    #[test]
    fn test_out_of_moves_loses() {
        let mut session = Session::new(1, 100);
        session.consume_move();
        session.consume_move();
        assert_eq!(session.moves_left(), 0);
        assert_eq!(session.evaluate(99), Some(Outcome::Lost));
        assert_eq!(session.outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn test_last_move_can_still_win() {
        let mut session = Session::new(1, 100);
        session.consume_move();
        assert_eq!(session.evaluate(120), Some(Outcome::Won));
    }
}
