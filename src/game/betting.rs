use crate::game::error::{GameError, GameResult};
use crate::game::seat::Seat;
use serde::{Deserialize, Serialize};

/// How a betting street decides it is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosureRule {
    /// Action-count heuristic: the street closes once the number of
    /// actions taken is at least the number of non-folded seats and every
    /// non-folded seat has matched the bet or is all-in. Known to mishandle
    /// reopened action after a raise in some multi-way sequences; kept as
    /// the default for compatibility with existing tables.
    Coarse,
    /// Hardened alternative: a raise reopens the street, and every live
    /// seat that can still bet must act again before it closes.
    Strict,
}

/// Per-street betting state: the current bet floor, the minimum raise
/// increment, and the bookkeeping the closure rules need.
#[derive(Debug, Clone)]
pub struct BettingRound {
    pub last_bet: i64,
    pub min_raise: i64,
    actions_taken: usize,
    acted: [bool; 9],
    rule: ClosureRule,
}

impl BettingRound {
    pub fn new(rule: ClosureRule) -> Self {
        Self {
            last_bet: 0,
            min_raise: 0,
            actions_taken: 0,
            acted: [false; 9],
            rule,
        }
    }

    /// Pre-flop open: blinds are live, so the floor starts at the big blind.
    pub fn open_hand(&mut self, big_blind: i64) {
        self.last_bet = big_blind;
        self.min_raise = big_blind;
        self.actions_taken = 0;
        self.acted = [false; 9];
    }

    /// Post-flop streets open unbet with a fresh big-blind minimum raise.
    pub fn open_street(&mut self, big_blind: i64) {
        self.last_bet = 0;
        self.min_raise = big_blind;
        self.actions_taken = 0;
        self.acted = [false; 9];
    }

    /// Chips the seat owes to call the current bet.
    pub fn owed(&self, seat: &Seat) -> i64 {
        self.last_bet - seat.bet
    }

    pub fn validate_check(&self, seat: &Seat) -> GameResult<()> {
        if seat.bet < self.last_bet {
            return Err(GameError::CannotCheck {
                owed: self.owed(seat),
            });
        }
        Ok(())
    }

    /// Validates a raise to the absolute amount `to`. The raise must clear
    /// the floor (`last_bet + min_raise`) and fit within the seat's stack.
    pub fn validate_raise(&self, seat: &Seat, to: i64) -> GameResult<()> {
        let minimum = self.last_bet + self.min_raise;
        if to < minimum {
            return Err(GameError::RaiseTooSmall {
                minimum,
                attempted: to,
            });
        }
        let required = to - seat.bet;
        if required > seat.chips {
            return Err(GameError::NotEnoughChips {
                required,
                available: seat.chips,
            });
        }
        Ok(())
    }

    /// Records an accepted non-aggressive action (fold, check, call).
    pub fn record_action(&mut self, position: usize) {
        self.actions_taken += 1;
        self.acted[position] = true;
    }

    /// Records an accepted raise to `to`: the minimum raise becomes the size
    /// of this raise, and under the strict rule everyone else must act again.
    pub fn record_raise(&mut self, position: usize, to: i64) {
        self.min_raise = to - self.last_bet;
        self.last_bet = to;
        self.actions_taken += 1;
        self.acted = [false; 9];
        self.acted[position] = true;
    }

    /// Whether the street is closed, given the occupied seats.
    pub fn is_closed(&self, seats: &[&Seat]) -> bool {
        let live: Vec<&&Seat> = seats.iter().filter(|s| s.in_hand()).collect();
        if live.is_empty() {
            return true;
        }

        let all_matched = live
            .iter()
            .all(|s| s.bet == self.last_bet || s.is_all_in);

        match self.rule {
            ClosureRule::Coarse => self.actions_taken >= live.len() && all_matched,
            ClosureRule::Strict => {
                all_matched
                    && live
                        .iter()
                        .filter(|s| !s.is_all_in)
                        .all(|s| self.acted[s.position])
            }
        }
    }
}
