use crate::game::deck::Card;
use serde::{Deserialize, Serialize};

/// One occupied table position. Invariants: a folded seat never acts again
/// this hand; a seat is all-in exactly when betting took its stack to 0.
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: String,
    pub name: String,
    pub chips: i64,
    pub bet: i64,
    pub hole_cards: Vec<Card>,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub position: usize,
    pub last_action: String,
    /// Capability flag for the privileged reveal/rig controls. Set at seat
    /// creation; there is no identity-string gate anywhere.
    pub debug_role: bool,
}

impl Seat {
    pub fn new(id: String, name: String, chips: i64, position: usize, debug_role: bool) -> Self {
        Self {
            id,
            name,
            chips,
            bet: 0,
            hole_cards: Vec::new(),
            is_folded: false,
            is_all_in: false,
            position,
            last_action: String::new(),
            debug_role,
        }
    }

    /// Moves up to `amount` chips from the stack into the street bet,
    /// capped at the stack. Returns the amount actually paid. Taking the
    /// whole stack marks the seat all-in.
    pub fn pay(&mut self, amount: i64) -> i64 {
        let actual = amount.min(self.chips);
        self.chips -= actual;
        self.bet += actual;
        if self.chips == 0 {
            self.is_all_in = true;
        }
        actual
    }

    /// Clears per-hand transient state. Hole cards survive so a rigged
    /// assignment made before the deal is not thrown away.
    pub fn reset_for_hand(&mut self) {
        self.bet = 0;
        self.is_folded = false;
        self.is_all_in = false;
        self.last_action.clear();
    }

    /// Street change: bets and action labels reset, fold/all-in flags keep.
    pub fn reset_for_street(&mut self) {
        self.bet = 0;
        self.last_action.clear();
    }

    pub fn in_hand(&self) -> bool {
        !self.is_folded
    }

    /// Whether the turn cursor may stop on this seat: not folded, and
    /// either still holding chips or all-in (an all-in seat stays in the
    /// rotation and is skipped over at turn-advance time).
    pub fn is_eligible(&self) -> bool {
        !self.is_folded && (self.chips > 0 || self.is_all_in)
    }

    /// Whether the seat can still put chips in this street.
    pub fn can_bet(&self) -> bool {
        !self.is_folded && !self.is_all_in && self.chips > 0
    }
}

/// One validated player action. A raise's amount is the absolute "to"
/// target for the street, not a delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum SeatAction {
    Fold,
    Check,
    Call,
    Raise(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat() -> Seat {
        Seat::new("p1".to_string(), "alice".to_string(), 100, 0, false)
    }

    #[test]
    fn test_pay_is_capped_and_flags_all_in() {
        let mut s = seat();
        assert_eq!(s.pay(30), 30);
        assert_eq!(s.chips, 70);
        assert_eq!(s.bet, 30);
        assert!(!s.is_all_in);

        assert_eq!(s.pay(500), 70);
        assert_eq!(s.chips, 0);
        assert_eq!(s.bet, 100);
        assert!(s.is_all_in);
        assert!(s.is_eligible());
        assert!(!s.can_bet());
    }

    #[test]
    fn test_reset_for_street_keeps_fold() {
        let mut s = seat();
        s.is_folded = true;
        s.bet = 20;
        s.last_action = "Fold".to_string();
        s.reset_for_street();
        assert_eq!(s.bet, 0);
        assert!(s.last_action.is_empty());
        assert!(s.is_folded);
        assert!(!s.is_eligible());
    }

    #[test]
    fn test_action_wire_format() {
        let raise: SeatAction = serde_json::from_str(r#"{"type":"raise","amount":40}"#).unwrap();
        assert_eq!(raise, SeatAction::Raise(40));
        let fold: SeatAction = serde_json::from_str(r#"{"type":"fold"}"#).unwrap();
        assert_eq!(fold, SeatAction::Fold);
    }
}
