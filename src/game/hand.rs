//! Adapter over the external hand evaluator: 7 cards in, a comparable
//! ranked-hand value and a human-readable descriptor out.

use crate::game::deck::Card;
use rs_poker::core::{Hand, Rank as EvalRank, Rankable};

#[derive(Debug, Clone)]
pub struct HandRank {
    pub rank_value: i32,
    /// Sub-rank within the hand category so AAQQ beats AA66 inside TwoPair.
    sub_rank: u32,
    pub description: String,
}

impl HandRank {
    fn from_eval(rank: &EvalRank) -> Self {
        let (rank_value, sub_rank, description) = match rank {
            EvalRank::HighCard(v) => (0, *v, "High Card"),
            EvalRank::OnePair(v) => (1, *v, "Pair"),
            EvalRank::TwoPair(v) => (2, *v, "Two Pair"),
            EvalRank::ThreeOfAKind(v) => (3, *v, "Three of a Kind"),
            EvalRank::Straight(v) => (4, *v, "Straight"),
            EvalRank::Flush(v) => (5, *v, "Flush"),
            EvalRank::FullHouse(v) => (6, *v, "Full House"),
            EvalRank::FourOfAKind(v) => (7, *v, "Four of a Kind"),
            EvalRank::StraightFlush(v) => (8, *v, "Straight Flush"),
        };
        Self {
            rank_value,
            sub_rank,
            description: description.to_string(),
        }
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.rank_value == other.rank_value && self.sub_rank == other.sub_rank
    }
}

impl Eq for HandRank {}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank_value
            .cmp(&other.rank_value)
            .then_with(|| self.sub_rank.cmp(&other.sub_rank))
    }
}

fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![vec![]];
    }
    if cards.len() < k {
        return vec![];
    }
    let mut result = Vec::new();
    for (i, card) in cards.iter().enumerate() {
        for mut rest in combinations(&cards[i + 1..], k - 1) {
            let mut combo = vec![*card];
            combo.append(&mut rest);
            result.push(combo);
        }
    }
    result
}

/// Best 5-card hand out of hole cards plus board.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> Option<HandRank> {
    let mut all_cards = Vec::with_capacity(hole_cards.len() + board.len());
    all_cards.extend_from_slice(hole_cards);
    all_cards.extend_from_slice(board);

    combinations(&all_cards, 5)
        .into_iter()
        .map(|five| {
            let eval_cards: Vec<rs_poker::core::Card> =
                five.iter().map(|c| c.to_eval()).collect();
            Hand::new_with_cards(eval_cards).rank()
        })
        .max()
        .map(|best| HandRank::from_eval(&best))
}

/// The maximal subset: every seat index whose hand ties the best rank.
pub fn pick_winners(hands: &[(usize, HandRank)]) -> Vec<usize> {
    let best = match hands.iter().map(|(_, rank)| rank).max() {
        Some(best) => best.clone(),
        None => return vec![],
    };
    hands
        .iter()
        .filter(|(_, rank)| *rank == best)
        .map(|(idx, _)| *idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(tokens: &[&str]) -> Vec<Card> {
        tokens
            .iter()
            .map(|t| Card::from_token(t).expect("valid token"))
            .collect()
    }

    #[test]
    fn test_quads_beat_full_house() {
        let board = cards(&["As", "Ad", "Ks", "2c", "3h"]);
        let quads = evaluate_hand(&cards(&["Ac", "Ah"]), &board).unwrap();
        let boat = evaluate_hand(&cards(&["Kh", "Kd"]), &board).unwrap();

        assert_eq!(quads.description, "Four of a Kind");
        assert_eq!(boat.description, "Full House");
        assert!(quads > boat);
    }

    #[test]
    fn test_kicker_breaks_ties_within_category() {
        let board = cards(&["As", "Ad", "7s", "2c", "3h"]);
        let big_kicker = evaluate_hand(&cards(&["Kh", "9d"]), &board).unwrap();
        let small_kicker = evaluate_hand(&cards(&["Qh", "9c"]), &board).unwrap();
        assert!(big_kicker > small_kicker);
    }

    #[test]
    fn test_pick_winners_returns_all_tied() {
        let board = cards(&["As", "Ad", "Ks", "Kd", "3h"]);
        // Both hole pairs play the board's two pair with the same kicker
        let h0 = evaluate_hand(&cards(&["8h", "7c"]), &board).unwrap();
        let h1 = evaluate_hand(&cards(&["8d", "7s"]), &board).unwrap();
        let h2 = evaluate_hand(&cards(&["2c", "4d"]), &board).unwrap();

        let winners = pick_winners(&[(0, h0), (1, h1), (2, h2)]);
        assert_eq!(winners, vec![0, 1]);
    }

    #[test]
    fn test_pick_winners_empty() {
        assert!(pick_winners(&[]).is_empty());
    }

    #[test]
    fn test_incomplete_board_yields_nothing() {
        let board = cards(&["As", "Ad"]);
        assert!(evaluate_hand(&cards(&["Kh"]), &board).is_none());
    }
}
