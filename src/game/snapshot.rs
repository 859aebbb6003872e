//! Per-viewer wire view of a table. Every broadcast renders one snapshot
//! per connected viewer so hole-card visibility is decided server-side.

use crate::game::deck::Card;
use crate::game::table::{GameTable, HandState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSnapshot {
    pub id: String,
    pub name: String,
    pub chips: i64,
    pub bet: i64,
    /// Two `null`s when the viewer may not see this seat's cards.
    pub hole_cards: Vec<Option<Card>>,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub position: usize,
    pub last_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub id: String,
    pub players: Vec<Option<SeatSnapshot>>,
    pub board: Vec<Card>,
    pub pot: i64,
    pub game_state: HandState,
    pub dealer_position: usize,
    /// `-1` when no seat is to act.
    pub active_position: i64,
    pub min_raise: i64,
    pub last_bet: i64,
    pub game_feed: Vec<String>,
    pub timer: i64,
    pub is_run_it_twice: bool,
}

impl GameTable {
    /// Renders the table as `viewer_id` is allowed to see it. A seat's hole
    /// cards are visible to the seat's owner, to everyone at showdown (for
    /// non-folded seats), to everyone once the seat has opted to show, and
    /// to a viewer holding an active sly-reveal grant.
    pub fn snapshot(&self, viewer_id: &str) -> TableSnapshot {
        let sly = self.sly_reveal.contains(viewer_id)
            && self
                .seats
                .iter()
                .flatten()
                .any(|s| s.id == viewer_id && s.debug_role);

        let players = self
            .seats
            .iter()
            .map(|slot| {
                slot.as_ref().map(|seat| {
                    let can_see = seat.id == viewer_id
                        || (self.state == HandState::Showdown && !seat.is_folded)
                        || self.shown_cards.contains(&seat.id)
                        || sly;
                    let hole_cards = if can_see {
                        seat.hole_cards.iter().map(|c| Some(*c)).collect()
                    } else {
                        vec![None; seat.hole_cards.len().max(2)]
                    };
                    SeatSnapshot {
                        id: seat.id.clone(),
                        name: seat.name.clone(),
                        chips: seat.chips,
                        bet: seat.bet,
                        hole_cards,
                        is_folded: seat.is_folded,
                        is_all_in: seat.is_all_in,
                        position: seat.position,
                        last_action: seat.last_action.clone(),
                    }
                })
            })
            .collect();

        TableSnapshot {
            id: self.table_id.clone(),
            players,
            board: self.board.clone(),
            pot: self.pot.total(),
            game_state: self.state,
            dealer_position: self.dealer,
            active_position: self.active.map(|p| p as i64).unwrap_or(-1),
            min_raise: self.round.min_raise,
            last_bet: self.round.last_bet,
            game_feed: self.feed.entries(),
            timer: self.timer,
            is_run_it_twice: self.run_it_twice,
        }
    }
}
