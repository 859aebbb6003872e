use crate::game::betting::{BettingRound, ClosureRule};
use crate::game::deck::{Card, Deck, RigPlan};
use crate::game::error::{GameError, GameResult};
use crate::game::feed::EventFeed;
use crate::game::hand::{evaluate_hand, pick_winners, HandRank};
use crate::game::pot::Pot;
use crate::game::seat::{Seat, SeatAction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_SEATS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandState {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

/// Per-table settings, sourced from `Config` at table creation.
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub small_blind: i64,
    pub big_blind: i64,
    pub turn_time_secs: i64,
    pub closure_rule: ClosureRule,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            small_blind: 10,
            big_blind: 20,
            turn_time_secs: 30,
            closure_rule: ClosureRule::Coarse,
        }
    }
}

/// One live table: seats, cards, bets, turn order and payouts for a single
/// hand at a time. All mutations go through the public operations below;
/// `Ok` from any of them means state changed and a snapshot should be
/// broadcast, `Err` means the operation was rejected with no state change.
#[derive(Debug)]
pub struct GameTable {
    pub table_id: String,
    pub seats: [Option<Seat>; MAX_SEATS],
    pub board: Vec<Card>,
    pub deck: Deck,
    pub pot: Pot,
    pub state: HandState,
    pub dealer: usize,
    pub active: Option<usize>,
    pub round: BettingRound,
    pub timer: i64,
    /// Seconds until the next hand auto-starts after a showdown or early
    /// end. Driven by `tick`.
    pub restart_in: Option<u64>,
    pub feed: EventFeed,
    pub shown_cards: HashSet<String>,
    pub rit_requests: HashSet<String>,
    pub run_it_twice: bool,
    pub sly_reveal: HashSet<String>,
    pub next_hand_rigged: bool,
    small_blind: i64,
    big_blind: i64,
    turn_time: i64,
}

impl GameTable {
    pub fn new(table_id: String, opts: TableOptions) -> Self {
        Self {
            table_id,
            seats: Default::default(),
            board: Vec::new(),
            deck: Deck::new(),
            pot: Pot::new(),
            state: HandState::Waiting,
            dealer: 0,
            active: None,
            round: BettingRound::new(opts.closure_rule),
            timer: opts.turn_time_secs,
            restart_in: None,
            feed: EventFeed::new(),
            shown_cards: HashSet::new(),
            rit_requests: HashSet::new(),
            run_it_twice: false,
            sly_reveal: HashSet::new(),
            next_hand_rigged: false,
            small_blind: opts.small_blind,
            big_blind: opts.big_blind,
            turn_time: opts.turn_time_secs,
        }
    }

    // ==================== Seating ====================

    pub fn add_player(
        &mut self,
        id: String,
        name: String,
        chips: i64,
        position: usize,
        debug_role: bool,
    ) -> GameResult<()> {
        if position >= MAX_SEATS {
            return Err(GameError::InvalidPosition { position });
        }
        if self.seats[position].is_some() {
            return Err(GameError::PositionTaken { position });
        }
        tracing::info!(
            "table {}: {} takes seat {} with {} chips",
            self.table_id,
            name,
            position,
            chips
        );
        self.feed
            .push(format!("{} joined the table at position {}", name, position));
        self.seats[position] = Some(Seat::new(id, name, chips, position, debug_role));
        Ok(())
    }

    /// Clears the seat of a departing player. Returns whether anything
    /// changed. If the hand can no longer continue it is force-ended; if
    /// the leaver was the active seat the turn advances.
    pub fn remove_player(&mut self, seat_id: &str) -> bool {
        let Some(pos) = self.position_of(seat_id) else {
            return false;
        };
        if let Some(seat) = self.seats[pos].take() {
            self.feed.push(format!("{} left the table", seat.name));
        }
        let was_active = self.active == Some(pos);

        let in_hand = self.in_hand_positions().len();
        if in_hand < 2 && self.state != HandState::Waiting {
            self.end_hand_early();
        } else if was_active {
            self.next_turn();
        }
        true
    }

    pub fn position_of(&self, seat_id: &str) -> Option<usize> {
        self.seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.id == seat_id))
    }

    // ==================== Hand lifecycle ====================

    pub fn start_new_hand(&mut self) -> GameResult<()> {
        if !matches!(self.state, HandState::Waiting | HandState::Showdown) {
            return Err(GameError::HandInProgress);
        }
        self.restart_in = None;

        let chip_holders = self
            .seats
            .iter()
            .flatten()
            .filter(|s| s.chips > 0)
            .count();
        if chip_holders < 2 {
            if self.state != HandState::Waiting {
                self.state = HandState::Waiting;
                self.feed.push("Waiting for more players...");
            }
            return Ok(());
        }

        self.state = HandState::PreFlop;
        self.deck = Deck::new();
        self.deck.shuffle();

        for seat in self.seats.iter_mut().flatten() {
            seat.hole_cards.clear();
        }

        // One-shot deterministic override, consumed the instant it applies
        if self.next_hand_rigged {
            self.apply_rig();
            self.next_hand_rigged = false;
        }

        self.board.clear();
        self.pot.reset();
        self.round.open_hand(self.big_blind);
        self.shown_cards.clear();
        self.rit_requests.clear();
        self.run_it_twice = false;

        // Bust seats leave before the deal
        for slot in self.seats.iter_mut() {
            if slot.as_ref().is_some_and(|s| s.chips <= 0) {
                if let Some(seat) = slot.take() {
                    self.feed
                        .push(format!("{} was stacked and left the table", seat.name));
                }
            }
        }

        for seat in self.seats.iter_mut().flatten() {
            if seat.hole_cards.is_empty() {
                seat.hole_cards = self.deck.draw_n(2);
            }
            seat.reset_for_hand();
        }

        // Dealer button advances one position, skipping nothing
        self.dealer = (self.dealer + 1) % MAX_SEATS;

        let Some(sb_pos) = self.next_eligible_seat(self.dealer) else {
            tracing::warn!("table {}: no eligible small blind seat", self.table_id);
            self.state = HandState::Waiting;
            return Ok(());
        };
        let Some(bb_pos) = self.next_eligible_seat(sb_pos) else {
            tracing::warn!("table {}: no eligible big blind seat", self.table_id);
            self.state = HandState::Waiting;
            return Ok(());
        };

        self.post_blind(sb_pos, self.small_blind, "Small Blind");
        self.post_blind(bb_pos, self.big_blind, "Big Blind");

        self.active = self.next_bettable_seat(bb_pos);
        self.timer = self.turn_time;
        self.feed.push("New hand started.");
        tracing::info!(
            "table {}: new hand, dealer={}, sb={}, bb={}, active={:?}",
            self.table_id,
            self.dealer,
            sb_pos,
            bb_pos,
            self.active
        );

        // Both blind posters may be all-in from posting alone. Nobody can
        // act, so settle immediately instead of parking the hand.
        if self.active.is_none() {
            self.deal_to_finish();
        }
        Ok(())
    }

    fn post_blind(&mut self, pos: usize, amount: i64, label: &str) {
        if let Some(seat) = self.seats[pos].as_mut() {
            let paid = seat.pay(amount);
            seat.last_action = label.to_string();
            self.pot.add(paid);
        }
    }

    fn apply_rig(&mut self) {
        let Some(rigged_pos) = self
            .seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.debug_role))
        else {
            return;
        };

        let plan = RigPlan::quads_over_kings();
        self.deck.remove_all(&plan.all_cards());

        if let Some(seat) = self.seats[rigged_pos].as_mut() {
            seat.hole_cards = plan.rigged_hole.to_vec();
        }

        // Power pairs go out to occupied seats in seat order; a dry pool
        // falls back to the deck. Empty seats consume nothing.
        let mut pool = plan.power_pool.into_iter();
        for pos in 0..MAX_SEATS {
            if pos == rigged_pos || self.seats[pos].is_none() {
                continue;
            }
            let c1 = pool.next().or_else(|| self.deck.draw());
            let c2 = pool.next().or_else(|| self.deck.draw());
            if let Some(seat) = self.seats[pos].as_mut() {
                if let (Some(c1), Some(c2)) = (c1, c2) {
                    seat.hole_cards = vec![c1, c2];
                }
            }
        }

        // Board draws during flop/turn/river must yield the plan in order
        self.deck.stack_top(&plan.board);
        self.feed.push("The table is set.");
    }

    // ==================== Actions ====================

    pub fn handle_action(&mut self, seat_id: &str, action: SeatAction) -> GameResult<()> {
        if matches!(self.state, HandState::Waiting | HandState::Showdown) {
            return Err(GameError::NoHandInProgress);
        }
        let pos = self.active.ok_or(GameError::NotYourTurn)?;
        {
            let seat = self.seats[pos].as_ref().ok_or(GameError::NotYourTurn)?;
            if seat.id != seat_id {
                return Err(GameError::NotYourTurn);
            }
        }

        match action {
            SeatAction::Fold => {
                if let Some(seat) = self.seats[pos].as_mut() {
                    seat.is_folded = true;
                    seat.last_action = "Fold".to_string();
                    let name = seat.name.clone();
                    self.feed.push(format!("{} folds", name));
                }
                self.round.record_action(pos);
            }
            SeatAction::Check => {
                {
                    let seat = self.seats[pos].as_ref().ok_or(GameError::NotYourTurn)?;
                    self.round.validate_check(seat)?;
                }
                if let Some(seat) = self.seats[pos].as_mut() {
                    seat.last_action = "Check".to_string();
                    let name = seat.name.clone();
                    self.feed.push(format!("{} checks", name));
                }
                self.round.record_action(pos);
            }
            SeatAction::Call => {
                if let Some(seat) = self.seats[pos].as_mut() {
                    let owed = self.round.last_bet - seat.bet;
                    let paid = seat.pay(owed);
                    self.pot.add(paid);
                    seat.last_action = "Call".to_string();
                    let name = seat.name.clone();
                    self.feed.push(format!("{} calls", name));
                }
                self.round.record_action(pos);
            }
            SeatAction::Raise(to) => {
                {
                    let seat = self.seats[pos].as_ref().ok_or(GameError::NotYourTurn)?;
                    self.round.validate_raise(seat, to)?;
                }
                if let Some(seat) = self.seats[pos].as_mut() {
                    let paid = seat.pay(to - seat.bet);
                    self.pot.add(paid);
                    seat.last_action = format!("Raise to {}", to);
                    let name = seat.name.clone();
                    self.feed.push(format!("{} raises to {}", name, to));
                }
                self.round.record_raise(pos, to);
            }
        }

        self.next_turn();
        Ok(())
    }

    // ==================== Turn order ====================

    /// Turn-cursor rule: scan circularly from `from + 1`, skipping any index
    /// that is empty, folded, or has zero chips without being all-in. At
    /// most one full ring; `None` means no eligible seat exists.
    pub fn next_eligible_seat(&self, from: usize) -> Option<usize> {
        for step in 1..=MAX_SEATS {
            let pos = (from + step) % MAX_SEATS;
            if self.seats[pos].as_ref().is_some_and(|s| s.is_eligible()) {
                return Some(pos);
            }
        }
        None
    }

    /// Like `next_eligible_seat`, but also skips all-in seats: the next
    /// seat that can actually put chips in. The active seat always
    /// satisfies this.
    fn next_bettable_seat(&self, from: usize) -> Option<usize> {
        for step in 1..=MAX_SEATS {
            let pos = (from + step) % MAX_SEATS;
            if self.seats[pos].as_ref().is_some_and(|s| s.can_bet()) {
                return Some(pos);
            }
        }
        None
    }

    fn in_hand_positions(&self) -> Vec<usize> {
        (0..MAX_SEATS)
            .filter(|&i| self.seats[i].as_ref().is_some_and(|s| s.in_hand()))
            .collect()
    }

    fn next_turn(&mut self) {
        if self.in_hand_positions().len() == 1 {
            self.end_hand_early();
            return;
        }

        let closed = {
            let seats: Vec<&Seat> = self.seats.iter().filter_map(|s| s.as_ref()).collect();
            self.round.is_closed(&seats)
        };

        if closed {
            self.next_street();
        } else {
            let from = self.active.unwrap_or(self.dealer);
            match self.next_bettable_seat(from) {
                Some(next) => self.active = Some(next),
                // Nobody left who can bet: run the board out
                None => self.next_street(),
            }
        }

        if self.state != HandState::Showdown {
            self.timer = self.turn_time;
        }
    }

    fn next_street(&mut self) {
        for seat in self.seats.iter_mut().flatten() {
            seat.reset_for_street();
        }
        self.round.open_street(self.big_blind);

        let with_chips = self
            .seats
            .iter()
            .flatten()
            .filter(|s| s.in_hand() && s.chips > 0)
            .count();
        if with_chips < 2 {
            self.deal_to_finish();
            return;
        }

        match self.state {
            HandState::PreFlop => {
                let flop = self.deck.draw_n(3);
                self.board.extend(flop);
                self.state = HandState::Flop;
                self.active = self.next_bettable_seat(self.dealer);
            }
            HandState::Flop => {
                self.board.extend(self.deck.draw_n(1));
                self.state = HandState::Turn;
                self.active = self.next_bettable_seat(self.dealer);
            }
            HandState::Turn => {
                self.board.extend(self.deck.draw_n(1));
                self.state = HandState::River;
                self.active = self.next_bettable_seat(self.dealer);
            }
            HandState::River => {
                self.showdown();
            }
            _ => {}
        }
    }

    /// Everyone is all-in (or only one seat can still bet): deal the
    /// remaining board cards immediately and go straight to showdown.
    fn deal_to_finish(&mut self) {
        while self.board.len() < 5 {
            match self.deck.draw() {
                Some(card) => self.board.push(card),
                None => break,
            }
        }
        self.showdown();
    }

    // ==================== Settlement ====================

    fn showdown(&mut self) {
        if self.state == HandState::Showdown {
            return;
        }
        self.state = HandState::Showdown;
        self.active = None;
        self.timer = 0;

        let contenders = self.in_hand_positions();
        if contenders.is_empty() {
            self.pot.take();
            self.restart_in = Some(5);
            return;
        }

        let mut hands: Vec<(usize, HandRank)> = Vec::new();
        for pos in contenders {
            if let Some(seat) = self.seats[pos].as_ref() {
                if let Some(rank) = evaluate_hand(&seat.hole_cards, &self.board) {
                    hands.push((pos, rank));
                }
            }
        }

        let winners = pick_winners(&hands);
        // Flat split: floor division, remainder lost. No side pots.
        let share = self.pot.share(winners.len());
        for &pos in &winners {
            if let Some(seat) = self.seats[pos].as_mut() {
                seat.chips += share;
                let name = seat.name.clone();
                let descr = hands
                    .iter()
                    .find(|(p, _)| *p == pos)
                    .map(|(_, rank)| rank.description.clone())
                    .unwrap_or_default();
                self.feed.push(format!("{} wins {} with {}", name, share, descr));
            }
        }
        self.pot.take();
        self.restart_in = Some(5);
        tracing::info!(
            "table {}: showdown complete, winners={:?}, share={}",
            self.table_id,
            winners,
            share
        );
    }

    /// Everyone but one seat folded or left: the remainder takes the pot
    /// without a card comparison.
    fn end_hand_early(&mut self) {
        if self.state == HandState::Showdown {
            return;
        }
        let winner = self
            .seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.in_hand()));
        if let Some(pos) = winner {
            if self.pot.total() > 0 {
                let amount = self.pot.take();
                if let Some(seat) = self.seats[pos].as_mut() {
                    seat.chips += amount;
                    let name = seat.name.clone();
                    self.feed
                        .push(format!("{} wins {} (others folded/left)", name, amount));
                }
            }
        }
        self.pot.reset();
        self.state = HandState::Showdown;
        self.active = None;
        self.timer = 0;
        self.restart_in = Some(3);
    }

    // ==================== Turn clock ====================

    /// One-second tick: counts down the active seat's time budget and the
    /// post-showdown restart delay. Returns whether table state changed in
    /// a way viewers need to see.
    pub fn tick(&mut self) -> bool {
        if let Some(rest) = self.restart_in {
            if rest <= 1 {
                self.restart_in = None;
                return self.start_new_hand().is_ok();
            }
            self.restart_in = Some(rest - 1);
            return false;
        }

        if self.active.is_none() || matches!(self.state, HandState::Waiting | HandState::Showdown)
        {
            return false;
        }

        self.timer -= 1;
        if self.timer > 0 {
            return false;
        }

        // Time's up: fold if the seat owes chips, otherwise check
        if let Some(pos) = self.active {
            if let Some(seat) = self.seats[pos].as_ref() {
                let seat_id = seat.id.clone();
                let action = if seat.bet < self.round.last_bet {
                    SeatAction::Fold
                } else {
                    SeatAction::Check
                };
                tracing::info!(
                    "table {}: seat {} timed out, auto {:?}",
                    self.table_id,
                    pos,
                    action
                );
                match self.handle_action(&seat_id, action) {
                    Ok(()) => return true,
                    Err(err) => {
                        tracing::warn!("table {}: timeout auto-action rejected: {}", self.table_id, err)
                    }
                }
            }
        }
        false
    }

    // ==================== Showdown-phase options ====================

    /// Opt in to revealing hole cards to the table, showdown only.
    pub fn show_cards(&mut self, seat_id: &str) -> GameResult<()> {
        if self.state != HandState::Showdown {
            return Err(GameError::NotInShowdown);
        }
        let pos = self.position_of(seat_id).ok_or(GameError::NotAtTable)?;
        self.shown_cards.insert(seat_id.to_string());
        if let Some(seat) = self.seats[pos].as_ref() {
            let name = seat.name.clone();
            self.feed.push(format!("{} shows their cards", name));
        }
        Ok(())
    }

    /// Run-it-twice bookkeeping: heads-up before the river, every remaining
    /// seat must request it. The agreement only sets the flag; settlement
    /// stays single-board.
    pub fn request_run_it_twice(&mut self, seat_id: &str) -> GameResult<()> {
        let pos = self.position_of(seat_id).ok_or(GameError::NotAtTable)?;
        let in_hand = self.in_hand_positions();
        let before_river = matches!(
            self.state,
            HandState::PreFlop | HandState::Flop | HandState::Turn
        );
        if in_hand.len() != 2 || !before_river {
            return Err(GameError::RunItTwiceUnavailable);
        }

        self.rit_requests.insert(seat_id.to_string());
        if let Some(seat) = self.seats[pos].as_ref() {
            let name = seat.name.clone();
            self.feed.push(format!("{} wants to run it twice", name));
        }

        let all_agreed = in_hand.iter().all(|&p| {
            self.seats[p]
                .as_ref()
                .is_some_and(|s| self.rit_requests.contains(&s.id))
        });
        if all_agreed && !self.run_it_twice {
            self.run_it_twice = true;
            self.feed.push("Both players agreed! Running it twice.");
        }
        Ok(())
    }

    // ==================== Privileged controls ====================

    fn require_debug_role(&self, seat_id: &str) -> GameResult<usize> {
        let pos = self.position_of(seat_id).ok_or(GameError::NotAtTable)?;
        let privileged = self.seats[pos]
            .as_ref()
            .is_some_and(|s| s.debug_role);
        if !privileged {
            return Err(GameError::NotPrivileged);
        }
        Ok(pos)
    }

    /// Toggles the viewer's all-cards reveal grant.
    pub fn toggle_sly_reveal(&mut self, seat_id: &str) -> GameResult<()> {
        self.require_debug_role(seat_id)?;
        if !self.sly_reveal.remove(seat_id) {
            self.sly_reveal.insert(seat_id.to_string());
        }
        Ok(())
    }

    /// Arms the one-shot deck rig for the next hand.
    pub fn rig_next_hand(&mut self, seat_id: &str) -> GameResult<()> {
        let pos = self.require_debug_role(seat_id)?;
        self.next_hand_rigged = true;
        if let Some(seat) = self.seats[pos].as_ref() {
            let name = seat.name.clone();
            self.feed.push(format!("{} is feeling lucky...", name));
        }
        Ok(())
    }

    /// Whether any seat is occupied.
    pub fn is_empty(&self) -> bool {
        self.seats.iter().all(|s| s.is_none())
    }

    /// Conserved chip total: stacks plus pot (street bets are already
    /// mirrored into the pot).
    pub fn chips_in_play(&self) -> i64 {
        self.seats.iter().flatten().map(|s| s.chips).sum::<i64>() + self.pot.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GameTable {
        GameTable::new("t1".to_string(), TableOptions::default())
    }

    fn seat_two(table: &mut GameTable) {
        table
            .add_player("a".to_string(), "alice".to_string(), 1000, 0, false)
            .unwrap();
        table
            .add_player("b".to_string(), "bob".to_string(), 1000, 1, false)
            .unwrap();
    }

    #[test]
    fn test_join_conflicts() {
        let mut t = table();
        t.add_player("a".to_string(), "alice".to_string(), 1000, 3, false)
            .unwrap();
        assert_eq!(
            t.add_player("b".to_string(), "bob".to_string(), 1000, 3, false),
            Err(GameError::PositionTaken { position: 3 })
        );
        assert_eq!(
            t.add_player("b".to_string(), "bob".to_string(), 1000, 9, false),
            Err(GameError::InvalidPosition { position: 9 })
        );
    }

    #[test]
    fn test_start_requires_two_chip_holders() {
        let mut t = table();
        t.add_player("a".to_string(), "alice".to_string(), 1000, 0, false)
            .unwrap();
        t.start_new_hand().unwrap();
        assert_eq!(t.state, HandState::Waiting);

        t.add_player("b".to_string(), "bob".to_string(), 1000, 1, false)
            .unwrap();
        t.start_new_hand().unwrap();
        assert_eq!(t.state, HandState::PreFlop);
    }

    #[test]
    fn test_start_rejected_mid_hand() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();
        assert_eq!(t.start_new_hand(), Err(GameError::HandInProgress));
    }

    #[test]
    fn test_blind_posting() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();

        assert_eq!(t.pot.total(), 30);
        assert_eq!(t.round.last_bet, 20);
        let bets: Vec<i64> = t.seats.iter().flatten().map(|s| s.bet).collect();
        let mut sorted = bets.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![10, 20]);
        assert!(t.active.is_some());
        assert_eq!(t.timer, 30);
    }

    #[test]
    fn test_action_rejected_out_of_turn() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();

        let active = t.active.unwrap();
        let idle_id = t
            .seats
            .iter()
            .flatten()
            .find(|s| s.position != active)
            .map(|s| s.id.clone())
            .unwrap();
        assert_eq!(
            t.handle_action(&idle_id, SeatAction::Check),
            Err(GameError::NotYourTurn)
        );
    }

    #[test]
    fn test_action_rejected_outside_hand() {
        let mut t = table();
        seat_two(&mut t);
        assert_eq!(
            t.handle_action("a", SeatAction::Fold),
            Err(GameError::NoHandInProgress)
        );
    }

    #[test]
    fn test_fold_ends_heads_up_hand() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();

        let active = t.active.unwrap();
        let active_id = t.seats[active].as_ref().unwrap().id.clone();
        t.handle_action(&active_id, SeatAction::Fold).unwrap();

        assert_eq!(t.state, HandState::Showdown);
        assert_eq!(t.pot.total(), 0);
        assert_eq!(t.restart_in, Some(3));
        assert_eq!(t.chips_in_play(), 2000);
    }

    #[test]
    fn test_disconnect_mid_hand_awards_pot() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();

        assert!(t.remove_player("a"));
        assert_eq!(t.state, HandState::Showdown);
        let bob = t.seats[1].as_ref().unwrap();
        // bob keeps his stack plus the whole pot (alice's blind included)
        assert_eq!(bob.chips + bob.bet, 1030);
    }

    #[test]
    fn test_restart_countdown_starts_next_hand() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();

        let active = t.active.unwrap();
        let active_id = t.seats[active].as_ref().unwrap().id.clone();
        t.handle_action(&active_id, SeatAction::Fold).unwrap();
        assert_eq!(t.restart_in, Some(3));

        assert!(!t.tick());
        assert!(!t.tick());
        assert!(t.tick());
        assert_eq!(t.state, HandState::PreFlop);
    }

    #[test]
    fn test_timer_expiry_auto_folds_when_owing() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();

        // active pre-flop seat owes the big blind, so expiry folds it
        for _ in 0..29 {
            assert!(!t.tick());
        }
        assert!(t.tick());
        assert_eq!(t.state, HandState::Showdown);
    }

    #[test]
    fn test_all_in_blinds_settle_without_action() {
        let mut t = table();
        t.add_player("a".to_string(), "alice".to_string(), 10, 0, false)
            .unwrap();
        t.add_player("b".to_string(), "bob".to_string(), 15, 1, false)
            .unwrap();
        t.start_new_hand().unwrap();

        // posting the blinds put both seats all-in; with nobody able to
        // act the board runs out and the hand settles on its own
        assert!(t.seats.iter().flatten().all(|s| s.is_all_in));
        assert_eq!(t.active, None);
        assert_eq!(t.state, HandState::Showdown);
        assert_eq!(t.board.len(), 5);
        assert_eq!(t.pot.total(), 0);
        assert_eq!(t.restart_in, Some(5));
    }

    #[test]
    fn test_rig_pairs_skip_empty_seats() {
        let mut t = table();
        t.add_player("m".to_string(), "mona".to_string(), 1000, 0, true)
            .unwrap();
        t.add_player("a".to_string(), "alice".to_string(), 1000, 8, false)
            .unwrap();
        t.rig_next_hand("m").unwrap();
        t.start_new_hand().unwrap();

        // the lone opponent gets the first power pair no matter how far
        // from the rigged seat they sit
        let alice = t.seats[8].as_ref().unwrap();
        let tokens: Vec<String> = alice.hole_cards.iter().map(|c| c.token()).collect();
        assert_eq!(tokens, vec!["Kh", "Kd"]);

        // empty seats draw nothing: 52 minus the 17 planned cards, plus
        // the 5 board cards stacked back on top
        assert_eq!(t.deck.remaining(), 40);
    }

    #[test]
    fn test_privileged_controls_gated() {
        let mut t = table();
        t.add_player("a".to_string(), "alice".to_string(), 1000, 0, false)
            .unwrap();
        t.add_player("m".to_string(), "mona".to_string(), 1000, 1, true)
            .unwrap();

        assert_eq!(t.rig_next_hand("a"), Err(GameError::NotPrivileged));
        assert_eq!(t.toggle_sly_reveal("a"), Err(GameError::NotPrivileged));
        assert_eq!(t.rig_next_hand("x"), Err(GameError::NotAtTable));

        t.rig_next_hand("m").unwrap();
        assert!(t.next_hand_rigged);
        t.toggle_sly_reveal("m").unwrap();
        assert!(t.sly_reveal.contains("m"));
        t.toggle_sly_reveal("m").unwrap();
        assert!(!t.sly_reveal.contains("m"));
    }

    #[test]
    fn test_show_cards_only_at_showdown() {
        let mut t = table();
        seat_two(&mut t);
        t.start_new_hand().unwrap();
        assert_eq!(t.show_cards("a"), Err(GameError::NotInShowdown));
    }
}
