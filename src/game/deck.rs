use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A playing card. On the wire a card is its two-character token:
/// rank (2-9, T, J, Q, K, A) followed by suit (s, h, d, c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: u8, // 2-14 (Ten=10, Jack=11, Queen=12, King=13, Ace=14)
    pub suit: u8, // 0-3 (Spades, Hearts, Diamonds, Clubs)
}

impl Card {
    pub fn new(rank: u8, suit: u8) -> Self {
        Self { rank, suit }
    }

    fn rank_char(&self) -> char {
        match self.rank {
            10 => 'T',
            11 => 'J',
            12 => 'Q',
            13 => 'K',
            14 => 'A',
            n => (b'0' + n) as char,
        }
    }

    fn suit_char(&self) -> char {
        match self.suit {
            0 => 's',
            1 => 'h',
            2 => 'd',
            _ => 'c',
        }
    }

    /// The stable two-character identifier, e.g. "As" or "Td".
    pub fn token(&self) -> String {
        format!("{}{}", self.rank_char(), self.suit_char())
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let rank = match chars.next()? {
            'T' => 10,
            'J' => 11,
            'Q' => 12,
            'K' => 13,
            'A' => 14,
            c @ '2'..='9' => c as u8 - b'0',
            _ => return None,
        };
        let suit = match chars.next()? {
            's' => 0,
            'h' => 1,
            'd' => 2,
            'c' => 3,
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self { rank, suit })
    }

    // Convert to an rs_poker card for hand evaluation
    pub fn to_eval(&self) -> rs_poker::core::Card {
        use rs_poker::core::{Suit, Value};

        let value = match self.rank {
            2 => Value::Two,
            3 => Value::Three,
            4 => Value::Four,
            5 => Value::Five,
            6 => Value::Six,
            7 => Value::Seven,
            8 => Value::Eight,
            9 => Value::Nine,
            10 => Value::Ten,
            11 => Value::Jack,
            12 => Value::Queen,
            13 => Value::King,
            _ => Value::Ace,
        };

        let suit = match self.suit {
            0 => Suit::Spade,
            1 => Suit::Heart,
            2 => Suit::Diamond,
            _ => Suit::Club,
        };

        rs_poker::core::Card { value, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Card::from_token(&s).ok_or_else(|| de::Error::custom(format!("invalid card token: {}", s)))
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Builds an unshuffled standard 52-card deck.
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in 0..4 {
            for rank in 2..=14 {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// In-place Fisher-Yates shuffle with a ChaCha20 RNG.
    pub fn shuffle(&mut self) {
        let mut rng = ChaCha20Rng::from_entropy();
        self.cards.shuffle(&mut rng);
    }

    /// Draws a single card. Cards never return to the deck within a hand.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn draw_n(&mut self, count: usize) -> Vec<Card> {
        let mut dealt = Vec::new();
        for _ in 0..count {
            if let Some(card) = self.draw() {
                dealt.push(card);
            }
        }
        dealt
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Removes every listed card from the deck, wherever it sits.
    pub fn remove_all(&mut self, cards: &[Card]) {
        self.cards.retain(|c| !cards.contains(c));
    }

    /// Stacks cards on top of the deck so that sequential draws yield them
    /// in the given order.
    pub fn stack_top(&mut self, cards: &[Card]) {
        for card in cards.iter().rev() {
            self.cards.push(*card);
        }
    }
}

/// A deterministic deck override for a single upcoming hand: a fixed board,
/// a fixed hole pair for the rigged seat, and a pool of strong-but-losing
/// hole cards handed out to the other seats.
#[derive(Debug, Clone)]
pub struct RigPlan {
    pub board: [Card; 5],
    pub rigged_hole: [Card; 2],
    pub power_pool: Vec<Card>,
}

impl RigPlan {
    /// The stock plan: quads for the rigged seat over strong full houses
    /// and trips for everyone else.
    pub fn quads_over_kings() -> Self {
        Self {
            // As Ad Ks 2c 3h
            board: [
                Card::new(14, 0),
                Card::new(14, 2),
                Card::new(13, 0),
                Card::new(2, 3),
                Card::new(3, 1),
            ],
            // Ac Ah
            rigged_hole: [Card::new(14, 3), Card::new(14, 1)],
            // Kh Kd Qs Qh Qd Qc Js Jh Jd Jc
            power_pool: vec![
                Card::new(13, 1),
                Card::new(13, 2),
                Card::new(12, 0),
                Card::new(12, 1),
                Card::new(12, 2),
                Card::new(12, 3),
                Card::new(11, 0),
                Card::new(11, 1),
                Card::new(11, 2),
                Card::new(11, 3),
            ],
        }
    }

    /// Every card the plan pre-assigns, for removal from a fresh deck.
    pub fn all_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(7 + self.power_pool.len());
        cards.extend_from_slice(&self.board);
        cards.extend_from_slice(&self.rigged_hole);
        cards.extend_from_slice(&self.power_pool);
        cards
    }
}
