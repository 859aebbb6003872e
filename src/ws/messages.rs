//! Client/server wire messages. Everything rides a tagged JSON envelope:
//! `{"type": "...", "payload": {...}}`.

use crate::game::seat::SeatAction;
use crate::game::snapshot::TableSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Spectate a table without taking a seat. Creates the table if needed.
    #[serde(rename_all = "camelCase")]
    RequestState {
        table_id: String,
    },
    #[serde(rename_all = "camelCase")]
    JoinTable {
        table_id: String,
        player_name: String,
        chips: i64,
        position: usize,
        #[serde(default)]
        debug_role: bool,
    },
    PlayerAction {
        action: SeatAction,
    },
    StartGame,
    ShowCards,
    RequestRunItTwice,
    ToggleSlyReveal,
    RigNextHand,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { viewer_id: String },
    GameUpdate(TableSnapshot),
    Error { message: String },
}
