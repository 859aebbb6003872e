pub mod betting;
pub mod deck;
pub mod error;
pub mod feed;
pub mod hand;
pub mod pot;
pub mod seat;
pub mod snapshot;
pub mod table;

pub use betting::ClosureRule;
pub use deck::Card;
pub use error::{GameError, GameResult};
pub use seat::{Seat, SeatAction};
pub use snapshot::TableSnapshot;
pub use table::{GameTable, HandState, TableOptions};
