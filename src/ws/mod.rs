pub mod handler;
pub mod messages;
pub mod server;

pub use handler::ws_handler;
pub use server::GameServer;
