pub mod collision;
pub mod config;
pub mod constants;
pub mod context;
pub mod doors;
pub mod encounters;
pub mod hiding;
pub mod levels;
pub mod map;
pub mod players;
pub mod protocol;
pub mod session;
pub mod systems;
pub mod timers;

pub use config::SessionConfig;
pub use session::HotelSession;
