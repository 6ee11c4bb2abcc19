//! Game sessions and their results.

pub mod config;
pub mod game;
pub mod result;

pub use config::SessionConfig;
pub use game::GameSession;
pub use result::GameResult;
