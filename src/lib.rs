//! A round-based stock trading game.
//!
//! A [`Market`] lists a few stocks whose prices take one random step per
//! round. The player's [`Portfolio`] buys and sells against those prices.
//! [`Game`] ties the two together with a round clock, and the console and
//! desktop front ends in `src/bin` drive a `Game`.

pub mod config;
pub mod desk;
pub mod error;
pub mod game;
pub mod input;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod session;

pub use config::{Args, GameConfig};
pub use error::{ConfigError, MarketError, TradeError};
pub use game::{Game, GameSummary};
pub use market::{Instrument, Market};
pub use portfolio::{Portfolio, TradeReceipt, TradeRecord, TradeSide};
