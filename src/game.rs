//! One play-through: a market, the player's portfolio and the round clock.

use crate::config::GameConfig;
use crate::error::{ConfigError, TradeError};
use crate::market::Market;
use crate::portfolio::{Portfolio, TradeReceipt};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Final numbers of a game.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub rounds_played: u32,
    pub starting_cash: f64,
    pub cash: f64,
    pub holdings_value: f64,
    pub total_assets: f64,
    pub roi_percent: f64,
    pub trades: usize,
}

pub struct Game {
    market: Market,
    portfolio: Portfolio,
    rng: StdRng,
    starting_cash: f64,
    max_rounds: u32,
    // Completed rounds; the current round is this plus one.
    rounds_played: u32,
    finished: bool,
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            market: config.build_market()?,
            portfolio: Portfolio::new(config.starting_cash)?,
            rng,
            starting_cash: config.starting_cash,
            max_rounds: config.max_rounds,
            rounds_played: 0,
            finished: false,
        })
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// 1-based number of the round being played.
    pub fn round(&self) -> u32 {
        (self.rounds_played + 1).min(self.max_rounds)
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn buy(&mut self, name: &str, quantity: u32) -> Result<TradeReceipt, TradeError> {
        if self.finished {
            return Err(TradeError::GameOver);
        }
        let round = self.round();
        self.portfolio.buy(name, quantity, &self.market, round)
    }

    pub fn sell(&mut self, name: &str, quantity: u32) -> Result<TradeReceipt, TradeError> {
        if self.finished {
            return Err(TradeError::GameOver);
        }
        let round = self.round();
        self.portfolio.sell(name, quantity, &self.market, round)
    }

    /// Closes the current round and moves prices. Returns `false` once the
    /// last round has been played.
    pub fn end_round(&mut self) -> bool {
        if self.finished {
            return false;
        }

        self.market.advance_round(&mut self.rng);
        self.rounds_played += 1;
        info!("Round {} of {} closed", self.rounds_played, self.max_rounds);

        if self.rounds_played >= self.max_rounds {
            self.finish();
        }
        !self.finished
    }

    /// Ends the game early. Prices are not moved.
    pub fn complete(&mut self) {
        if !self.finished {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        info!(
            "Game over after {} rounds, ROI {:.2}%",
            self.rounds_played,
            self.roi_percent()
        );
    }

    pub fn total_assets(&self) -> f64 {
        self.portfolio.valuation(&self.market).1
    }

    pub fn roi_percent(&self) -> f64 {
        (self.total_assets() - self.starting_cash) / self.starting_cash * 100.0
    }

    pub fn summary(&self) -> GameSummary {
        let (holdings_value, total_assets) = self.portfolio.valuation(&self.market);
        GameSummary {
            rounds_played: self.rounds_played,
            starting_cash: self.starting_cash,
            cash: self.portfolio.cash(),
            holdings_value,
            total_assets,
            roi_percent: self.roi_percent(),
            trades: self.portfolio.history().len(),
        }
    }
}
