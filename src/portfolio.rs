//! Cash, holdings and the trade log of the player.
//!
//! Every buy or sell is all-or-nothing: preconditions are checked before any
//! field is touched, so a rejected trade leaves the portfolio exactly as it
//! was.

use crate::error::{ConfigError, TradeError};
use crate::market::Market;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column names of the exported trade log.
pub const HISTORY_HEADER: &str = "type,stock,qty,price,round";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed trade. Records are only ever appended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub side: TradeSide,
    pub stock: String,
    pub quantity: u32,
    pub price: f64,
    pub round: u32,
}

/// What a successful buy or sell did.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub side: TradeSide,
    pub stock: String,
    pub quantity: u32,
    pub price: f64,
    /// Cost of a buy or proceeds of a sell.
    pub amount: f64,
    pub round: u32,
}

impl fmt::Display for TradeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.side {
            TradeSide::Buy => "Bought",
            TradeSide::Sell => "Sold",
        };
        write!(
            f,
            "{} {} shares of {} at ₹{:.2} (₹{:.2})",
            verb, self.quantity, self.stock, self.price, self.amount
        )
    }
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    cash: f64,
    holdings: BTreeMap<String, u32>,
    history: Vec<TradeRecord>,
}

impl Portfolio {
    /// Starting cash must be finite and not negative.
    pub fn new(cash: f64) -> Result<Self, ConfigError> {
        if !cash.is_finite() || cash < 0.0 {
            return Err(ConfigError::Cash(cash));
        }
        Ok(Self {
            cash,
            holdings: BTreeMap::new(),
            history: Vec::new(),
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn holdings(&self) -> &BTreeMap<String, u32> {
        &self.holdings
    }

    pub fn quantity_of(&self, name: &str) -> u32 {
        self.holdings.get(name).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[TradeRecord] {
        &self.history
    }

    pub fn buy(
        &mut self,
        name: &str,
        quantity: u32,
        market: &Market,
        round: u32,
    ) -> Result<TradeReceipt, TradeError> {
        let price = market
            .price_of(name)
            .map_err(|_| TradeError::InstrumentNotFound(name.to_string()))?;
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }

        let held = self.quantity_of(name);
        let new_held = held.checked_add(quantity).ok_or(TradeError::InvalidQuantity)?;

        let cost = price * f64::from(quantity);
        if cost > self.cash {
            debug!("Rejected buy of {} {}: cost {:.2} > cash {:.2}", quantity, name, cost, self.cash);
            return Err(TradeError::InsufficientFunds {
                cost,
                cash: self.cash,
            });
        }

        self.cash -= cost;
        self.holdings.insert(name.to_string(), new_held);
        Ok(self.record(TradeSide::Buy, name, quantity, price, cost, round))
    }

    pub fn sell(
        &mut self,
        name: &str,
        quantity: u32,
        market: &Market,
        round: u32,
    ) -> Result<TradeReceipt, TradeError> {
        let held = match self.holdings.get(name) {
            Some(&held) => held,
            None => return Err(TradeError::NotOwned(name.to_string())),
        };
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }
        if quantity > held {
            return Err(TradeError::Overdraft {
                name: name.to_string(),
                requested: quantity,
                held,
            });
        }
        let price = market
            .price_of(name)
            .map_err(|_| TradeError::InstrumentNotFound(name.to_string()))?;

        let proceeds = price * f64::from(quantity);
        self.cash += proceeds;
        if held == quantity {
            self.holdings.remove(name);
        } else {
            self.holdings.insert(name.to_string(), held - quantity);
        }
        Ok(self.record(TradeSide::Sell, name, quantity, price, proceeds, round))
    }

    fn record(
        &mut self,
        side: TradeSide,
        name: &str,
        quantity: u32,
        price: f64,
        amount: f64,
        round: u32,
    ) -> TradeReceipt {
        self.history.push(TradeRecord {
            side,
            stock: name.to_string(),
            quantity,
            price,
            round,
        });

        let receipt = TradeReceipt {
            side,
            stock: name.to_string(),
            quantity,
            price,
            amount,
            round,
        };
        info!("Round {}: {}", round, receipt);
        receipt
    }

    /// Returns `(holdings_value, total_assets)` at current market prices.
    ///
    /// A portfolio is meant to be valued against the market it traded on.
    /// Holdings that market does not list are left out of the total and
    /// reported by [`Portfolio::unpriced`].
    pub fn valuation(&self, market: &Market) -> (f64, f64) {
        let mut holdings_value = 0.0;
        for (name, &qty) in &self.holdings {
            match market.price_of(name) {
                Ok(price) => holdings_value += price * f64::from(qty),
                Err(_) => warn!("No market price for {} ({} shares), left out of valuation", name, qty),
            }
        }
        (holdings_value, self.cash + holdings_value)
    }

    /// Names of held stocks that `market` has no price for.
    pub fn unpriced<'a>(&'a self, market: &'a Market) -> impl Iterator<Item = &'a str> + 'a {
        self.holdings
            .keys()
            .map(String::as_str)
            .filter(move |name| !market.contains(name))
    }

    /// Writes the trade log as CSV. The header row is always written.
    pub fn export_history<W: Write>(&self, mut sink: W) -> io::Result<()> {
        writeln!(sink, "{}", HISTORY_HEADER)?;
        for trade in &self.history {
            writeln!(
                sink,
                "{},{},{},{:.2},{}",
                trade.side,
                csv_field(&trade.stock),
                trade.quantity,
                trade.price,
                trade.round
            )?;
        }
        sink.flush()
    }

    pub fn export_history_to_path(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.export_history(BufWriter::new(file))?;
        info!("Exported {} trades to {}", self.history.len(), path.display());
        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
