use crate::error::ConfigError;
use crate::market::{default_stocks, Market};
use clap::Parser;
use std::path::PathBuf;

/// Options shared by every front end of the game.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of rounds before the game ends
    #[arg(long, default_value_t = 10)]
    pub rounds: u32,

    /// Starting cash
    #[arg(long, default_value_t = 10_000.0)]
    pub cash: f64,

    /// Seed for the price walk. Omit for a fresh random game.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Listed stock as NAME=PRICE. Can be given multiple times.
    /// Defaults to HDFC=2000, TATA=4600, RELIANCE=6000.
    #[arg(long = "stock", value_name = "NAME=PRICE")]
    pub stocks: Vec<String>,

    /// Where to write the trade log as CSV
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let stocks = if self.stocks.is_empty() {
            default_stocks()
                .into_iter()
                .map(|(name, price)| (name.to_string(), price))
                .collect()
        } else {
            self.stocks
                .iter()
                .map(String::as_str)
                .map(parse_stock_spec)
                .collect::<Result<Vec<_>, _>>()?
        };

        let config = GameConfig {
            starting_cash: self.cash,
            max_rounds: self.rounds,
            seed: self.seed,
            stocks,
        };
        config.validate()?;
        Ok(config)
    }

    /// Filter used when RUST_LOG is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Sets up env_logger, honouring RUST_LOG first.
    pub fn init_logging(&self) {
        let filter = env_logger::Env::default().default_filter_or(self.default_log_filter());
        env_logger::Builder::from_env(filter).init();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub starting_cash: f64,
    pub max_rounds: u32,
    pub seed: Option<u64>,
    pub stocks: Vec<(String, f64)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cash: 10_000.0,
            max_rounds: 10,
            seed: None,
            stocks: default_stocks()
                .into_iter()
                .map(|(name, price)| (name.to_string(), price))
                .collect(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.starting_cash.is_finite() || self.starting_cash <= 0.0 {
            return Err(ConfigError::Cash(self.starting_cash));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Rounds);
        }
        self.build_market()?;
        Ok(())
    }

    pub fn build_market(&self) -> Result<Market, ConfigError> {
        let mut market = Market::new();
        for (name, price) in &self.stocks {
            market.add_instrument(name, *price)?;
        }
        Ok(market)
    }
}

// "tcs=3500" -> ("TCS", 3500.0)
fn parse_stock_spec(spec: &str) -> Result<(String, f64), ConfigError> {
    let bad = || ConfigError::StockSpec(spec.to_string());

    let (name, price) = spec.split_once('=').ok_or_else(bad)?;
    let name = name.trim().to_uppercase();
    if name.is_empty() {
        return Err(bad());
    }
    let price: f64 = price.trim().parse().map_err(|_| bad())?;
    Ok((name, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["stock_rounds"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = args(&[]).game_config().unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.build_market().unwrap().len(), 3);
    }

    #[test]
    fn test_custom_stocks() {
        let config = args(&["--stock", "tcs=3500", "--stock", "INFY = 1500.5", "--seed", "9"])
            .game_config()
            .unwrap();

        assert_eq!(
            config.stocks,
            vec![("TCS".to_string(), 3500.0), ("INFY".to_string(), 1500.5)]
        );
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_bad_stock_spec() {
        assert_eq!(
            args(&["--stock", "TCS"]).game_config(),
            Err(ConfigError::StockSpec("TCS".to_string()))
        );
        assert!(args(&["--stock", "TCS=abc"]).game_config().is_err());
        assert!(args(&["--stock", "=100"]).game_config().is_err());
    }

    #[test]
    fn test_duplicate_stock_rejected() {
        let err = args(&["--stock", "TCS=1", "--stock", "tcs=2"])
            .game_config()
            .unwrap_err();
        assert_eq!(err, ConfigError::Market(MarketError::Duplicate("TCS".to_string())));
    }

    #[test]
    fn test_log_filter_defaults() {
        assert_eq!(args(&[]).default_log_filter(), "warn");
        assert_eq!(args(&["-v"]).default_log_filter(), "debug");
        assert_eq!(args(&["--verbose"]).default_log_filter(), "debug");
    }

    #[test]
    fn test_cash_and_rounds_validated() {
        assert_eq!(args(&["--cash", "0"]).game_config(), Err(ConfigError::Cash(0.0)));
        assert_eq!(args(&["--rounds", "0"]).game_config(), Err(ConfigError::Rounds));
    }
}
