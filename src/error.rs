use thiserror::Error;

/// Failures raised while registering or looking up instruments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Stock {0} is already listed")]
    Duplicate(String),

    #[error("Invalid price {price} for {name}")]
    InvalidPrice { name: String, price: f64 },

    #[error("Stock {0} does not exist")]
    NotFound(String),
}

/// Rejection reasons for a buy or sell. None of these end the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Stock {0} does not exist")]
    InstrumentNotFound(String),

    #[error("Invalid quantity")]
    InvalidQuantity,

    #[error("Insufficient funds: cost ₹{cost:.2}, cash ₹{cash:.2}")]
    InsufficientFunds { cost: f64, cash: f64 },

    #[error("You do not own {0}")]
    NotOwned(String),

    #[error("Cannot sell {requested} shares of {name}, you own {held}")]
    Overdraft {
        name: String,
        requested: u32,
        held: u32,
    },

    #[error("The game is over")]
    GameOver,
}

/// Invalid startup configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Starting cash must be positive, got {0}")]
    Cash(f64),

    #[error("At least one round is required")]
    Rounds,

    #[error("Expected NAME=PRICE, got {0:?}")]
    StockSpec(String),

    #[error(transparent)]
    Market(#[from] MarketError),
}
