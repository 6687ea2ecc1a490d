use crate::error::MarketError;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest per-round move in either direction, as a fraction of price.
pub const MAX_ROUND_CHANGE: f64 = 0.05;

/// Prices never drop below this.
pub const PRICE_FLOOR: f64 = 1.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instrument {
    pub name: String,
    pub price: f64,
}

impl Instrument {
    // Random walk step: uniform change in [-5%, +5%], clamped to the floor
    pub fn fluctuate_price<R: Rng>(&mut self, rng: &mut R) {
        let change = rng.gen_range(-MAX_ROUND_CHANGE..=MAX_ROUND_CHANGE);
        self.price = (self.price * (1.0 + change)).max(PRICE_FLOOR);
    }
}

/// The set of listed stocks, kept in listing order.
#[derive(Debug, Clone, Default)]
pub struct Market {
    stocks: Vec<Instrument>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Market with the three stocks the game starts with.
    pub fn with_defaults() -> Self {
        let mut market = Self::new();
        for (name, price) in default_stocks() {
            let listed = market.add_instrument(name, price);
            debug_assert!(listed.is_ok(), "bad default stock {}: {:?}", name, listed);
        }
        market
    }

    /// Lists a new stock. A name that is already listed is rejected and the
    /// existing price is kept.
    pub fn add_instrument(&mut self, name: &str, initial_price: f64) -> Result<(), MarketError> {
        if self.contains(name) {
            return Err(MarketError::Duplicate(name.to_string()));
        }
        if !initial_price.is_finite() || initial_price <= 0.0 {
            return Err(MarketError::InvalidPrice {
                name: name.to_string(),
                price: initial_price,
            });
        }

        self.stocks.push(Instrument {
            name: name.to_string(),
            price: initial_price,
        });
        Ok(())
    }

    /// Moves every price one independent step.
    pub fn advance_round<R: Rng>(&mut self, rng: &mut R) {
        for stock in self.stocks.iter_mut() {
            let before = stock.price;
            stock.fluctuate_price(rng);
            debug!("{}: {:.2} -> {:.2}", stock.name, before, stock.price);
        }
    }

    pub fn price_of(&self, name: &str) -> Result<f64, MarketError> {
        self.get(name)
            .map(|stock| stock.price)
            .ok_or_else(|| MarketError::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Instrument> {
        self.stocks.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.stocks.iter()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

pub fn default_stocks() -> Vec<(&'static str, f64)> {
    vec![("HDFC", 2000.0), ("TATA", 4600.0), ("RELIANCE", 6000.0)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_add_and_lookup() {
        let mut market = Market::new();
        market.add_instrument("HDFC", 2000.0).unwrap();
        market.add_instrument("TATA", 4600.0).unwrap();

        assert_eq!(market.len(), 2);
        assert_eq!(market.price_of("HDFC").unwrap(), 2000.0);
        assert_eq!(
            market.price_of("INFY"),
            Err(MarketError::NotFound("INFY".to_string()))
        );
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut market = Market::with_defaults();
        let err = market.add_instrument("HDFC", 10.0).unwrap_err();

        assert_eq!(err, MarketError::Duplicate("HDFC".to_string()));
        assert_eq!(market.price_of("HDFC").unwrap(), 2000.0);
        assert_eq!(market.len(), 3);
    }

    #[test]
    fn test_invalid_initial_price() {
        let mut market = Market::new();
        assert!(market.add_instrument("ZERO", 0.0).is_err());
        assert!(market.add_instrument("NEG", -5.0).is_err());
        assert!(market.add_instrument("NAN", f64::NAN).is_err());
        assert!(market.is_empty());
    }

    #[test]
    fn test_listing_order_is_kept() {
        let market = Market::with_defaults();
        let names: Vec<&str> = market.instruments().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["HDFC", "TATA", "RELIANCE"]);
    }

    #[test]
    fn test_round_change_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut market = Market::with_defaults();

        for _ in 0..500 {
            let before: Vec<f64> = market.instruments().map(|s| s.price).collect();
            market.advance_round(&mut rng);

            for (old, stock) in before.iter().zip(market.instruments()) {
                assert!(stock.price >= PRICE_FLOOR);
                assert!(stock.price >= old * 0.95 - 1e-9, "{} fell too far", stock.name);
                assert!(stock.price <= old * 1.05 + 1e-9, "{} rose too far", stock.name);
            }
        }
    }

    #[test]
    fn test_price_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut market = Market::new();
        market.add_instrument("PENNY", 1.0).unwrap();

        for _ in 0..200 {
            market.advance_round(&mut rng);
            assert!(market.price_of("PENNY").unwrap() >= PRICE_FLOOR);
        }
    }

    #[test]
    fn test_same_seed_same_prices() {
        let mut a = Market::with_defaults();
        let mut b = Market::with_defaults();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        for _ in 0..10 {
            a.advance_round(&mut rng_a);
            b.advance_round(&mut rng_b);
        }
        for (x, y) in a.instruments().zip(b.instruments()) {
            assert_eq!(x.price, y.price);
        }
    }
}
