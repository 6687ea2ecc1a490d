// Plain-text screens for the console front ends

use crate::game::Game;
use crate::market::Market;
use crate::portfolio::Portfolio;
use std::io::{self, Write};

pub fn write_prices<W: Write>(out: &mut W, market: &Market) -> io::Result<()> {
    writeln!(out, "\n--- Market Prices ---")?;
    for stock in market.instruments() {
        writeln!(out, "{}: ₹{:.2}", stock.name, stock.price)?;
    }
    Ok(())
}

pub fn write_portfolio<W: Write>(
    out: &mut W,
    portfolio: &Portfolio,
    market: &Market,
) -> io::Result<()> {
    writeln!(out, "\nCash Available: ₹{:.2}", portfolio.cash())?;
    writeln!(out, "\n--- Portfolio ---")?;

    if portfolio.holdings().is_empty() {
        writeln!(out, "No holdings")?;
    }
    for (name, &qty) in portfolio.holdings() {
        match market.price_of(name) {
            Ok(price) => writeln!(
                out,
                "{}: {} shares | ₹{:.2} each | Total: ₹{:.2}",
                name,
                qty,
                price,
                price * f64::from(qty)
            )?,
            Err(_) => writeln!(out, "{}: {} shares | no market price", name, qty)?,
        }
    }

    let (holdings_value, total_assets) = portfolio.valuation(market);
    writeln!(out, "\nPortfolio Value: ₹{:.2}", holdings_value)?;
    writeln!(out, "Total Assets: ₹{:.2}", total_assets)?;
    Ok(())
}

pub fn write_history<W: Write>(out: &mut W, portfolio: &Portfolio) -> io::Result<()> {
    writeln!(out, "\n--- Trade History ---")?;
    if portfolio.history().is_empty() {
        writeln!(out, "No trades yet")?;
        return Ok(());
    }
    writeln!(out, "{:<5} {:<10} {:>6} {:>12} {:>6}", "TYPE", "STOCK", "QTY", "PRICE", "ROUND")?;
    for trade in portfolio.history() {
        writeln!(
            out,
            "{:<5} {:<10} {:>6} {:>12.2} {:>6}",
            trade.side.to_string(),
            trade.stock,
            trade.quantity,
            trade.price,
            trade.round
        )?;
    }
    Ok(())
}

pub fn write_round_banner<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    writeln!(out, "\n======== ROUND {} ========", game.round())
}

pub fn write_game_over<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    write_portfolio(out, game.portfolio(), game.market())?;
    writeln!(out, "\n========= GAME OVER =========")?;
    writeln!(out, "ROI: {:.2}%", game.roi_percent())
}

pub fn write_summary_json<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &game.summary()).map_err(io::Error::from)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prices() {
        let market = Market::with_defaults();
        let text = render(|out| write_prices(out, &market));
        assert!(text.contains("HDFC: ₹2000.00\nTATA: ₹4600.00\nRELIANCE: ₹6000.00\n"));
    }

    #[test]
    fn test_empty_portfolio() {
        let market = Market::with_defaults();
        let portfolio = Portfolio::new(10_000.0).unwrap();
        let text = render(|out| write_portfolio(out, &portfolio, &market));

        assert!(text.contains("Cash Available: ₹10000.00"));
        assert!(text.contains("No holdings"));
        assert!(text.contains("Total Assets: ₹10000.00"));
    }

    #[test]
    fn test_portfolio_lines() {
        let market = Market::with_defaults();
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        portfolio.buy("HDFC", 3, &market, 1).unwrap();
        let text = render(|out| write_portfolio(out, &portfolio, &market));

        assert!(text.contains("HDFC: 3 shares | ₹2000.00 each | Total: ₹6000.00"));
        assert!(text.contains("Portfolio Value: ₹6000.00"));
        assert!(!text.contains("No holdings"));
    }

    #[test]
    fn test_unlisted_holding_is_flagged() {
        let market = Market::with_defaults();
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        portfolio.buy("TATA", 1, &market, 1).unwrap();

        let text = render(|out| write_portfolio(out, &portfolio, &Market::new()));
        assert!(text.contains("TATA: 1 shares | no market price"));
        assert!(text.contains("Portfolio Value: ₹0.00"));
    }

    #[test]
    fn test_summary_json() {
        let mut game = Game::new(&crate::config::GameConfig::default()).unwrap();
        game.buy("HDFC", 1).unwrap();
        let text = render(|out| write_summary_json(out, &game));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["trades"], 1);
        assert_eq!(value["cash"], 8000.0);
        assert_eq!(value["rounds_played"], 0);
    }

    #[test]
    fn test_history_table() {
        let market = Market::with_defaults();
        let mut portfolio = Portfolio::new(10_000.0).unwrap();
        assert!(render(|out| write_history(out, &portfolio)).contains("No trades yet"));

        portfolio.buy("TATA", 2, &market, 3).unwrap();
        let text = render(|out| write_history(out, &portfolio));
        assert!(text.contains("BUY"));
        assert!(text.contains("TATA"));
        assert!(text.contains("4600.00"));
    }
}
