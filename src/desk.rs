use crate::error::TradeError;
use crate::game::Game;
use crate::input::parse_quantity;
use crate::portfolio::TradeReceipt;
use log::warn;
use std::path::PathBuf;

/// State behind the desktop window. Widgets read from it and buttons call
/// into it; it knows nothing about the toolkit.
pub struct Desk {
    pub game: Game,
    pub selected: String,
    pub quantity: String,
    pub export_path: PathBuf,
    status: String,
}

impl Desk {
    pub fn new(game: Game, export_path: PathBuf) -> Self {
        let selected = game
            .market()
            .instruments()
            .next()
            .map(|s| s.name.clone())
            .unwrap_or_default();

        Self {
            game,
            selected,
            quantity: String::from("1"),
            export_path,
            status: String::from("Pick a stock and a quantity"),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn buy(&mut self) {
        let outcome = parse_quantity(&self.quantity).and_then(|qty| self.game.buy(&self.selected, qty));
        self.show(outcome);
    }

    pub fn sell(&mut self) {
        let outcome = parse_quantity(&self.quantity).and_then(|qty| self.game.sell(&self.selected, qty));
        self.show(outcome);
    }

    fn show(&mut self, outcome: Result<TradeReceipt, TradeError>) {
        self.status = match outcome {
            Ok(receipt) => receipt.to_string(),
            Err(err) => err.to_string(),
        };
    }

    pub fn end_round(&mut self) {
        if self.game.end_round() {
            self.status = format!("Round {} started", self.game.round());
        } else {
            self.status = self.game_over_text();
        }
    }

    pub fn complete(&mut self) {
        self.game.complete();
        self.status = self.game_over_text();
    }

    fn game_over_text(&self) -> String {
        format!("Game over. ROI: {:.2}%", self.game.roi_percent())
    }

    pub fn export(&mut self) {
        self.status = match self.game.portfolio().export_history_to_path(&self.export_path) {
            Ok(()) => format!("Trade log written to {}", self.export_path.display()),
            Err(err) => {
                warn!("Export to {} failed: {}", self.export_path.display(), err);
                format!("Could not write {}: {}", self.export_path.display(), err)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn desk(rounds: u32) -> Desk {
        let config = GameConfig {
            max_rounds: rounds,
            seed: Some(5),
            ..GameConfig::default()
        };
        Desk::new(Game::new(&config).unwrap(), PathBuf::from("unused.csv"))
    }

    #[test]
    fn test_first_stock_selected() {
        let desk = desk(3);
        assert_eq!(desk.selected, "HDFC");
        assert_eq!(desk.quantity, "1");
    }

    #[test]
    fn test_buy_sell_status() {
        let mut desk = desk(3);
        desk.quantity = "3".to_string();
        desk.buy();
        assert!(desk.status().starts_with("Bought 3 shares of HDFC"));

        desk.quantity = "x".to_string();
        desk.sell();
        assert_eq!(desk.status(), "Invalid quantity");
        assert_eq!(desk.game.portfolio().quantity_of("HDFC"), 3);

        desk.quantity = "3".to_string();
        desk.sell();
        assert!(desk.status().starts_with("Sold 3 shares of HDFC"));
    }

    #[test]
    fn test_insufficient_funds_status() {
        let mut desk = desk(3);
        desk.quantity = "100".to_string();
        desk.buy();
        assert!(desk.status().starts_with("Insufficient funds"));
    }

    #[test]
    fn test_rounds_and_game_over() {
        let mut desk = desk(2);
        desk.end_round();
        assert_eq!(desk.status(), "Round 2 started");
        desk.end_round();
        assert!(desk.status().starts_with("Game over"));

        desk.buy();
        assert_eq!(desk.status(), "The game is over");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(2);
        desk.export_path = dir.path().join("gui.csv");
        desk.buy();
        desk.export();

        assert!(desk.status().starts_with("Trade log written to"));
        let text = std::fs::read_to_string(&desk.export_path).unwrap();
        assert!(text.starts_with("type,stock,qty,price,round\nBUY,HDFC,1,"));
    }

    #[test]
    fn test_export_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut desk = desk(2);
        desk.export_path = dir.path().join("missing").join("gui.csv");
        desk.export();
        assert!(desk.status().starts_with("Could not write"));
    }
}
