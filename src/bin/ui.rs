use anyhow::{anyhow, Context, Result};
use clap::Parser;
use egui::{Button, CentralPanel, ComboBox, Grid, TextEdit, ViewportBuilder};
use std::path::PathBuf;
use stock_rounds::desk::Desk;
use stock_rounds::{Args, Game};

const DEFAULT_EXPORT: &str = "trade_history.csv";

// UI Application
struct TradingApp {
    desk: Desk,
}

impl TradingApp {
    fn new(desk: Desk) -> Self {
        Self { desk }
    }

    fn prices(&self, ui: &mut egui::Ui) {
        ui.heading("Market Prices");
        Grid::new("prices").striped(true).show(ui, |ui| {
            for stock in self.desk.game.market().instruments() {
                ui.label(stock.name.as_str());
                ui.label(format!("₹{:.2}", stock.price));
                ui.end_row();
            }
        });
    }

    fn portfolio(&self, ui: &mut egui::Ui) {
        let game = &self.desk.game;
        let (holdings_value, total_assets) = game.portfolio().valuation(game.market());

        ui.heading("Portfolio");
        ui.label(format!("Cash: ₹{:.2}", game.portfolio().cash()));
        if game.portfolio().holdings().is_empty() {
            ui.label("No holdings");
        } else {
            Grid::new("holdings").striped(true).show(ui, |ui| {
                for (name, &qty) in game.portfolio().holdings() {
                    ui.label(name.as_str());
                    ui.label(format!("{} shares", qty));
                    match game.market().price_of(name) {
                        Ok(price) => ui.label(format!("₹{:.2}", price * f64::from(qty))),
                        Err(_) => ui.label("no market price"),
                    };
                    ui.end_row();
                }
            });
        }
        ui.label(format!("Portfolio Value: ₹{:.2}", holdings_value));
        ui.label(format!("Total Assets: ₹{:.2}", total_assets));
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let names: Vec<String> = self
            .desk
            .game
            .market()
            .instruments()
            .map(|s| s.name.clone())
            .collect();
        let open = !self.desk.game.is_finished();

        ui.horizontal(|ui| {
            ComboBox::from_label("Stock")
                .selected_text(self.desk.selected.clone())
                .show_ui(ui, |ui| {
                    for name in &names {
                        ui.selectable_value(&mut self.desk.selected, name.clone(), name.as_str());
                    }
                });
            ui.label("Quantity");
            ui.add(TextEdit::singleline(&mut self.desk.quantity).desired_width(60.0));
        });

        ui.horizontal(|ui| {
            if ui.add_enabled(open, Button::new("Buy")).clicked() {
                self.desk.buy();
            }
            if ui.add_enabled(open, Button::new("Sell")).clicked() {
                self.desk.sell();
            }
            if ui.add_enabled(open, Button::new("End Round")).clicked() {
                self.desk.end_round();
            }
            if ui.add_enabled(open, Button::new("Complete Game")).clicked() {
                self.desk.complete();
            }
            if ui.button("Export CSV").clicked() {
                self.desk.export();
            }
        });
    }
}

impl eframe::App for TradingApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        CentralPanel::default().show(ctx, |ui| {
            let game = &self.desk.game;
            ui.heading(format!("Round {} of {}", game.round(), game.max_rounds()));
            ui.separator();

            self.prices(ui);
            ui.separator();
            self.portfolio(ui);
            ui.separator();
            self.controls(ui);
            ui.separator();

            ui.label(self.desk.status());
        });
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.init_logging();

    let config = args.game_config().context("Invalid game settings")?;
    let game = Game::new(&config)?;
    let export_path = args
        .export
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT));
    let app = TradingApp::new(Desk::new(game, export_path));

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([520.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native("Stock Rounds", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow!("Failed to run native: {}", e))
}
