use anyhow::{Context, Result};
use clap::Parser;
use stock_rounds::input::Prompter;
use stock_rounds::{report, session, Args, Game};
use std::io::{self, Write};

fn main() -> Result<()> {
    let args = Args::parse();
    args.init_logging();

    let config = args.game_config().context("Invalid game settings")?;
    let mut game = Game::new(&config)?;

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    session::run_menu(&mut game, &mut prompter).context("Console closed unexpectedly")?;

    if let Some(path) = &args.export {
        game.portfolio()
            .export_history_to_path(path)
            .with_context(|| format!("Failed to export trade log to {}", path.display()))?;
        println!("Trade log written to {}", path.display());
    }
    if args.json {
        let mut stdout = io::stdout().lock();
        report::write_summary_json(&mut stdout, &game)?;
        stdout.flush()?;
    }
    Ok(())
}
