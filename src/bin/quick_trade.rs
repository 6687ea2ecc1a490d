// Command-line variant: one command per line, e.g. `buy HDFC 3`, `next`.
// Works interactively or with a script piped to stdin.

use anyhow::{Context, Result};
use clap::Parser;
use stock_rounds::{report, session, Args, Game};
use std::io::{self, Write};

fn main() -> Result<()> {
    let args = Args::parse();
    args.init_logging();

    let config = args.game_config().context("Invalid game settings")?;
    let mut game = Game::new(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    session::run_commands(&mut game, stdin.lock(), &mut stdout).context("Console closed unexpectedly")?;

    if let Some(path) = &args.export {
        game.portfolio()
            .export_history_to_path(path)
            .with_context(|| format!("Failed to export trade log to {}", path.display()))?;
        writeln!(stdout, "Trade log written to {}", path.display())?;
    }
    if args.json {
        report::write_summary_json(&mut stdout, &game)?;
    }
    stdout.flush()?;
    Ok(())
}
