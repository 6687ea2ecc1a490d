//! Console drivers. Both loops own nothing but the I/O handles; every rule
//! lives in [`Game`].

use crate::error::TradeError;
use crate::game::Game;
use crate::input::{normalize_symbol, parse_quantity, Command, MenuChoice, Prompter};
use crate::portfolio::TradeReceipt;
use crate::report;
use log::{debug, warn};
use std::io::{self, BufRead, Write};

fn write_outcome<W: Write>(out: &mut W, outcome: Result<TradeReceipt, TradeError>) -> io::Result<()> {
    match outcome {
        Ok(receipt) => writeln!(out, "{}", receipt),
        Err(err) => {
            debug!("Trade rejected: {}", err);
            writeln!(out, "{}", err)
        }
    }
}

/// Numbered-menu game, as played round by round at a prompt.
pub fn run_menu<R: BufRead, W: Write>(game: &mut Game, prompter: &mut Prompter<R, W>) -> io::Result<()> {
    'rounds: while !game.is_finished() {
        report::write_round_banner(prompter.output(), game)?;
        report::write_prices(prompter.output(), game.market())?;
        report::write_portfolio(prompter.output(), game.portfolio(), game.market())?;

        loop {
            let prompt = format!("\n{}\nSelect: ", MenuChoice::PROMPT);
            let Some(line) = prompter.ask(&prompt)? else {
                game.complete();
                break 'rounds;
            };

            match MenuChoice::parse(&line) {
                Ok(MenuChoice::Complete) => {
                    game.complete();
                    break 'rounds;
                }
                Ok(MenuChoice::EndRound) => {
                    game.end_round();
                    break;
                }
                Ok(MenuChoice::Buy) => {
                    let Some(outcome) = menu_buy(game, prompter)? else {
                        game.complete();
                        break 'rounds;
                    };
                    write_outcome(prompter.output(), outcome)?;
                    report::write_portfolio(prompter.output(), game.portfolio(), game.market())?;
                }
                Ok(MenuChoice::Sell) => {
                    let Some(outcome) = menu_sell(game, prompter)? else {
                        game.complete();
                        break 'rounds;
                    };
                    write_outcome(prompter.output(), outcome)?;
                    report::write_portfolio(prompter.output(), game.portfolio(), game.market())?;
                }
                Err(err) => writeln!(prompter.output(), "{}", err)?,
            }
        }
    }

    report::write_game_over(prompter.output(), game)
}

// Outer `None` means the input closed mid-trade.
fn menu_buy<R: BufRead, W: Write>(
    game: &mut Game,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<Result<TradeReceipt, TradeError>>> {
    let Some(raw) = prompter.ask("Select the stock you want to buy: ")? else {
        return Ok(None);
    };
    let symbol = normalize_symbol(&raw);
    if !game.market().contains(&symbol) {
        return Ok(Some(Err(TradeError::InstrumentNotFound(symbol))));
    }

    let Some(raw) = prompter.ask("Enter quantity: ")? else {
        return Ok(None);
    };
    Ok(Some(parse_quantity(&raw).and_then(|qty| game.buy(&symbol, qty))))
}

fn menu_sell<R: BufRead, W: Write>(
    game: &mut Game,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<Result<TradeReceipt, TradeError>>> {
    let Some(raw) = prompter.ask("Select the stock you want to sell: ")? else {
        return Ok(None);
    };
    let symbol = normalize_symbol(&raw);
    if game.portfolio().quantity_of(&symbol) == 0 {
        return Ok(Some(Err(TradeError::NotOwned(symbol))));
    }

    let Some(raw) = prompter.ask("Enter quantity to sell: ")? else {
        return Ok(None);
    };
    Ok(Some(parse_quantity(&raw).and_then(|qty| game.sell(&symbol, qty))))
}

/// Line-command game. Reads until `quit`, the last round, or end of input.
pub fn run_commands<R: BufRead, W: Write>(game: &mut Game, input: R, out: &mut W) -> io::Result<()> {
    writeln!(out, "Type 'help' for commands.")?;
    report::write_round_banner(out, game)?;
    report::write_prices(out, game.market())?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "{}", err)?;
                continue;
            }
        };

        match command {
            Command::Buy { symbol, quantity } => write_outcome(out, game.buy(&symbol, quantity))?,
            Command::Sell { symbol, quantity } => write_outcome(out, game.sell(&symbol, quantity))?,
            Command::Prices => report::write_prices(out, game.market())?,
            Command::Portfolio => report::write_portfolio(out, game.portfolio(), game.market())?,
            Command::History => report::write_history(out, game.portfolio())?,
            Command::Next => {
                if !game.end_round() {
                    break;
                }
                report::write_round_banner(out, game)?;
                report::write_prices(out, game.market())?;
            }
            Command::Export(path) => match game.portfolio().export_history_to_path(&path) {
                Ok(()) => writeln!(out, "Trade log written to {}", path.display())?,
                Err(err) => {
                    warn!("Export to {} failed: {}", path.display(), err);
                    writeln!(out, "Could not write {}: {}", path.display(), err)?;
                }
            },
            Command::Help => writeln!(out, "{}", Command::HELP)?,
            Command::Quit => break,
        }
    }

    game.complete();
    report::write_game_over(out, game)
}
