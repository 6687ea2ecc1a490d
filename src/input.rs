//! Turns typed text into arguments the core understands.

use crate::error::TradeError;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Anything that is not a positive whole number is an invalid quantity.
pub fn parse_quantity(raw: &str) -> Result<u32, TradeError> {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(TradeError::InvalidQuantity),
        Ok(quantity) => Ok(quantity),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Buy,
    Sell,
    EndRound,
    Complete,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    #[error("Invalid choice")]
    NotANumber,

    #[error("Invalid option")]
    OutOfRange(i64),
}

impl MenuChoice {
    pub const PROMPT: &'static str = "1 = Buy | 2 = Sell | 3 = End Round | 4 = Complete Game";

    pub fn parse(raw: &str) -> Result<Self, MenuError> {
        let number: i64 = raw.trim().parse().map_err(|_| MenuError::NotANumber)?;
        match number {
            1 => Ok(MenuChoice::Buy),
            2 => Ok(MenuChoice::Sell),
            3 => Ok(MenuChoice::EndRound),
            4 => Ok(MenuChoice::Complete),
            other => Err(MenuError::OutOfRange(other)),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, try 'help'")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Trade(#[from] TradeError),
}

/// A line of the command interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Buy { symbol: String, quantity: u32 },
    Sell { symbol: String, quantity: u32 },
    Prices,
    Portfolio,
    History,
    Next,
    Export(PathBuf),
    Help,
    Quit,
}

impl Command {
    pub const HELP: &'static str = "\
buy <STOCK> <QTY>    buy shares at the current price
sell <STOCK> <QTY>   sell shares you own
prices               show market prices
portfolio            show cash and holdings
history              show executed trades
next                 end the round
export <PATH>        write the trade log as CSV
help                 show this text
quit                 finish the game";

    /// Parses one line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (head, tail) = match line.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (line, ""),
        };
        if head.is_empty() {
            return Ok(None);
        }
        if head.eq_ignore_ascii_case("export") {
            // The path is the rest of the line, spaces included.
            if tail.is_empty() {
                return Err(CommandError::Usage("export <PATH>"));
            }
            return Ok(Some(Command::Export(PathBuf::from(tail))));
        }
        let rest: Vec<&str> = tail.split_whitespace().collect();

        let command = match (head.to_lowercase().as_str(), rest.as_slice()) {
            ("buy", [symbol, quantity]) => Command::Buy {
                symbol: normalize_symbol(symbol),
                quantity: parse_quantity(quantity)?,
            },
            ("buy", _) => return Err(CommandError::Usage("buy <STOCK> <QTY>")),
            ("sell", [symbol, quantity]) => Command::Sell {
                symbol: normalize_symbol(symbol),
                quantity: parse_quantity(quantity)?,
            },
            ("sell", _) => return Err(CommandError::Usage("sell <STOCK> <QTY>")),
            ("prices", []) => Command::Prices,
            ("portfolio", []) => Command::Portfolio,
            ("history", []) => Command::History,
            ("next", []) => Command::Next,
            ("help", _) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            _ => return Err(CommandError::Unknown(line.to_string())),
        };
        Ok(Some(command))
    }
}

/// Prompt/response over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints the prompt and reads a line. `None` means the input closed.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}
