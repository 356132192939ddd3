//! Client command parsing.
//!
//! One request line maps to one [`Command`]:
//!
//! ```text
//! get-food <kw1> [kw2 ...]
//! get-food-report <id>
//! get-food-by-barcode --code=<barcode>
//! ```
//!
//! Parsing is pure; it never touches the cache or the network.

use crate::{PantryError, Result};

/// Keyword search command name.
pub const GET_FOOD: &str = "get-food";
/// Report-by-id command name.
pub const GET_FOOD_REPORT: &str = "get-food-report";
/// Barcode lookup command name.
pub const GET_FOOD_BY_BARCODE: &str = "get-food-by-barcode";
/// Marker carrying the barcode value in a barcode lookup.
pub const BARCODE_PREFIX: &str = "--code=";

const MIN_TOKENS: usize = 2;

/// A validated client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search by keywords, in the order the client sent them. Never empty.
    SearchByKeywords(Vec<String>),
    /// Fetch one report. Sign is validated by the retriever.
    GetReportById(i64),
    /// Look up a previously seen barcode. Never blank.
    GetByBarcode(String),
}

impl Command {
    /// Parse one request line.
    ///
    /// Tokens are separated by runs of whitespace. Fails with
    /// [`PantryError::InvalidMessage`] on anything malformed.
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&name) = tokens.first() else {
            return Err(invalid("message cannot be blank"));
        };

        // a lone `get-food` gets the more specific keyword error
        if tokens.len() < MIN_TOKENS && name != GET_FOOD {
            return Err(invalid(format!(
                "message should contain at least {MIN_TOKENS} arguments"
            )));
        }

        match name {
            GET_FOOD => parse_search(&tokens[1..]),
            GET_FOOD_REPORT => parse_report(tokens[1]),
            GET_FOOD_BY_BARCODE => parse_barcode(&tokens[1..]),
            other => Err(invalid(format!("unknown command type '{other}'"))),
        }
    }

    /// Protocol name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SearchByKeywords(_) => GET_FOOD,
            Command::GetReportById(_) => GET_FOOD_REPORT,
            Command::GetByBarcode(_) => GET_FOOD_BY_BARCODE,
        }
    }
}

fn parse_search(args: &[&str]) -> Result<Command> {
    let keywords: Vec<String> = args.iter().map(|kw| kw.trim().to_string()).collect();
    if keywords.is_empty() {
        return Err(invalid("there should be at least one keyword"));
    }
    Ok(Command::SearchByKeywords(keywords))
}

fn parse_report(arg: &str) -> Result<Command> {
    arg.parse::<i64>()
        .map(Command::GetReportById)
        .map_err(|_| invalid(format!("the id should be a valid integer, got '{arg}'")))
}

fn parse_barcode(args: &[&str]) -> Result<Command> {
    let value = args
        .iter()
        .find_map(|arg| arg.strip_prefix(BARCODE_PREFIX))
        .ok_or_else(|| invalid("barcode argument is missing"))?;
    let barcode = value.trim();
    if barcode.is_empty() {
        return Err(invalid("barcode should not be blank"));
    }
    Ok(Command::GetByBarcode(barcode.to_string()))
}

fn invalid(reason: impl Into<String>) -> PantryError {
    PantryError::InvalidMessage(reason.into())
}
