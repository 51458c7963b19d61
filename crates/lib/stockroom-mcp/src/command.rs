//! Text commands of the form `buy_items id,qty id,qty ...`.

use std::{error::Error, fmt};

use stockroom_client::{ClientError, InventoryClient};
use stockroom_store::models::LineItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListItems,
    BuyItems(Vec<LineItem>),
    RestockItems(Vec<LineItem>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    EmptyPrompt,
    InvalidFormat(String),
    InvalidId(String),
    InvalidQuantity(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrompt => f.write_str("Empty prompt"),
            Self::InvalidFormat(token) => {
                write!(f, "invalid item format: {token}. Expected id,quantity")
            }
            Self::InvalidId(value) => write!(f, "invalid item id: {value}"),
            Self::InvalidQuantity(value) => write!(f, "invalid item quantity: {value}"),
        }
    }
}

impl Error for CommandError {}

/// Parses a whitespace-separated prompt. The first word selects the command.
///
/// # Errors
/// Returns `CommandError` for an empty prompt or a malformed `id,quantity`
/// token after `buy_items`/`restock_items`.
pub fn parse_command(prompt: &str) -> Result<Command, CommandError> {
    let mut words = prompt.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::EmptyPrompt);
    };
    match name {
        "list_items" => Ok(Command::ListItems),
        "buy_items" => parse_lines(words).map(Command::BuyItems),
        "restock_items" => parse_lines(words).map(Command::RestockItems),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

fn parse_lines<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Vec<LineItem>, CommandError> {
    tokens.map(parse_line).collect()
}

fn parse_line(token: &str) -> Result<LineItem, CommandError> {
    let mut parts = token.split(',');
    let (Some(id), Some(quantity), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CommandError::InvalidFormat(token.to_string()));
    };
    let id = id
        .parse()
        .map_err(|_| CommandError::InvalidId(id.to_string()))?;
    let quantity = quantity
        .parse()
        .map_err(|_| CommandError::InvalidQuantity(quantity.to_string()))?;
    Ok(LineItem::new(id, quantity))
}

/// Runs a parsed command against the inventory API.
///
/// # Errors
/// Returns the client's error when the API call fails or rejects the batch.
pub async fn run_command(client: &InventoryClient, command: Command) -> Result<String, ClientError> {
    match command {
        Command::ListItems => client.list_items().await,
        Command::BuyItems(lines) => client.buy_items(&lines).await,
        Command::RestockItems(lines) => client.restock_items(&lines).await,
        Command::Unknown(name) => Ok(format!("Unknown command: {name}")),
    }
}
