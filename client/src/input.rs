//! Terminal commands typed by the player

use shared::MIN_NAME_LEN;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(String),
    NewCard,
    Start,
    Bingo,
    Reset,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("type a command, or `help`")]
    Empty,
    #[error("please enter a name of at least {} characters", MIN_NAME_LEN)]
    NameTooShort,
    #[error("unknown command `{0}`")]
    Unknown(String),
}

pub const HELP: &str = "commands: join <name> | card | start | bingo | reset | status | quit";

/// Parses one line from stdin
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(InputError::Empty),
        "join" | "name" => {
            if rest.chars().count() < MIN_NAME_LEN {
                Err(InputError::NameTooShort)
            } else {
                Ok(Command::Join(rest.to_string()))
            }
        }
        "card" | "new" => Ok(Command::NewCard),
        "start" => Ok(Command::Start),
        "bingo" | "claim" => Ok(Command::Bingo),
        "reset" => Ok(Command::Reset),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(InputError::Unknown(other.to_string())),
    }
}
