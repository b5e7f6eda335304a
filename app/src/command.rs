//! Parsing of input lines into user actions.

use thiserror::Error;

/// One user action, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the add-input text.
    NewDraft(String),
    Add,
    /// Start editing the given 1-based row.
    Edit(usize),
    /// Replace the edit-input text.
    EditDraft(String),
    Save,
    Cancel,
    Delete(usize),
    Redraw,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),
    #[error("`{0}` is not a row number")]
    BadRow(String),
}

pub const HELP: &str = "commands: new <text> | add | edit <row> | text <text> | save | cancel | delete <row> | quit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };
    match word {
        "" => Ok(Command::Redraw),
        "new" => Ok(Command::NewDraft(rest.to_string())),
        "add" => Ok(Command::Add),
        "edit" => row("edit", rest).map(Command::Edit),
        "text" => Ok(Command::EditDraft(rest.to_string())),
        "save" => Ok(Command::Save),
        "cancel" => Ok(Command::Cancel),
        "delete" => row("delete", rest).map(Command::Delete),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn row(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::MissingRow(command));
    }
    arg.parse().map_err(|_| CommandError::BadRow(arg.to_string()))
}
