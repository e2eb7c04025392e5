//! Line-oriented front-end for the todo store.
//!
//! Each input line is one user interaction: typing into the input field,
//! pressing "Add", clicking a checkbox, editing a row or pressing "Remove".
//! Rows are addressed by their 1-based position in the last rendered
//! [`Frame`].
//!
//! Toggles carry the flag value from the last rendered frame, not the value
//! currently in the store. This is the same contract a rendered checkbox has:
//! it reports what it showed.

use crate::types::{TodoAction, TodoId, TodoState};
use crate::TodoStore;
use reducer_runtime::StoreError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
commands:
  type <text>        set the input field
  add [text]         add the input field (or <text>) as a new todo
  check <row>        toggle the checkbox of a row
  edit <row> <text>  replace the text of a row (not while checked)
  remove <row>       remove a row from the list
  list               show the list again
  json               print the visible todos as JSON
  help               show this help
  quit               exit";

/// Errors reported to the user; none of them reach the store
#[derive(Error, Debug)]
pub enum UiError {
    /// Unrecognised command word
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    /// A required argument was not given
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command that was entered
        command: &'static str,
        /// Description of what is missing
        argument: &'static str,
    },

    /// Row argument is not a positive number
    #[error("`{0}` is not a row number")]
    InvalidRow(String),

    /// Row number is not on screen
    #[error("there is no row {0}")]
    RowNotFound(usize),

    /// The row's text field is disabled because it is checked off
    #[error("row {0} is checked off and cannot be edited")]
    RowLocked(usize),

    /// The store rejected the action
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON rendering failed
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One user interaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace the input field
    Type(String),
    /// Press "Add", optionally typing the text first
    Add(Option<String>),
    /// Click the checkbox of a row
    Check(usize),
    /// Replace the text of a row
    Edit(usize, String),
    /// Press "Remove" on a row
    Remove(usize),
    /// Render the list again
    List,
    /// Print the visible todos as JSON
    Json,
    /// Show the help text
    Help,
    /// Leave the shell
    Quit,
}

impl FromStr for Command {
    type Err = UiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let word = word.trim_end();

        match word {
            "type" => Ok(Self::Type(rest.to_string())),
            "add" | "submit" => Ok(Self::Add((!rest.trim().is_empty()).then(|| rest.to_string()))),
            "check" => parse_row("check", rest).map(Self::Check),
            "edit" => {
                let rest = rest.trim_start();
                let (row, text) = rest.split_once(' ').unwrap_or((rest, ""));
                let row = parse_row("edit", row)?;
                Ok(Self::Edit(row, text.to_string()))
            },
            "remove" => parse_row("remove", rest).map(Self::Remove),
            "list" | "ls" => Ok(Self::List),
            "json" => Ok(Self::Json),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(UiError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_row(command: &'static str, arg: &str) -> Result<usize, UiError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(UiError::MissingArgument {
            command,
            argument: "a row number",
        });
    }
    match arg.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(UiError::InvalidRow(arg.to_string())),
    }
}

/// A rendered list row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Todo shown on this row
    pub id: TodoId,
    /// Text as rendered
    pub value: String,
    /// Checkbox state as rendered
    pub done: bool,
    /// Visible flag as rendered
    pub visible: bool,
}

impl Row {
    /// The text field is disabled while the row is checked off
    #[must_use]
    pub const fn editable(&self) -> bool {
        !self.done
    }
}

/// What the user currently sees: the input field and the visible rows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Input field content
    pub input_text: String,
    /// Visible todos, newest first
    pub rows: Vec<Row>,
}

impl Frame {
    /// Renders the visible part of a state
    #[must_use]
    pub fn render(state: &TodoState) -> Self {
        Self {
            input_text: state.input_text.clone(),
            rows: state
                .visible_todos()
                .into_iter()
                .map(|todo| Row {
                    id: todo.id,
                    value: todo.value,
                    done: todo.done,
                    visible: todo.visible,
                })
                .collect(),
        }
    }

    /// Row by 1-based position
    ///
    /// # Errors
    ///
    /// Returns [`UiError::RowNotFound`] if the position is not on screen.
    pub fn row(&self, position: usize) -> Result<&Row, UiError> {
        position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .ok_or(UiError::RowNotFound(position))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "input: {}", self.input_text)?;
        if self.rows.is_empty() {
            return write!(f, "  (nothing to do)");
        }
        for (index, row) in self.rows.iter().enumerate() {
            let mark = if row.done { 'x' } else { ' ' };
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>3}. [{mark}] {}", index + 1, row.value)?;
        }
        Ok(())
    }
}

/// Result of handling one command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State may have changed; show the new frame
    Rendered,
    /// JSON text to print
    Json(String),
    /// Show the help text
    Help,
    /// Leave the shell
    Quit,
}

/// Connects commands to a [`TodoStore`] and keeps the last rendered frame
#[derive(Debug)]
pub struct Shell {
    store: TodoStore,
    frame: Frame,
}

impl Shell {
    /// Creates a shell around a store and renders its current state
    #[must_use]
    pub fn new(store: TodoStore) -> Self {
        let frame = store.state(Frame::render);
        Self { store, frame }
    }

    /// The last rendered frame
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Handles one command
    ///
    /// The frame is re-rendered after every command that sends actions.
    ///
    /// # Errors
    ///
    /// Returns a [`UiError`] when the command refers to a row that is not on
    /// screen, edits a checked-off row, or the store rejects an action. The
    /// store is left untouched in the row cases.
    pub fn handle(&mut self, command: Command) -> Result<Outcome, UiError> {
        let actions = match command {
            Command::Type(text) => vec![TodoAction::SetInputText { text }],
            Command::Add(None) => vec![TodoAction::Submit],
            Command::Add(Some(text)) => {
                vec![TodoAction::SetInputText { text }, TodoAction::Submit]
            },
            Command::Check(position) => {
                let row = self.frame.row(position)?;
                vec![TodoAction::ToggleDone {
                    id: row.id,
                    current: row.done,
                }]
            },
            Command::Edit(position, value) => {
                let row = self.frame.row(position)?;
                if !row.editable() {
                    return Err(UiError::RowLocked(position));
                }
                vec![TodoAction::EditTodo { id: row.id, value }]
            },
            Command::Remove(position) => {
                let row = self.frame.row(position)?;
                vec![TodoAction::ToggleRemoved {
                    id: row.id,
                    current: row.visible,
                }]
            },
            Command::List => Vec::new(),
            Command::Json => {
                let todos = self.store.state(TodoState::visible_todos);
                return Ok(Outcome::Json(serde_json::to_string_pretty(&todos)?));
            },
            Command::Help => return Ok(Outcome::Help),
            Command::Quit => return Ok(Outcome::Quit),
        };

        for action in actions {
            tracing::debug!(action = action.name(), "Dispatching");
            self.store.send(action)?;
        }
        self.frame = self.store.state(Frame::render);
        Ok(Outcome::Rendered)
    }
}
