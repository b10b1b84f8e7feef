use thiserror::Error;

#[derive(Error, Debug)]
pub enum SakError {
    #[error("No command specified")]
    MissingCommand,

    #[error("Unknown option: {0}")]
    UnknownCommand(String),

    #[error("Duplicate command name: {0}")]
    DuplicateCommand(String),

    #[error("{0}")]
    OptionParse(String),

    #[error("Unrecognized options: {}", .0.join(" "))]
    UnrecognizedOptions(Vec<String>),

    /// A leaf command's own failure, shown to the user as-is.
    #[error("{0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl SakError {
    pub fn command(message: impl Into<String>) -> Self {
        SakError::Command(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SakError>;
