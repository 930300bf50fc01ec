use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "invalid type {type_name} found in input name '{field}', please use one of {}",
        .valid.join(", ")
    )]
    InvalidType {
        type_name: String,
        field: String,
        valid: Vec<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid option '{option}'. Please use one of {}", .valid.join(", "))]
    InvalidOption { option: String, valid: Vec<String> },

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
