use thiserror::Error;

use crate::io::{ItemId, UserId};

/// Errors raised while loading ratings and books or assembling the matrix.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rating matrix has no user id column")]
    MissingUserColumn,

    #[error("invalid user id {value:?} on line {line}")]
    InvalidUserId { value: String, line: u64 },

    #[error("invalid rating {value:?} for user {user_id} on line {line}")]
    InvalidRating {
        value: String,
        user_id: UserId,
        line: u64,
    },

    #[error("duplicate user {0} in rating matrix")]
    DuplicateUser(UserId),

    #[error("duplicate item {0} in rating matrix")]
    DuplicateItem(ItemId),

    #[error("row of user {user_id} has {actual} ratings, expected {expected}")]
    RowLength {
        user_id: UserId,
        expected: usize,
        actual: usize,
    },
}

/// Configuration problems, reported with the offending key.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {message}")]
    File { path: String, message: String },

    #[error("invalid or missing config value {key}: {message}")]
    Value { key: String, message: String },
}
