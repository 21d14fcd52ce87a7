use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid score value: {0}")]
    InvalidScore(String),

    #[error("Unknown difficulty: {0}")]
    InvalidDifficulty(String),
}
