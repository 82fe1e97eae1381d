use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BiasError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Feed timed out: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
