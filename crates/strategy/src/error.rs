use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StrategyError {
    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(String),
}
