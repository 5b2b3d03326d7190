use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown pipeline stage '{0}' (expected one of: recode-semiq, merge-braak, diagnostic-categories)")]
    UnknownStage(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
