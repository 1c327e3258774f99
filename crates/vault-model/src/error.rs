use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid template id: {0:?}")]
    InvalidTemplateId(String),
    #[error("invalid version number: {0:?} (expected major.minor.patch)")]
    InvalidVersionNumber(String),
    #[error("invalid color token path: {0:?}")]
    InvalidTokenPath(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
