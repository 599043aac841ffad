use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Duplicate item in catalog: {0}")]
    DuplicateItem(String),

    #[error("Invalid slot index: {0}")]
    InvalidSlot(usize),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PetError>;
