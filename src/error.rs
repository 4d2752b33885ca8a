// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Card document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store index error: {0}")]
    Index(#[from] bincode::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    InvalidConfig { message: String },

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid share link: {0}")]
    Url(#[from] url::ParseError),

    #[error("Share link carries no card data")]
    MissingShareData,

    #[error("Invalid card id: {0:?}")]
    InvalidId(String),

    #[error("No fingerspelling tile for {0:?}")]
    UnknownLetter(char),

    #[error("Unknown card design: {0}")]
    UnknownDesign(String),

    #[error("Unknown layout direction: {0}")]
    UnknownLayout(String),

    #[error("Cannot create a card without any letters")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, CardError>;
