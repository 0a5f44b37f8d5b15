use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuntError {
    #[error("Cell ({x}, {y}) already occupied")]
    Occupied { x: i32, y: i32 },

    #[error("No agent at position ({x}, {y})")]
    NoOccupant { x: i32, y: i32 },

    #[error("Position ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HuntError>;
