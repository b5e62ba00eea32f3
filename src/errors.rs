use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetRecError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid field '{field}'. Allowed fields are: {allowed}")]
    InvalidField { field: String, allowed: String },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Ambiguous entity: multiple users named '{0}'")]
    AmbiguousEntity(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl NetRecError {
    /// Error for a structured lookup on a field outside the allow-list.
    pub fn invalid_field(field: &str, allowed: &[&str]) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            allowed: allowed.join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetRecError>;
