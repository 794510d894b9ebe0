use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("Malformed document '{id}': {reason}")]
    MalformedDocument { id: String, reason: String },
    #[error("Store query failed on '{collection}': {message}")]
    QueryFailure { collection: String, message: String },
}

impl DataError {
    pub fn query_failure(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryFailure {
            collection: collection.into(),
            message: message.into(),
        }
    }
}
