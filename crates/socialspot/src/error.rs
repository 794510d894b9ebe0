use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialSpotError {
    #[error("Search error: {0}")]
    SearchError(#[from] crate::search::SearchError),
    #[error("Geo error: {0}")]
    GeoError(#[from] crate::geo::GeoError),
    #[error("Data error: {0}")]
    DataError(#[from] socialspot_data::DataError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SocialSpotError>;
