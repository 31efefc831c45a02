use thiserror::Error;

/// Error type for every fallible operation in the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Client-side argument validation failure, raised before anything is
    /// submitted to the engine
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Option error: {0}")]
    InvalidOption(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),

    /// Failure reported by the execution engine, surfaced verbatim
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[source] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[source] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[source] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[source] serde_yaml::Error),

    #[error("URL error: {0}")]
    Url(#[source] url::ParseError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Whether this error came from client-side argument validation
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Url(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(format!("invalid pattern: {}", err))
    }
}

#[cfg(feature = "parquet")]
impl From<parquet::errors::ParquetError> for Error {
    fn from(err: parquet::errors::ParquetError) -> Self {
        Error::Parquet(err.to_string())
    }
}

#[cfg(feature = "parquet")]
impl From<arrow::error::ArrowError> for Error {
    fn from(err: arrow::error::ArrowError) -> Self {
        Error::Parquet(err.to_string())
    }
}
