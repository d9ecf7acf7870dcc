use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row} has an empty value for required column {column}")]
    EmptyField { row: usize, column: String },

    #[error("row {row} has a non-numeric value {value:?} in column {column}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("no label found for {0}")]
    NoMatch(String),

    #[error("label for {0} has no usable text")]
    EmptyPayload(String),
}

#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type Result<T, E = ChatbotError> = std::result::Result<T, E>;
