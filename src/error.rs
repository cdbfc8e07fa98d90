use thiserror::Error;

/// Failure of a single address lookup. The pipeline logs these and moves on.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("usps: missing username")]
    MissingUsername,

    #[error("usps: address not found")]
    AddressNotFound,

    #[error("usps: unexpected result status: '{0}'")]
    UnexpectedStatus(String),

    /// Error element returned by the XML API
    #[error("usps: api error: {description}")]
    Api { number: String, description: String },

    #[error("usps: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("usps: JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("usps: XML (de)serialization failed: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Errors that end a run.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("failed to open input file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("pipeline task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
