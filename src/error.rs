use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session failed: {0}")]
    WebDriverSession(#[from] fantoccini::error::NewSessionError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Page channel error: {0}")]
    Channel(String),

    #[error("Discarded stale response to request #{0}")]
    StaleResponse(u64),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InspectError>;
