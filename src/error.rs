use thiserror::Error;

/// Errors raised by the session tracker
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// Submit was pressed before anything was typed
    #[error("please type something before submitting")]
    EmptyInput,
}

/// Errors raised while exporting or importing the session history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv output was not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised by the configuration store
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while training the personality model
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("could not build feature matrix: {0}")]
    Matrix(&'static str),

    #[error("model training failed: {0}")]
    Fit(#[from] aprender::error::AprenderError),
}
