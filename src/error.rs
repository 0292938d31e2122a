use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Purchase endpoint answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Purchase rejected: {message}")]
    PurchaseRejected { message: String },
    #[error("Malformed purchase response: {0}")]
    MalformedResponse(String),
    #[error("Unsupported expression `{expression}`: {reason}")]
    Expression { expression: String, reason: String },
    #[error("A purchase was already submitted from this checkout")]
    AlreadySubmitted,
    #[error("Purchase task aborted: {0}")]
    Aborted(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
