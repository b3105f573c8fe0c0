use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file type '{mime_type}': please select an image file")]
    UnsupportedType { mime_type: String },

    #[error("Failed to read the file: {0}")]
    Read(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Reply for '{contract}' violated its output contract: {detail}")]
    SchemaViolation { contract: String, detail: String },

    #[error("Please select an image first")]
    NoImageSelected,

    #[error("A recipe is already being generated")]
    RequestInFlight,

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`Error`], stable enough to hand to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedType,
    Read,
    ModelUnavailable,
    SchemaViolation,
    NoImageSelected,
    RequestInFlight,
    InvalidInput,
    NotFound,
    Internal,
}

impl Error {
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn schema_violation(contract: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaViolation {
            contract: contract.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Self::Read(_) | Self::InvalidDataUri(_) => ErrorKind::Read,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            Self::NoImageSelected => ErrorKind::NoImageSelected,
            Self::RequestInFlight => ErrorKind::RequestInFlight,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::SessionNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }

    /// Text fit for an end user. Contract violation details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::SchemaViolation { .. } => {
                "The model's reply did not match the expected recipe format.".to_string()
            }
            Self::ModelUnavailable(msg) => format!("The recipe model is unavailable: {}", msg),
            Self::Config(_)
            | Self::Serialization(_)
            | Self::Yaml(_)
            | Self::Io(_)
            | Self::AddrParse(_)
            | Self::InvalidTransition { .. }
            | Self::Internal(_) => "An unknown error occurred while generating the recipe.".to_string(),
            other => other.to_string(),
        }
    }
}
