//! Error types for formflow
//!
//! [`Error`] is the single failure type returned by the service layer. Every
//! variant classifies to an HTTP status through [`Error::status`], so the
//! boundary layer can render any failure without inspecting its origin.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for formflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the service
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Domain error carrying its own status, e.g. an unknown form mapper.
    #[error("{message}")]
    Business { status: StatusCode, message: String },

    /// The workflow engine answered with something we could not read.
    /// The application row stays persisted without a process instance.
    #[error("{message} (application {application_id}): {source}")]
    WorkflowGateway {
        application_id: i64,
        message: String,
        #[source]
        source: ApiError,
    },

    /// The workflow start failed for any other reason.
    /// The application row stays persisted without a process instance.
    #[error("{message} (application {application_id}): {source}")]
    WorkflowRejected {
        application_id: i64,
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("The required fields of Input request are not passed: {0}")]
    MissingField(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Access denied. The credential is not authorized for any form.")]
    Forbidden,
}

impl Error {
    /// Build a business error with an explicit status.
    pub fn business(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Business {
            status,
            message: message.into(),
        }
    }

    /// HTTP status the boundary layer should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Business { status, .. } => *status,
            Error::WorkflowGateway { .. } => StatusCode::BAD_GATEWAY,
            Error::WorkflowRejected { .. } => StatusCode::BAD_REQUEST,
            Error::MissingField(_) | Error::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Api(api) => api.status(),
            Error::Store(_) | Error::Config(_) | Error::Io(_) | Error::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Structured body for the boundary layer. Forbidden answers carry no body.
    pub fn body(&self) -> Option<ErrorBody> {
        match self {
            Error::Forbidden => None,
            Error::WorkflowGateway {
                application_id,
                message,
                source,
            }
            | Error::WorkflowRejected {
                application_id,
                message,
                source,
            } => Some(ErrorBody {
                message: message.clone(),
                error: Some(source.to_string()),
                application_id: Some(*application_id),
            }),
            other => Some(ErrorBody {
                message: other.to_string(),
                error: None,
                application_id: None,
            }),
        }
    }
}

/// Serializable failure body
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<i64>,
}

/// Errors raised by the external BPM engine and authorization provider clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. The credential was rejected by the workflow engine.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Process key not configured for form {0}")]
    MissingProcessKey(String),
}

impl ApiError {
    /// Status used when an authorization lookup fails outright.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::MissingProcessKey(_) => StatusCode::BAD_REQUEST,
            ApiError::ServerError(_) | ApiError::Network(_) | ApiError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to workflow engine".to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Application store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store I/O error: {0}")]
    Io(String),

    #[error("Corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("Unsupported store schema version {found} (expected {expected})")]
    SchemaVersion { found: i32, expected: i32 },

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `formflow init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Workflow engine URL not configured. Run `formflow init --bpm-url <URL>`.")]
    MissingBpmUrl,

    #[error("No credential provided. Pass --token or set FORMFLOW_TOKEN.")]
    MissingToken,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
