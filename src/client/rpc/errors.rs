use core::fmt;

use crate::errors::AuthError;

// RPC ERROR
// ================================================================================================

#[derive(Debug)]
pub enum RpcError {
    AuthenticationError(AuthError),
    ConnectionError(String),
    DeserializationError(String),
    InvalidEndpoint(String),
    /// The request could not be sent or its response could not be read.
    RequestError(String, String),
    /// The API answered with a non-success status code.
    ResponseStatus {
        endpoint: String,
        status: u16,
        message: String,
    },
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::AuthenticationError(err) => write!(f, "failed to authenticate: {err}"),
            RpcError::ConnectionError(err) => {
                write!(f, "failed to connect to the API server: {err}")
            },
            RpcError::DeserializationError(err) => {
                write!(f, "failed to deserialize API response: {err}")
            },
            RpcError::InvalidEndpoint(err) => write!(f, "invalid API endpoint: {err}"),
            RpcError::RequestError(endpoint, err) => {
                write!(f, "rpc request failed for {endpoint}: {err}")
            },
            RpcError::ResponseStatus { endpoint, status, message } => {
                write!(f, "{endpoint} returned status {status}: {message}")
            },
        }
    }
}

impl std::error::Error for RpcError {}

// ERROR CONVERSIONS
// ================================================================================================

impl From<AuthError> for RpcError {
    fn from(err: AuthError) -> Self {
        Self::AuthenticationError(err)
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializationError(err.to_string())
    }
}
