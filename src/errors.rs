use core::fmt;

use thiserror::Error;

use crate::{
    client::rpc::{domain::JobStatus, RpcError},
    store::TokenStoreError,
    validation::ValueKind,
};

// CLIENT ERROR
// ================================================================================================

#[derive(Debug)]
pub enum ClientError {
    AttachmentError(String),
    AuthError(AuthError),
    JobFailed {
        job_id: String,
        status: JobStatus,
        reason: Option<String>,
    },
    JobTimeout {
        job_id: String,
        elapsed_ms: u128,
    },
    RpcError(RpcError),
    ValidationError(ValidationError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::AttachmentError(err) => write!(f, "attachment error: {err}"),
            ClientError::AuthError(err) => write!(f, "authentication error: {err}"),
            ClientError::JobFailed { job_id, status, reason } => match reason {
                Some(reason) => write!(f, "job {job_id} finished as {status}: {reason}"),
                None => write!(f, "job {job_id} finished as {status}"),
            },
            ClientError::JobTimeout { job_id, elapsed_ms } => {
                write!(f, "job {job_id} did not complete within {elapsed_ms} ms")
            },
            ClientError::RpcError(err) => write!(f, "rpc api error: {err}"),
            ClientError::ValidationError(err) => write!(f, "invalid arguments: {err}"),
        }
    }
}

// CONVERSIONS
// ================================================================================================

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        Self::AuthError(err)
    }
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        Self::RpcError(err)
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

impl From<ClientError> for String {
    fn from(err: ClientError) -> String {
        err.to_string()
    }
}

impl std::error::Error for ClientError {}

// AUTH ERROR
// ================================================================================================

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    TokenRequestFailed(String),
    TokenRejected { status: u16, message: String },
    TokenStoreError(TokenStoreError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(
                f,
                "no valid access token cached and no client credentials configured to request one"
            ),
            AuthError::TokenRequestFailed(err) => {
                write!(f, "failed to request an access token: {err}")
            },
            AuthError::TokenRejected { status, message } => {
                write!(f, "token request rejected with status {status}: {message}")
            },
            AuthError::TokenStoreError(err) => write!(f, "token cache error: {err}"),
        }
    }
}

impl From<TokenStoreError> for AuthError {
    fn from(err: TokenStoreError) -> Self {
        Self::TokenStoreError(err)
    }
}

impl std::error::Error for AuthError {}

// VALIDATION ERROR
// ================================================================================================

/// Reasons a set of method arguments is rejected before the method is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("parameter `{param}` nests deeper than its declared type allows (level {level})")]
    TooManyDimensions { param: String, level: usize },
    #[error("array parameter `{param}` expected {expected} elements, got {actual}")]
    ArrayLengthMismatch {
        param: String,
        expected: usize,
        actual: usize,
    },
    #[error("array parameter `{param}` mixes elements of type {first} and {second}")]
    ArrayElementTypeMismatch {
        param: String,
        first: ValueKind,
        second: ValueKind,
    },
    #[error("array parameter `{param}` contains an element that is not an integer")]
    ArrayElementNotInt { param: String },
    #[error("array parameter `{param}` contains a negative integer")]
    ArrayElementNotUint { param: String },
    #[error("parameter `{param}` must be an integer")]
    NotInteger { param: String },
    #[error("parameter `{param}` must not be negative")]
    NotNonNegative { param: String },
    #[error("parameter `{param}` must be an array, got {found}")]
    NotAnArray { param: String, found: ValueKind },
    #[error("invalid type signature `{type_signature}`: {reason}")]
    InvalidTypeSignature {
        type_signature: String,
        reason: String,
    },
}
