use core::{fmt, str::FromStr};
use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// CONTRACT REFERENCE
// ================================================================================================

/// Identifies one version of a deployed contract. Written as `name@version`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ContractRef {
    pub name: String,
    pub version: String,
}

impl ContractRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl FromStr for ContractRef {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (name, version) = value
            .split_once('@')
            .ok_or_else(|| format!("contract `{value}` is not of the form `name@version`"))?;

        if name.is_empty() || version.is_empty() {
            return Err(format!("contract `{value}` is missing its name or version"));
        }

        Ok(Self::new(name, version))
    }
}

// CONTRACTS
// ================================================================================================

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractSummary {
    pub name: String,
    #[serde(default)]
    pub latest_version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractVersion {
    pub version: String,
    pub status: String,
    #[serde(default)]
    pub deployed_at: Option<DateTime<Utc>>,
}

// JOBS
// ================================================================================================

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Deployment,
    Transaction,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Deployment => write!(f, "deployment"),
            JobKind::Transaction => write!(f, "transaction"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Returns true once the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// An asynchronous deployment or transaction tracked by the platform.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Job {
    pub id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// TRANSACTIONS
// ================================================================================================

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: String,
    pub contract: String,
    pub method: String,
    pub status: String,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ATTACHMENT
// ================================================================================================

/// A file uploaded alongside a method call or a deployment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    const DEFAULT_CONTENT_TYPE: &'static str = "application/octet-stream";

    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Self::DEFAULT_CONTENT_TYPE.to_string(),
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Reads the attachment from disk, naming it after the file.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, bytes).with_content_type(content_type_for(path)))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("zip") => "application/zip",
        Some("gz") | Some("tgz") => "application/gzip",
        Some("tar") => "application/x-tar",
        _ => Attachment::DEFAULT_CONTENT_TYPE,
    }
}

// AUTH
// ================================================================================================

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}
