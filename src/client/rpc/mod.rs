//! Provides an interface for the client to communicate with the contract platform API.
//!
//! The [ApiClient] trait abstracts the REST endpoints used to:
//!
//! - List contracts and their versions, and fetch the metadata of a version.
//! - Deploy and remove contract versions.
//! - Invoke and query contract methods, optionally with file attachments.
//! - Track the asynchronous jobs and transactions those calls create.
//!
//! [HttpApiClient] implements it on top of `reqwest`.

use async_trait::async_trait;
use core::fmt;
use serde_json::Value;

pub mod domain;
use domain::{Attachment, ContractRef, ContractSummary, ContractVersion, Job, TransactionRecord};

mod errors;
pub use errors::RpcError;

mod http_client;
pub use http_client::HttpApiClient;

#[cfg(test)]
pub(crate) mod test_server;

use crate::validation::{Arguments, ContractMetadata};

// API CLIENT TRAIT
// ================================================================================================

/// Defines the interface for communicating with the contract platform.
///
/// Implementers are responsible for authenticating requests, translating responses into domain
/// objects and mapping failures to [RpcError]s.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Lists the contracts known to the platform using `GET /contracts`.
    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, RpcError>;

    /// Lists the versions of a contract using `GET /contracts/{name}/versions`.
    async fn get_contract_versions(&self, name: &str) -> Result<Vec<ContractVersion>, RpcError>;

    /// Fetches the method signatures of a contract version.
    async fn get_metadata(&self, contract: &ContractRef) -> Result<ContractMetadata, RpcError>;

    /// Uploads a contract bundle and starts its deployment. The returned job tracks the
    /// deployment.
    async fn deploy_contract(
        &self,
        contract: &ContractRef,
        bundle: Attachment,
    ) -> Result<Job, RpcError>;

    async fn remove_contract(&self, contract: &ContractRef) -> Result<(), RpcError>;

    /// Submits a state-changing method call. Attachments, if any, are uploaded in the same
    /// request.
    async fn invoke_method(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
        attachments: Vec<Attachment>,
    ) -> Result<Job, RpcError>;

    /// Evaluates a read-only method call and returns its result directly.
    async fn query_method(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
    ) -> Result<Value, RpcError>;

    async fn get_job(&self, job_id: &str) -> Result<Job, RpcError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, RpcError>;

    async fn cancel_job(&self, job_id: &str) -> Result<Job, RpcError>;

    async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, RpcError>;
}

// RPC API ENDPOINT
// ================================================================================================

#[derive(Clone, Copy, Debug)]
pub enum RpcApiEndpoint {
    CancelJob,
    DeployContract,
    GetContractVersions,
    GetJob,
    GetMetadata,
    GetTransaction,
    InvokeMethod,
    ListContracts,
    ListJobs,
    QueryMethod,
    RemoveContract,
    RequestToken,
}

impl RpcApiEndpoint {
    /// Returns true if repeating the request cannot apply its effect twice.
    ///
    /// Deployments and invocations create jobs on the platform, so they are only resent when the
    /// first attempt never reached the server.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, RpcApiEndpoint::DeployContract | RpcApiEndpoint::InvokeMethod)
    }
}

impl fmt::Display for RpcApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcApiEndpoint::CancelJob => write!(f, "cancel_job"),
            RpcApiEndpoint::DeployContract => write!(f, "deploy_contract"),
            RpcApiEndpoint::GetContractVersions => write!(f, "get_contract_versions"),
            RpcApiEndpoint::GetJob => write!(f, "get_job"),
            RpcApiEndpoint::GetMetadata => write!(f, "get_metadata"),
            RpcApiEndpoint::GetTransaction => write!(f, "get_transaction"),
            RpcApiEndpoint::InvokeMethod => write!(f, "invoke_method"),
            RpcApiEndpoint::ListContracts => write!(f, "list_contracts"),
            RpcApiEndpoint::ListJobs => write!(f, "list_jobs"),
            RpcApiEndpoint::QueryMethod => write!(f, "query_method"),
            RpcApiEndpoint::RemoveContract => write!(f, "remove_contract"),
            RpcApiEndpoint::RequestToken => write!(f, "request_token"),
        }
    }
}
