use alloc::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    config::PollingConfig,
    rpc::{
        domain::{
            Attachment, ContractRef, ContractSummary, ContractVersion, Job, JobKind, JobStatus,
            TransactionRecord,
        },
        ApiClient, RpcApiEndpoint, RpcError,
    },
    validation::{Arguments, ContractMetadata, MethodDescriptor, ParamDescriptor},
    Client,
};

pub type MockClient = Client<MockApiClient>;

/// Name and version under which [mock_contract_metadata] is served.
pub const MOCK_CONTRACT: (&str, &str) = ("registry", "1.0.0");

// MOCK API CLIENT
// ================================================================================================

/// A method call received by [MockApiClient].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub contract: ContractRef,
    pub method: String,
    pub args: Arguments,
    pub attachments: Vec<String>,
}

/// In-memory implementation of [ApiClient] intended for testing purposes only.
///
/// It serves canned contract metadata, records every call it receives and reports job statuses
/// from a queue so polling can be scripted.
#[derive(Default)]
pub struct MockApiClient {
    metadata: BTreeMap<String, ContractMetadata>,
    job_statuses: Mutex<VecDeque<JobStatus>>,
    invocations: Mutex<Vec<RecordedCall>>,
    queries: Mutex<Vec<RecordedCall>>,
    deployments: Mutex<Vec<(ContractRef, Attachment)>>,
}

impl MockApiClient {
    /// Returns a mock serving [mock_contract_metadata] as [MOCK_CONTRACT].
    pub fn new() -> Self {
        Self::default().with_metadata(&mock_contract_ref(), mock_contract_metadata())
    }

    pub fn with_metadata(mut self, contract: &ContractRef, metadata: ContractMetadata) -> Self {
        self.metadata.insert(contract.to_string(), metadata);
        self
    }

    /// Statuses reported by successive `get_job` calls. Once exhausted, jobs stay `running`.
    pub fn with_job_statuses(self, statuses: impl IntoIterator<Item = JobStatus>) -> Self {
        if let Ok(mut queue) = self.job_statuses.lock() {
            queue.extend(statuses);
        }
        self
    }

    pub fn invocations(&self) -> Vec<RecordedCall> {
        self.invocations.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn queries(&self) -> Vec<RecordedCall> {
        self.queries.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn deployments(&self) -> Vec<(ContractRef, Attachment)> {
        self.deployments.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn lookup(&self, contract: &ContractRef) -> Result<&ContractMetadata, RpcError> {
        self.metadata.get(&contract.to_string()).ok_or_else(|| RpcError::ResponseStatus {
            endpoint: RpcApiEndpoint::GetMetadata.to_string(),
            status: 404,
            message: format!("contract {contract} not found"),
        })
    }

    fn record(store: &Mutex<Vec<RecordedCall>>, call: RecordedCall) {
        if let Ok(mut calls) = store.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, RpcError> {
        Ok(self
            .metadata
            .keys()
            .filter_map(|key| key.parse::<ContractRef>().ok())
            .map(|contract| ContractSummary {
                name: contract.name,
                latest_version: Some(contract.version),
                description: None,
            })
            .collect())
    }

    async fn get_contract_versions(&self, name: &str) -> Result<Vec<ContractVersion>, RpcError> {
        Ok(self
            .metadata
            .keys()
            .filter_map(|key| key.parse::<ContractRef>().ok())
            .filter(|contract| contract.name == name)
            .map(|contract| ContractVersion {
                version: contract.version,
                status: "deployed".to_string(),
                deployed_at: None,
            })
            .collect())
    }

    async fn get_metadata(&self, contract: &ContractRef) -> Result<ContractMetadata, RpcError> {
        self.lookup(contract).cloned()
    }

    async fn deploy_contract(
        &self,
        contract: &ContractRef,
        bundle: Attachment,
    ) -> Result<Job, RpcError> {
        if let Ok(mut deployments) = self.deployments.lock() {
            deployments.push((contract.clone(), bundle));
        }
        Ok(mock_job("deploy-1", JobKind::Deployment, JobStatus::Pending))
    }

    async fn remove_contract(&self, contract: &ContractRef) -> Result<(), RpcError> {
        self.lookup(contract).map(|_| ())
    }

    async fn invoke_method(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
        attachments: Vec<Attachment>,
    ) -> Result<Job, RpcError> {
        self.lookup(contract)?;
        Self::record(
            &self.invocations,
            RecordedCall {
                contract: contract.clone(),
                method: method.to_string(),
                args: args.clone(),
                attachments: attachments.into_iter().map(|a| a.file_name).collect(),
            },
        );
        Ok(mock_job("invoke-1", JobKind::Transaction, JobStatus::Pending))
    }

    async fn query_method(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
    ) -> Result<Value, RpcError> {
        self.lookup(contract)?;
        Self::record(
            &self.queries,
            RecordedCall {
                contract: contract.clone(),
                method: method.to_string(),
                args: args.clone(),
                attachments: vec![],
            },
        );
        Ok(json!({ "method": method, "args": args }))
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, RpcError> {
        let status = self
            .job_statuses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or(JobStatus::Running);

        let mut job = mock_job(job_id, JobKind::Transaction, status);
        if status == JobStatus::Failed {
            job.error = Some("execution reverted".to_string());
        }
        Ok(job)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, RpcError> {
        Ok(vec![mock_job("invoke-1", JobKind::Transaction, JobStatus::Succeeded)])
    }

    async fn cancel_job(&self, job_id: &str) -> Result<Job, RpcError> {
        Ok(mock_job(job_id, JobKind::Transaction, JobStatus::Cancelled))
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, RpcError> {
        Ok(TransactionRecord {
            id: transaction_id.to_string(),
            contract: mock_contract_ref().to_string(),
            method: "setValue".to_string(),
            status: "confirmed".to_string(),
            block_number: Some(42),
            result: None,
            created_at: None,
        })
    }
}

// MOCK DATA
// ================================================================================================

/// Returns a client backed by [MockApiClient::new] that polls jobs every millisecond.
pub fn create_test_client() -> MockClient {
    create_test_client_with(MockApiClient::new())
}

pub fn create_test_client_with(api: MockApiClient) -> MockClient {
    Client::new(api, PollingConfig { interval_ms: 1, timeout_ms: 200 })
}

pub fn mock_contract_ref() -> ContractRef {
    ContractRef::new(MOCK_CONTRACT.0, MOCK_CONTRACT.1)
}

fn mock_job(id: &str, kind: JobKind, status: JobStatus) -> Job {
    Job {
        id: id.to_string(),
        kind,
        status,
        result: None,
        error: None,
        transaction_id: (status == JobStatus::Succeeded).then(|| format!("tx-{id}")),
        created_at: None,
        updated_at: None,
    }
}

/// Metadata of a contract exercising the supported parameter shapes.
pub fn mock_contract_metadata() -> ContractMetadata {
    let methods = [
        ("anArr", vec![ParamDescriptor::new("first", "uint[]")]),
        (
            "twoArrs",
            vec![ParamDescriptor::new("first", "uint[]"), ParamDescriptor::new("second", "uint[]")],
        ),
        ("nestedArr1", vec![ParamDescriptor::new("first", "uint[5]")]),
        ("nestedArr4", vec![ParamDescriptor::new("first", "uint[3][3]")]),
        (
            "setValue",
            vec![ParamDescriptor::new("value", "uint256"), ParamDescriptor::new("label", "string")],
        ),
        ("setFlags", vec![ParamDescriptor::new("flags", "bool[2][3]")]),
        ("setLabel", vec![ParamDescriptor::new("label", "string")]),
    ];

    let mut metadata = ContractMetadata::default();
    metadata.contract.name = Some(MOCK_CONTRACT.0.to_string());
    metadata.contract.version = Some(MOCK_CONTRACT.1.to_string());
    metadata.contract.methods = methods
        .into_iter()
        .map(|(name, params)| (name.to_string(), MethodDescriptor { params }))
        .collect();
    metadata
}
