use std::path::Path;

use tracing::info;

use super::{
    rpc::{
        domain::{Attachment, ContractRef, ContractSummary, ContractVersion, Job},
        ApiClient,
    },
    Client,
};
use crate::{
    errors::ClientError,
    validation::{ContractMetadata, MethodConstraints},
};

impl<A: ApiClient> Client<A> {
    // CONTRACT DATA RETRIEVAL
    // --------------------------------------------------------------------------------------------

    /// Returns summaries of all contracts known to the platform.
    pub async fn list_contracts(&self) -> Result<Vec<ContractSummary>, ClientError> {
        self.api.list_contracts().await.map_err(ClientError::RpcError)
    }

    /// Returns the deployed versions of the contract called `name`.
    pub async fn get_contract_versions(&self, name: &str) -> Result<Vec<ContractVersion>, ClientError> {
        self.api.get_contract_versions(name).await.map_err(ClientError::RpcError)
    }

    /// Returns the method signatures declared by a contract version.
    pub async fn get_metadata(&self, contract: &ContractRef) -> Result<ContractMetadata, ClientError> {
        self.api.get_metadata(contract).await.map_err(ClientError::RpcError)
    }

    /// Fetches the metadata of a contract version and extracts its parameter constraints.
    pub async fn get_method_constraints(
        &self,
        contract: &ContractRef,
    ) -> Result<MethodConstraints, ClientError> {
        let metadata = self.get_metadata(contract).await?;
        Ok(MethodConstraints::from_metadata(&metadata))
    }

    // DEPLOYMENT
    // --------------------------------------------------------------------------------------------

    /// Uploads the bundle at `bundle_path` and starts deploying it as `contract`.
    ///
    /// The deployment runs asynchronously; use [Client::wait_for_job] on the returned job to
    /// wait for it.
    pub async fn deploy(&self, contract: &ContractRef, bundle_path: &Path) -> Result<Job, ClientError> {
        let bundle = Attachment::read(bundle_path).map_err(|err| {
            ClientError::AttachmentError(format!("failed to read {}: {err}", bundle_path.display()))
        })?;

        info!("Deploying {contract} from {} ({} bytes)", bundle.file_name, bundle.bytes.len());
        Ok(self.api.deploy_contract(contract, bundle).await?)
    }

    /// Removes a deployed contract version.
    pub async fn remove_contract(&self, contract: &ContractRef) -> Result<(), ClientError> {
        info!("Removing {contract}");
        Ok(self.api.remove_contract(contract).await?)
    }
}
