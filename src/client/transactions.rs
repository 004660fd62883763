use std::path::PathBuf;

use serde_json::Value;
use tracing::info;

use super::{
    rpc::{
        domain::{Attachment, ContractRef, Job, TransactionRecord},
        ApiClient,
    },
    Client,
};
use crate::{
    errors::ClientError,
    validation::{validate_params, Arguments, MethodConstraints},
};

impl<A: ApiClient> Client<A> {
    // METHOD CALLS
    // --------------------------------------------------------------------------------------------

    /// Invokes `method` on a contract version with the provided arguments.
    ///
    /// The contract metadata is fetched and the arguments are validated against it first; if
    /// validation fails, nothing is sent and the validation error is returned. The invocation
    /// itself runs asynchronously on the platform and is tracked by the returned [Job].
    pub async fn invoke(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
    ) -> Result<Job, ClientError> {
        self.invoke_with_attachments(contract, method, args, &[]).await
    }

    /// Same as [Client::invoke], uploading the files at `attachment_paths` with the call.
    pub async fn invoke_with_attachments(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
        attachment_paths: &[PathBuf],
    ) -> Result<Job, ClientError> {
        self.validate_arguments(contract, method, args).await?;

        let attachments = attachment_paths
            .iter()
            .map(|path| {
                Attachment::read(path).map_err(|err| {
                    ClientError::AttachmentError(format!("failed to read {}: {err}", path.display()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Invoking {method} on {contract} with {} attachment(s)", attachments.len());
        Ok(self.api.invoke_method(contract, method, args, attachments).await?)
    }

    /// Evaluates a read-only `method` call and returns its result. Arguments are validated the
    /// same way as for [Client::invoke].
    pub async fn query(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
    ) -> Result<Value, ClientError> {
        self.validate_arguments(contract, method, args).await?;
        Ok(self.api.query_method(contract, method, args).await?)
    }

    /// Returns the record of a submitted transaction.
    pub async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, ClientError> {
        Ok(self.api.get_transaction(transaction_id).await?)
    }

    // VALIDATION
    // --------------------------------------------------------------------------------------------

    /// Checks `args` against the metadata of `contract` without sending the call.
    pub async fn validate_arguments(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
    ) -> Result<(), ClientError> {
        let metadata = self.get_metadata(contract).await?;
        let constraints = MethodConstraints::from_metadata(&metadata);
        validate_params(method, args, &constraints)?;
        Ok(())
    }
}
