use std::path::PathBuf;

use clap::Parser;
use contract_client::{config::ClientConfig, rpc::HttpApiClient, Client};

use super::{
    jobs::print_job,
    utils::{contract_or_default, parse_arguments},
};

// INVOKE COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Invoke a contract method. Arguments are validated before they are sent")]
pub struct InvokeCmd {
    /// Method to invoke
    method: String,

    /// Arguments as a JSON object, or `@file.json` to read them from a file
    #[clap(short, long)]
    args: Option<String>,

    /// Contract as `name@version`. Uses the configured default contract if omitted.
    #[clap(short, long)]
    contract: Option<String>,

    /// Files to upload with the invocation
    #[clap(long = "attach")]
    attachments: Vec<PathBuf>,

    /// Wait for the transaction job to finish
    #[clap(short, long, default_value_t = false)]
    wait: bool,
}

impl InvokeCmd {
    pub async fn execute(
        &self,
        client: Client<HttpApiClient>,
        config: &ClientConfig,
    ) -> Result<(), String> {
        let contract = contract_or_default(self.contract.as_deref(), config)?;
        let args = parse_arguments(self.args.as_deref())?;

        let job = client
            .invoke_with_attachments(&contract, &self.method, &args, &self.attachments)
            .await?;
        println!("Invocation of {} on {contract} submitted as job {}", self.method, job.id);

        if self.wait {
            let job = client.wait_for_job(&job.id).await?;
            print_job(&job);
        }
        Ok(())
    }
}

// QUERY COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Call a read-only contract method and print its result")]
pub struct QueryCmd {
    /// Method to query
    method: String,

    /// Arguments as a JSON object, or `@file.json` to read them from a file
    #[clap(short, long)]
    args: Option<String>,

    /// Contract as `name@version`. Uses the configured default contract if omitted.
    #[clap(short, long)]
    contract: Option<String>,
}

impl QueryCmd {
    pub async fn execute(
        &self,
        client: Client<HttpApiClient>,
        config: &ClientConfig,
    ) -> Result<(), String> {
        let contract = contract_or_default(self.contract.as_deref(), config)?;
        let args = parse_arguments(self.args.as_deref())?;

        let result = client.query(&contract, &self.method, &args).await?;
        let output = serde_json::to_string_pretty(&result).map_err(|err| err.to_string())?;
        println!("{output}");
        Ok(())
    }
}
