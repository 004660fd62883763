use std::path::PathBuf;

use clap::Parser;
use contract_client::{
    rpc::{domain::ContractRef, HttpApiClient},
    Client,
};

use super::jobs::print_job;

// DEPLOY COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Deploy a contract bundle")]
pub struct DeployCmd {
    /// Name and version to deploy the bundle as, given as `name@version`
    contract: String,

    /// Path to the contract bundle
    bundle: PathBuf,

    /// Wait for the deployment job to finish
    #[clap(short, long, default_value_t = false)]
    wait: bool,
}

impl DeployCmd {
    pub async fn execute(&self, client: Client<HttpApiClient>) -> Result<(), String> {
        let contract = self.contract.parse::<ContractRef>()?;
        let job = client.deploy(&contract, &self.bundle).await?;
        println!("Deployment of {contract} started as job {}", job.id);

        if self.wait {
            let job = client.wait_for_job(&job.id).await?;
            print_job(&job);
        }
        Ok(())
    }
}
