use clap::Parser;
use contract_client::{
    config::ClientConfig,
    rpc::{domain::ContractRef, HttpApiClient},
    validation::ContractMetadata,
    Client,
};

use super::utils::contract_or_default;
use crate::cli::create_dynamic_table;

// CONTRACTS COMMAND
// ================================================================================================

#[derive(Default, Debug, Clone, Parser)]
#[clap(about = "View deployed contracts. Defaults to listing all contracts")]
pub struct ContractsCmd {
    /// Show the versions of the named contract instead
    #[clap(short, long)]
    versions: Option<String>,

    /// Remove a deployed contract version, given as `name@version`
    #[clap(long, conflicts_with = "versions")]
    remove: Option<String>,
}

impl ContractsCmd {
    pub async fn execute(&self, client: Client<HttpApiClient>) -> Result<(), String> {
        match (&self.versions, &self.remove) {
            (Some(name), _) => list_versions(&client, name).await,
            (None, Some(contract)) => {
                let contract = contract.parse::<ContractRef>()?;
                client.remove_contract(&contract).await?;
                println!("Removed {contract}");
                Ok(())
            },
            (None, None) => list_contracts(&client).await,
        }
    }
}

async fn list_contracts(client: &Client<HttpApiClient>) -> Result<(), String> {
    let contracts = client.list_contracts().await?;

    let mut table = create_dynamic_table(&["Name", "Latest Version", "Description"]);
    for contract in contracts {
        table.add_row(vec![
            contract.name,
            contract.latest_version.unwrap_or_else(|| "-".to_string()),
            contract.description.unwrap_or_default(),
        ]);
    }

    println!("{table}");
    Ok(())
}

async fn list_versions(client: &Client<HttpApiClient>, name: &str) -> Result<(), String> {
    let versions = client.get_contract_versions(name).await?;

    let mut table = create_dynamic_table(&["Version", "Status", "Deployed At"]);
    for version in versions {
        table.add_row(vec![
            version.version,
            version.status,
            version.deployed_at.map(|at| at.to_rfc3339()).unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
    Ok(())
}

// METADATA COMMAND
// ================================================================================================

#[derive(Default, Debug, Clone, Parser)]
#[clap(about = "Show the method signatures of a contract version")]
pub struct MetadataCmd {
    /// Contract as `name@version`. Uses the configured default contract if omitted.
    contract: Option<String>,

    /// Print the raw metadata as JSON
    #[clap(long, default_value_t = false)]
    json: bool,
}

impl MetadataCmd {
    pub async fn execute(
        &self,
        client: Client<HttpApiClient>,
        config: &ClientConfig,
    ) -> Result<(), String> {
        let contract = contract_or_default(self.contract.as_deref(), config)?;
        let metadata = client.get_metadata(&contract).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&metadata).map_err(|err| err.to_string())?;
            println!("{json}");
        } else {
            print_methods(&metadata);
        }
        Ok(())
    }
}

pub(crate) fn print_methods(metadata: &ContractMetadata) {
    let mut table = create_dynamic_table(&["Method", "Parameters"]);
    for (name, method) in &metadata.contract.methods {
        let params = method
            .params
            .iter()
            .map(|param| format!("{}: {}", param.name, param.type_signature))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![name.clone(), params]);
    }

    println!("{table}");
}
