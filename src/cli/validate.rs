use std::path::PathBuf;

use clap::Parser;
use contract_client::validation::{validate_arguments, ContractMetadata};

use super::{contracts::print_methods, utils::parse_arguments};

// VALIDATE COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Check method arguments against a local metadata file without contacting the API")]
pub struct ValidateCmd {
    /// Path to the contract metadata JSON file
    #[clap(short, long)]
    metadata: PathBuf,

    /// Method whose arguments are checked. Lists the declared methods if omitted.
    method: Option<String>,

    /// Arguments as a JSON object, or `@file.json` to read them from a file
    #[clap(short, long)]
    args: Option<String>,
}

impl ValidateCmd {
    pub fn execute(&self) -> Result<(), String> {
        let metadata = std::fs::read_to_string(&self.metadata)
            .map_err(|err| format!("Failed to read {}: {err}", self.metadata.display()))?;
        let metadata: ContractMetadata = serde_json::from_str(&metadata)
            .map_err(|err| format!("Invalid metadata in {}: {err}", self.metadata.display()))?;

        let Some(method) = &self.method else {
            print_methods(&metadata);
            return Ok(());
        };

        if metadata.method(method).is_none() {
            println!("Method {method} is not declared by the metadata, its arguments are not checked");
        }

        let args = parse_arguments(self.args.as_deref())?;
        validate_arguments(method, &args, &metadata).map_err(|err| err.to_string())?;

        println!("Arguments for {method} are valid");
        Ok(())
    }
}
