use std::path::{Path, PathBuf};

use contract_client::{config::ClientConfig, rpc::domain::ContractRef, validation::Arguments};

use super::CLIENT_CONFIG_FILE_NAME;

/// Returns the contract given on the command line, or the default one defined in the client
/// config.
pub(crate) fn contract_or_default(
    contract: Option<&str>,
    config: &ClientConfig,
) -> Result<ContractRef, String> {
    let contract = match contract {
        Some(contract) => contract.to_string(),
        None => config
            .cli
            .as_ref()
            .and_then(|cli| cli.default_contract.clone())
            .ok_or("No contract provided and no default contract defined in the configuration")?,
    };

    contract.parse::<ContractRef>()
}

/// Parses method arguments given as a JSON object, either inline or as `@path/to/args.json`.
pub(crate) fn parse_arguments(args: Option<&str>) -> Result<Arguments, String> {
    let Some(args) = args else {
        return Ok(Arguments::new());
    };

    let json = match args.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("Failed to read arguments file {path}: {err}"))?,
        None => args.to_string(),
    };

    serde_json::from_str(&json)
        .map_err(|err| format!("Arguments must be a JSON object keyed by parameter name: {err}"))
}

/// Loads config file from current directory and default filename and returns it alongside its path
pub(super) fn load_config_file() -> Result<(ClientConfig, PathBuf), String> {
    let mut current_dir = std::env::current_dir().map_err(|err| err.to_string())?;
    current_dir.push(CLIENT_CONFIG_FILE_NAME);
    let config_path = current_dir.as_path();

    let client_config = load_config(config_path)?;

    Ok((client_config, config_path.into()))
}

/// Loads the client configuration, applying environment overrides.
fn load_config(config_file: &Path) -> Result<ClientConfig, String> {
    if !config_file.exists() {
        return Err(format!(
            "Config file {} not found, run `{} init` first",
            config_file.display(),
            super::CLIENT_BINARY_NAME
        ));
    }

    ClientConfig::load(config_file)
        .map_err(|err| format!("Failed to load {} config file: {err}", config_file.display()))
}
