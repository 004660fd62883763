use clap::Parser;
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use contract_client::{rpc::HttpApiClient, Client};

use self::{
    auth::{LoginCmd, LogoutCmd},
    contracts::{ContractsCmd, MetadataCmd},
    deploy::DeployCmd,
    init::InitCmd,
    invoke::{InvokeCmd, QueryCmd},
    jobs::JobCmd,
    utils::load_config_file,
    validate::ValidateCmd,
};

mod auth;
mod contracts;
mod deploy;
mod info;
mod init;
mod invoke;
mod jobs;
mod utils;
mod validate;

/// Config file name
const CLIENT_CONFIG_FILE_NAME: &str = "contract-client.toml";

/// Client binary name
pub const CLIENT_BINARY_NAME: &str = "contracts";

/// Root CLI struct
#[derive(Parser, Debug)]
#[clap(name = "Contracts", about = "Smart-contract platform client", version, rename_all = "kebab-case")]
pub struct Cli {
    #[clap(subcommand)]
    action: Command,
}

/// CLI actions
#[derive(Debug, Parser)]
pub enum Command {
    Init(InitCmd),
    /// View the client configuration and the state of the cached access token
    Info,
    Login(LoginCmd),
    Logout(LogoutCmd),
    Contracts(ContractsCmd),
    Metadata(MetadataCmd),
    Deploy(DeployCmd),
    Invoke(InvokeCmd),
    Query(QueryCmd),
    Job(JobCmd),
    Validate(ValidateCmd),
}

/// CLI entry point
impl Cli {
    pub async fn execute(&self) -> Result<(), String> {
        let mut current_dir = std::env::current_dir().map_err(|err| err.to_string())?;
        current_dir.push(CLIENT_CONFIG_FILE_NAME);

        // Commands that work without a config file or a connection to the API.
        match &self.action {
            Command::Init(init_cmd) => return init_cmd.execute(current_dir),
            Command::Validate(validate_cmd) => return validate_cmd.execute(),
            _ => {},
        }

        // Create the client
        let (client_config, _) = load_config_file()?;
        let api = HttpApiClient::from_config(&client_config).map_err(|err| err.to_string())?;
        let client = Client::new(api, client_config.polling.clone());

        // Execute CLI command
        match &self.action {
            Command::Init(_) | Command::Validate(_) => Ok(()),
            Command::Info => info::print_client_info(&client, &client_config).await,
            Command::Login(login) => login.execute(client).await,
            Command::Logout(logout) => logout.execute(client).await,
            Command::Contracts(contracts) => contracts.execute(client).await,
            Command::Metadata(metadata) => metadata.execute(client, &client_config).await,
            Command::Deploy(deploy) => deploy.execute(client).await,
            Command::Invoke(invoke) => invoke.execute(client, &client_config).await,
            Command::Query(query) => query.execute(client, &client_config).await,
            Command::Job(job) => job.execute(client).await,
        }
    }
}

pub fn create_dynamic_table(headers: &[&str]) -> Table {
    let header_cells = headers
        .iter()
        .map(|header| Cell::new(header).add_attribute(Attribute::Bold))
        .collect::<Vec<_>>();

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_header(header_cells);

    table
}
