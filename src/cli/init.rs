use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use contract_client::config::{ClientConfig, Endpoint};

// INIT COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Initialize the client")]
pub struct InitCmd {
    /// Use the Client's default configuration. Useful for non-interactive environments.
    #[clap(long, default_value_t = false)]
    default: bool,
    /// API endpoint in the form of "{protocol}://{hostname}:{port}" or "{hostname}". Unless
    /// `--default` is provided, the user is still asked for the client credentials.
    #[clap(long)]
    endpoint: Option<String>,
}

impl InitCmd {
    pub fn execute(&self, config_file_path: PathBuf) -> Result<(), String> {
        let mut client_config = ClientConfig::default();

        match &self.endpoint {
            Some(endpoint) => client_config.api.endpoint = Endpoint::try_from(endpoint.as_str())?,
            None if !self.default => interactive_api_config(&mut client_config)?,
            None => {},
        }

        if !self.default {
            interactive_auth_config(&mut client_config)?;
        }

        let config_as_toml_string = toml::to_string_pretty(&client_config)
            .map_err(|err| format!("error formatting config: {err}"))?;

        println!("Creating config file at: {:?}", config_file_path);
        let mut file_handle = File::options()
            .write(true)
            .create_new(true)
            .open(config_file_path)
            .map_err(|err| format!("error opening the file: {err}"))?;
        file_handle
            .write_all(config_as_toml_string.as_bytes())
            .map_err(|err| format!("error writing to file: {err}"))?;

        Ok(())
    }
}

fn read_line(prompt: &str) -> Result<String, String> {
    println!("{prompt}");
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|err| format!("error reading input: {err}"))?;
    Ok(input.trim().to_string())
}

fn interactive_api_config(client_config: &mut ClientConfig) -> Result<(), String> {
    let default_endpoint = &client_config.api.endpoint;

    let mut protocol = read_line(&format!("Protocol (default: {}):", default_endpoint.protocol()))?;
    if protocol.is_empty() {
        protocol = default_endpoint.protocol().to_string();
    }

    let mut host = read_line(&format!("Host (default: {}):", default_endpoint.host()))?;
    if host.is_empty() {
        host = default_endpoint.host().to_string();
    }

    let port_str = read_line("API Port (leave empty for the protocol's default port):")?;
    let port = if port_str.is_empty() {
        None
    } else {
        Some(port_str.parse::<u16>().map_err(|err| format!("Error parsing port: {err}"))?)
    };

    client_config.api.endpoint = Endpoint::new(protocol, host, port);

    Ok(())
}

fn interactive_auth_config(client_config: &mut ClientConfig) -> Result<(), String> {
    let client_id = read_line("Client ID (leave empty to configure it later):")?;
    if !client_id.is_empty() {
        client_config.auth.client_id = Some(client_id);
    }

    let client_secret = read_line(
        "Client secret (leave empty to read it from CONTRACT_CLIENT_AUTH__CLIENT_SECRET):",
    )?;
    if !client_secret.is_empty() {
        client_config.auth.client_secret = Some(client_secret);
    }

    Ok(())
}
