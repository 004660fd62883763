use clap::Parser;
use contract_client::{rpc::HttpApiClient, Client};

// LOGIN COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Request a new access token with the configured client credentials")]
pub struct LoginCmd {}

impl LoginCmd {
    pub async fn execute(&self, client: Client<HttpApiClient>) -> Result<(), String> {
        let token = client.api().authenticator().login().await.map_err(|err| err.to_string())?;
        println!("Logged in, token valid until {}", token.expires_at);
        Ok(())
    }
}

// LOGOUT COMMAND
// ================================================================================================

#[derive(Debug, Clone, Parser)]
#[clap(about = "Remove the cached access token")]
pub struct LogoutCmd {}

impl LogoutCmd {
    pub async fn execute(&self, client: Client<HttpApiClient>) -> Result<(), String> {
        client.api().authenticator().invalidate().await.map_err(|err| err.to_string())?;
        println!("Cached access token removed");
        Ok(())
    }
}
