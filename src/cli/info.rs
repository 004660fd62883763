use contract_client::{
    config::ClientConfig,
    rpc::HttpApiClient,
    store::{FileTokenStore, TokenStore},
    Client,
};

pub async fn print_client_info(
    client: &Client<HttpApiClient>,
    config: &ClientConfig,
) -> Result<(), String> {
    println!("API endpoint: {}", config.api.endpoint);
    println!("Client ID: {}", config.auth.client_id.as_deref().unwrap_or("-"));
    print_token_status(config)?;
    print_contract_count(client).await
}

// HELPERS
// ================================================================================================

fn print_token_status(config: &ClientConfig) -> Result<(), String> {
    if config.auth.token_cache_path.is_empty() {
        println!("Cached token: caching disabled");
        return Ok(());
    }

    let store = FileTokenStore::new(&config.auth.token_cache_path);
    match store.load().map_err(|err| err.to_string())? {
        Some(token) => println!("Cached token expires at: {}", token.expires_at),
        None => println!("Cached token: none"),
    }
    Ok(())
}

async fn print_contract_count(client: &Client<HttpApiClient>) -> Result<(), String> {
    let contracts = client.list_contracts().await?;
    println!("Deployed contracts: {}", contracts.len());
    Ok(())
}
