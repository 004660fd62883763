use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    domain::{Attachment, ContractRef, ContractSummary, ContractVersion, Job, TransactionRecord},
    ApiClient, RpcApiEndpoint, RpcError,
};
use crate::{
    client::authenticator::{Credentials, TokenAuthenticator},
    config::{ApiConfig, ClientConfig},
    store::{FileTokenStore, MemoryTokenStore, TokenStore},
    validation::{Arguments, ContractMetadata},
};

const API_PREFIX: &str = "api/v1";

// HTTP API CLIENT
// ================================================================================================

/// Client for the platform's REST API.
///
/// Every request carries a bearer token from the [TokenAuthenticator]. Connection failures are
/// retried with exponential backoff. Timeouts and `429`/`5xx` answers are retried the same way for
/// idempotent endpoints only, see [RpcApiEndpoint::is_idempotent]. A `401` answer drops the cached
/// token and repeats the request once with a fresh one.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_backoff_ms: u64,
    authenticator: TokenAuthenticator,
}

impl HttpApiClient {
    /// Returns a new instance of [HttpApiClient] talking to the configured endpoint.
    pub fn new(config: &ApiConfig, authenticator: TokenAuthenticator) -> Result<Self, RpcError> {
        let http = build_http_client(config)?;
        let base_url = format!("{}/{API_PREFIX}", config.endpoint);
        reqwest::Url::parse(&base_url)
            .map_err(|err| RpcError::InvalidEndpoint(format!("{}: {err}", config.endpoint)))?;

        Ok(Self {
            http,
            base_url,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            authenticator,
        })
    }

    /// Builds the client and its authenticator from a full [ClientConfig], caching tokens in the
    /// configured file.
    pub fn from_config(config: &ClientConfig) -> Result<Self, RpcError> {
        let credentials = match (&config.auth.client_id, &config.auth.client_secret) {
            (Some(client_id), Some(client_secret)) => {
                Some(Credentials::new(client_id.clone(), client_secret.clone()))
            },
            _ => None,
        };

        let store: Box<dyn TokenStore> = if config.auth.token_cache_path.is_empty() {
            Box::new(MemoryTokenStore::new())
        } else {
            Box::new(FileTokenStore::new(&config.auth.token_cache_path))
        };

        let authenticator = TokenAuthenticator::new(
            build_http_client(&config.api)?,
            token_url(&config.api),
            credentials,
            store,
        );

        Self::new(&config.api, authenticator)
    }

    pub fn authenticator(&self) -> &TokenAuthenticator {
        &self.authenticator
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn contract_url(&self, contract: &ContractRef) -> String {
        self.url(&format!("contracts/{}/versions/{}", contract.name, contract.version))
    }

    /// Sends the request produced by `build`, handling authentication and retries, and decodes
    /// the JSON response.
    async fn execute<T, F>(&self, endpoint: RpcApiEndpoint, build: F) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> Result<RequestBuilder, RpcError> + Send + Sync,
    {
        let mut attempt: u32 = 0;
        let mut reauthenticated = false;
        let idempotent = endpoint.is_idempotent();

        loop {
            let token = self.authenticator.access_token().await?;
            debug!("Sending {endpoint} request (attempt {})", attempt + 1);

            match build(&self.http)?.bearer_auth(token).send().await {
                Ok(response) if response.status() == StatusCode::UNAUTHORIZED && !reauthenticated => {
                    warn!("{endpoint} was rejected as unauthorized, refreshing the access token");
                    self.authenticator.invalidate().await?;
                    reauthenticated = true;
                    continue;
                },
                Ok(response)
                    if idempotent
                        && is_retryable(response.status())
                        && attempt < self.max_retries =>
                {
                    warn!("{endpoint} returned status {}, retrying", response.status());
                },
                Ok(response) => return decode_response(endpoint, response).await,
                Err(err)
                    if (err.is_connect() || (idempotent && err.is_timeout()))
                        && attempt < self.max_retries =>
                {
                    warn!("{endpoint} request failed: {err}, retrying");
                },
                Err(err) if err.is_connect() => {
                    return Err(RpcError::ConnectionError(err.to_string()));
                },
                Err(err) => return Err(RpcError::RequestError(endpoint.to_string(), err.to_string())),
            }

            attempt += 1;
            tokio::time::sleep(self.backoff(attempt)).await;
        }
    }

    /// Exponential backoff for the given retry attempt, with up to 50% random jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.retry_backoff_ms.saturating_mul(1 << attempt.saturating_sub(1).min(10));
        let jitter = rand::thread_rng().gen_range(0..=base / 2);
        Duration::from_millis(base + jitter)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, RpcError> {
        let url = self.url("contracts");
        self.execute(RpcApiEndpoint::ListContracts, |http| Ok(http.get(&url))).await
    }

    async fn get_contract_versions(&self, name: &str) -> Result<Vec<ContractVersion>, RpcError> {
        let url = self.url(&format!("contracts/{name}/versions"));
        self.execute(RpcApiEndpoint::GetContractVersions, |http| Ok(http.get(&url))).await
    }

    async fn get_metadata(&self, contract: &ContractRef) -> Result<ContractMetadata, RpcError> {
        let url = format!("{}/metadata", self.contract_url(contract));
        self.execute(RpcApiEndpoint::GetMetadata, |http| Ok(http.get(&url))).await
    }

    async fn deploy_contract(
        &self,
        contract: &ContractRef,
        bundle: Attachment,
    ) -> Result<Job, RpcError> {
        let url = self.contract_url(contract);
        self.execute(RpcApiEndpoint::DeployContract, |http| {
            let form = Form::new().part("bundle", attachment_part(&bundle)?);
            Ok(http.post(&url).multipart(form))
        })
        .await
    }

    async fn remove_contract(&self, contract: &ContractRef) -> Result<(), RpcError> {
        let url = self.contract_url(contract);
        let _: Value =
            self.execute(RpcApiEndpoint::RemoveContract, |http| Ok(http.delete(&url))).await?;
        Ok(())
    }

    async fn invoke_method(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
        attachments: Vec<Attachment>,
    ) -> Result<Job, RpcError> {
        let url = format!("{}/methods/{method}", self.contract_url(contract));

        if attachments.is_empty() {
            let body = args_body(args)?;
            return self
                .execute(RpcApiEndpoint::InvokeMethod, |http| Ok(http.post(&url).json(&body)))
                .await;
        }

        let args = serde_json::to_string(args)?;
        self.execute(RpcApiEndpoint::InvokeMethod, |http| {
            let mut form = Form::new().text("args", args.clone());
            for attachment in &attachments {
                form = form.part("attachments", attachment_part(attachment)?);
            }
            Ok(http.post(&url).multipart(form))
        })
        .await
    }

    async fn query_method(
        &self,
        contract: &ContractRef,
        method: &str,
        args: &Arguments,
    ) -> Result<Value, RpcError> {
        let url = format!("{}/methods/{method}/query", self.contract_url(contract));
        let body = args_body(args)?;
        self.execute(RpcApiEndpoint::QueryMethod, |http| Ok(http.post(&url).json(&body)))
            .await
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, RpcError> {
        let url = self.url(&format!("jobs/{job_id}"));
        self.execute(RpcApiEndpoint::GetJob, |http| Ok(http.get(&url))).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, RpcError> {
        let url = self.url("jobs");
        self.execute(RpcApiEndpoint::ListJobs, |http| Ok(http.get(&url))).await
    }

    async fn cancel_job(&self, job_id: &str) -> Result<Job, RpcError> {
        let url = self.url(&format!("jobs/{job_id}/cancel"));
        self.execute(RpcApiEndpoint::CancelJob, |http| Ok(http.put(&url))).await
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, RpcError> {
        let url = self.url(&format!("transactions/{transaction_id}"));
        self.execute(RpcApiEndpoint::GetTransaction, |http| Ok(http.get(&url))).await
    }
}

// HELPERS
// ================================================================================================

fn build_http_client(config: &ApiConfig) -> Result<reqwest::Client, RpcError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|err| RpcError::ConnectionError(err.to_string()))
}

fn token_url(config: &ApiConfig) -> String {
    format!("{}/{API_PREFIX}/auth/token", config.endpoint)
}

fn args_body(args: &Arguments) -> Result<Value, RpcError> {
    Ok(json!({ "args": serde_json::to_value(args)? }))
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn attachment_part(attachment: &Attachment) -> Result<Part, RpcError> {
    Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.content_type)
        .map_err(|err| {
            RpcError::RequestError(
                format!("attachment {}", attachment.file_name),
                format!("invalid content type: {err}"),
            )
        })
}

/// Turns a response into `T`, mapping non-success statuses to [RpcError::ResponseStatus]. An
/// empty success body decodes as JSON `null`.
async fn decode_response<T: DeserializeOwned>(
    endpoint: RpcApiEndpoint,
    response: Response,
) -> Result<T, RpcError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| RpcError::RequestError(endpoint.to_string(), err.to_string()))?;

    if !status.is_success() {
        return Err(RpcError::ResponseStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: error_message(&bytes),
        });
    }

    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(body)
        .map_err(|err| RpcError::DeserializationError(format!("{endpoint}: {err}")))
}

/// Extracts a readable message from an error body, preferring a JSON `message` or `error` field.
fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(message) = value.get(field).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    String::from_utf8_lossy(body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use super::{error_message, is_retryable, token_url, HttpApiClient};
    use crate::{
        client::rpc::{
            domain::{ContractRef, JobStatus},
            test_server::TestServer,
            ApiClient, RpcApiEndpoint, RpcError,
        },
        config::{ApiConfig, AuthConfig, ClientConfig, Endpoint},
        errors::AuthError,
        store::tests::create_test_token_path,
        validation::Arguments,
    };

    const TOKEN_PATH: &str = "/api/v1/auth/token";
    const TOKEN_T1: &str = r#"{"access_token": "t1", "expires_in": 3600}"#;
    const TOKEN_T2: &str = r#"{"access_token": "t2", "expires_in": 3600}"#;
    const PENDING_JOB: &str = r#"{"id": "1", "kind": "transaction", "status": "pending"}"#;

    /// Client for `server` with credentials, an in-memory token cache and a 1ms retry backoff.
    fn client_for(server: &TestServer) -> HttpApiClient {
        let config = ClientConfig::new(
            ApiConfig {
                endpoint: Endpoint::new("http".into(), "127.0.0.1".into(), Some(server.port())),
                retry_backoff_ms: 1,
                ..ApiConfig::default()
            },
            AuthConfig {
                client_id: Some("client".into()),
                client_secret: Some("secret".into()),
                token_cache_path: String::new(),
            },
        );
        HttpApiClient::from_config(&config).unwrap()
    }

    #[test]
    fn only_transient_statuses_are_retried() {
        assert!(is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn error_messages_prefer_json_fields() {
        assert_eq!(error_message(br#"{"message": "no such method"}"#), "no such method");
        assert_eq!(error_message(br#"{"error": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_message(b"  gateway timeout \n"), "gateway timeout");
    }

    #[test]
    fn urls_are_built_from_the_endpoint() {
        let api = ApiConfig {
            endpoint: Endpoint::new("https".into(), "contracts.example.org".into(), None),
            ..ApiConfig::default()
        };
        assert_eq!(token_url(&api), "https://contracts.example.org/api/v1/auth/token");

        let config = ClientConfig::new(
            api,
            AuthConfig {
                token_cache_path: create_test_token_path().display().to_string(),
                ..AuthConfig::default()
            },
        );
        let client = HttpApiClient::from_config(&config).unwrap();
        assert_eq!(
            client.url("jobs/42"),
            "https://contracts.example.org/api/v1/jobs/42"
        );
    }

    #[test]
    fn backoff_grows_with_attempts() {
        let config = ClientConfig::default();
        let client = HttpApiClient::from_config(&config).unwrap();

        let first = client.backoff(1).as_millis() as u64;
        let third = client.backoff(3).as_millis() as u64;
        let base = config.api.retry_backoff_ms;

        assert!((base..=base + base / 2).contains(&first));
        assert!((4 * base..=6 * base).contains(&third));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let api = ApiConfig {
            endpoint: Endpoint::new("http".into(), "bad host".into(), None),
            ..ApiConfig::default()
        };
        let config = ClientConfig::new(
            api,
            AuthConfig { token_cache_path: String::new(), ..AuthConfig::default() },
        );

        assert!(matches!(
            HttpApiClient::from_config(&config),
            Err(RpcError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn job_creating_endpoints_are_not_idempotent() {
        assert!(!RpcApiEndpoint::DeployContract.is_idempotent());
        assert!(!RpcApiEndpoint::InvokeMethod.is_idempotent());
        assert!(RpcApiEndpoint::QueryMethod.is_idempotent());
        assert!(RpcApiEndpoint::GetJob.is_idempotent());
        assert!(RpcApiEndpoint::CancelJob.is_idempotent());
    }

    #[tokio::test]
    async fn transient_statuses_are_retried_until_success() {
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            ("/api/v1/jobs/1", vec![(503, ""), (429, ""), (200, PENDING_JOB)]),
        ])
        .await;
        let client = client_for(&server);

        let job = client.get_job("1").await.unwrap();
        assert_eq!(job.id, "1");
        assert_eq!(job.status, JobStatus::Pending);

        let requests = server.requests_to("/api/v1/jobs/1");
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|request| request.method == "GET"));
        assert!(requests.iter().all(|request| request.authorization.as_deref() == Some("Bearer t1")));
        assert_eq!(server.requests_to(TOKEN_PATH).len(), 1);
    }

    #[tokio::test]
    async fn retries_stop_at_the_configured_limit() {
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            ("/api/v1/jobs", vec![(500, r#"{"message": "database unavailable"}"#)]),
        ])
        .await;
        let client = client_for(&server);

        match client.list_jobs().await.unwrap_err() {
            RpcError::ResponseStatus { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            },
            other => panic!("unexpected error: {other}"),
        }
        let max_retries = ApiConfig::default().max_retries as usize;
        assert_eq!(server.requests_to("/api/v1/jobs").len(), max_retries + 1);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            ("/api/v1/jobs/7", vec![(404, r#"{"message": "no such job"}"#), (200, PENDING_JOB)]),
        ])
        .await;
        let client = client_for(&server);

        match client.get_job("7").await.unwrap_err() {
            RpcError::ResponseStatus { status, message, .. } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such job");
            },
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(server.requests_to("/api/v1/jobs/7").len(), 1);
    }

    #[tokio::test]
    async fn invocation_is_not_resent_after_server_error() {
        let path = "/api/v1/contracts/registry/versions/1.0.0/methods/setValue";
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            (path, vec![(503, ""), (200, PENDING_JOB)]),
        ])
        .await;
        let client = client_for(&server);

        let err = client
            .invoke_method(&ContractRef::new("registry", "1.0.0"), "setValue", &Arguments::new(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::ResponseStatus { status: 503, .. }));

        let requests = server.requests_to(path);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
    }

    #[tokio::test]
    async fn unauthorized_request_is_repeated_with_a_new_token() {
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1), (200, TOKEN_T2)]),
            ("/api/v1/jobs/1", vec![(401, ""), (200, PENDING_JOB)]),
        ])
        .await;
        let client = client_for(&server);

        client.get_job("1").await.unwrap();

        let requests = server.requests_to("/api/v1/jobs/1");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer t1"));
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer t2"));
        assert_eq!(server.requests_to(TOKEN_PATH).len(), 2);
    }

    #[tokio::test]
    async fn repeated_unauthorized_is_reported() {
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            ("/api/v1/jobs/1", vec![(401, r#"{"error": "token revoked"}"#)]),
        ])
        .await;
        let client = client_for(&server);

        match client.get_job("1").await.unwrap_err() {
            RpcError::ResponseStatus { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "token revoked");
            },
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(server.requests_to("/api/v1/jobs/1").len(), 2);
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let contract_path = "/api/v1/contracts/registry/versions/1.0.0";
        let query_path = "/api/v1/contracts/registry/versions/1.0.0/methods/getValue/query";
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            (contract_path, vec![(204, "")]),
            (query_path, vec![(200, "")]),
        ])
        .await;
        let client = client_for(&server);
        let contract = ContractRef::new("registry", "1.0.0");

        client.remove_contract(&contract).await.unwrap();
        assert_eq!(server.requests_to(contract_path)[0].method, "DELETE");

        let result = client.query_method(&contract, "getValue", &Arguments::new()).await.unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn query_returns_the_json_body() {
        let path = "/api/v1/contracts/registry/versions/1.0.0/methods/getValue/query";
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, TOKEN_T1)]),
            (path, vec![(200, r#"{"value": 42}"#)]),
        ])
        .await;
        let client = client_for(&server);

        let result = client
            .query_method(&ContractRef::new("registry", "1.0.0"), "getValue", &Arguments::new())
            .await
            .unwrap();
        assert_eq!(result, json!({"value": 42}));
    }

    #[tokio::test]
    async fn out_of_range_token_lifetime_fails_the_request() {
        let server = TestServer::start(vec![
            (TOKEN_PATH, vec![(200, r#"{"access_token": "t1", "expires_in": 9223372036854775807}"#)]),
            ("/api/v1/jobs/1", vec![(200, PENDING_JOB)]),
        ])
        .await;
        let client = client_for(&server);

        let err = client.get_job("1").await.unwrap_err();
        assert!(matches!(
            err,
            RpcError::AuthenticationError(AuthError::TokenRequestFailed(_))
        ));
        assert!(server.requests_to("/api/v1/jobs/1").is_empty());
    }
}
