use core::fmt;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
    Figment, Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables that override file settings. Nested keys are separated
/// by `__`, e.g. `CONTRACT_CLIENT_AUTH__CLIENT_SECRET`.
pub const ENV_PREFIX: &str = "CONTRACT_CLIENT_";

// CLIENT CONFIG
// ================================================================================================

/// Configuration options of the contract client.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClientConfig {
    /// Describes settings related to the platform API.
    pub api: ApiConfig,
    /// Describes how the client authenticates against the API.
    pub auth: AuthConfig,
    /// Describes how asynchronous jobs are polled.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Describes settings related to the CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli: Option<CliConfig>,
}

impl ClientConfig {
    /// Returns a new instance of [ClientConfig] with the specified API and auth settings.
    pub fn new(api: ApiConfig, auth: AuthConfig) -> Self {
        Self { api, auth, polling: PollingConfig::default(), cli: None }
    }

    /// Loads the configuration from `config_file`, layered over the defaults and overridden by
    /// `CONTRACT_CLIENT_`-prefixed environment variables.
    pub fn load(config_file: &Path) -> Result<Self, figment::Error> {
        Figment::from(ClientConfig::default())
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

// Make `ClientConfig` a provider itself for composability.
impl Provider for ClientConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("Library Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }

    fn profile(&self) -> Option<Profile> {
        None
    }
}

// ENDPOINT
// ================================================================================================

/// Network address of the platform API.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Endpoint {
    protocol: String,
    host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

impl Endpoint {
    pub(crate) const DEFAULT_API_PORT: u16 = 8080;

    /// Returns a new instance of [Endpoint] with the specified protocol, host, and port.
    pub const fn new(protocol: String, host: String, port: Option<u16>) -> Self {
        Self { protocol, host, port }
    }

    /// Returns the [Endpoint] of an API server running on `localhost`.
    pub fn localhost() -> Self {
        Self::new("http".into(), "localhost".into(), Some(Self::DEFAULT_API_PORT))
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.protocol, self.host, port),
            None => write!(f, "{}://{}", self.protocol, self.host),
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::localhost()
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = String;

    fn try_from(endpoint: &str) -> Result<Self, Self::Error> {
        let endpoint = endpoint.trim_end_matches('/');
        let (protocol, rest) = match endpoint.split_once("://") {
            Some((protocol, rest)) => (protocol, rest),
            None => ("https", endpoint),
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|err| format!("invalid port `{port}`: {err}"))?;
                (host, Some(port))
            },
            None => (rest, None),
        };

        if host.is_empty() {
            return Err(format!("endpoint `{endpoint}` has no host"));
        }

        Ok(Endpoint::new(protocol.to_string(), host.to_string(), port))
    }
}

// API CONFIG
// ================================================================================================

/// Settings for the HTTP API client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ApiConfig {
    /// Address of the platform API.
    pub endpoint: Endpoint,
    /// Timeout for each API request.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Number of times a request is retried after a connection error or a server-side failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay of the exponential retry backoff.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

const fn default_timeout() -> u64 {
    10000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_backoff() -> u64 {
    250
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            timeout_ms: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

// AUTH CONFIG
// ================================================================================================

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// File the access token is cached in between runs. When empty, the token is kept in memory
    /// and requested again on every run.
    #[serde(default = "default_token_cache_path")]
    pub token_cache_path: String,
}

fn default_token_cache_path() -> String {
    const TOKEN_CACHE_FILENAME: &str = ".contract-client-token.json";
    TOKEN_CACHE_FILENAME.to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_cache_path: default_token_cache_path(),
        }
    }
}

// POLLING CONFIG
// ================================================================================================

/// Settings for waiting on deployment and transaction jobs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_poll_timeout")]
    pub timeout_ms: u64,
}

const fn default_poll_interval() -> u64 {
    1000
}

const fn default_poll_timeout() -> u64 {
    120_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
            timeout_ms: default_poll_timeout(),
        }
    }
}

// CLI CONFIG
// ================================================================================================

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CliConfig {
    /// Contract used when a command omits one, as `name@version`.
    pub default_contract: Option<String>,
}

// TESTS
// ================================================================================================
