use crate::config::PollingConfig;

pub mod authenticator;
pub mod contracts;
pub mod jobs;
pub mod rpc;
pub mod transactions;

use rpc::ApiClient;

// CONTRACT CLIENT
// ================================================================================================

/// A client for a remote smart-contract execution platform.
///
/// The client:
/// - Looks up deployed contracts, their versions and the signatures of their methods.
/// - Deploys contract bundles and removes deployed versions.
/// - Validates method arguments against the contract metadata before invoking or querying a
///   method, so invalid calls never reach the platform.
/// - Polls the asynchronous jobs created by deployments and invocations until they finish.
pub struct Client<A: ApiClient> {
    /// The API client used to talk to the platform.
    api: A,
    /// How jobs are polled by [Client::wait_for_job].
    polling: PollingConfig,
}

impl<A: ApiClient> Client<A> {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Returns a new instance of [Client].
    ///
    /// ## Arguments
    ///
    /// * `api` - An instance of [ApiClient] which provides a way for the client to connect to
    ///   the platform.
    /// * `polling` - Interval and timeout used when waiting for jobs to complete.
    pub fn new(api: A, polling: PollingConfig) -> Self {
        Self { api, polling }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }
}
