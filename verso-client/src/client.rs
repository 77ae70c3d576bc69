//! HTTP clients for the Verso resource API and the Consul lookup.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use std::time::Duration;
use verso_api::consul::{GetServiceRequest, GetServiceResponse};
use verso_api::envelope::{Envelope, ErrorBody};
use verso_api::filter::Filter;
use verso_api::resources::{
    GetCustomizationsResponse, GetDeploymentsResponse, GetFeaturesResponse,
    GetInstallationsResponse, GetReleasesResponse, GetServicesResponse, ResourceKind,
};

/// REST client for the six Verso list endpoints.
///
/// One method per resource; all of them take the shared [`Filter`] and
/// answer with an [`Envelope`] of the typed records. No retries, no
/// caching: every call is one request, and every failure reports to the
/// caller.
#[derive(Clone)]
pub struct VersoClient {
    client: reqwest::Client,
    base_url: String,
}

impl VersoClient {
    /// Build a client from the configuration. The base URL keeps no
    /// trailing slash so endpoint paths can be appended verbatim.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.verso_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_deployments(&self, filter: &Filter) -> ClientResult<GetDeploymentsResponse> {
        self.list(ResourceKind::Deployments, filter).await
    }

    pub async fn get_releases(&self, filter: &Filter) -> ClientResult<GetReleasesResponse> {
        self.list(ResourceKind::Releases, filter).await
    }

    pub async fn get_services(&self, filter: &Filter) -> ClientResult<GetServicesResponse> {
        self.list(ResourceKind::Services, filter).await
    }

    pub async fn get_installations(
        &self,
        filter: &Filter,
    ) -> ClientResult<GetInstallationsResponse> {
        self.list(ResourceKind::Installations, filter).await
    }

    pub async fn get_customizations(
        &self,
        filter: &Filter,
    ) -> ClientResult<GetCustomizationsResponse> {
        self.list(ResourceKind::Customizations, filter).await
    }

    pub async fn get_features(&self, filter: &Filter) -> ClientResult<GetFeaturesResponse> {
        self.list(ResourceKind::Features, filter).await
    }

    /// Shared list call: everything except the path and the record type
    /// is identical across the six resources.
    async fn list<T>(&self, kind: ResourceKind, filter: &Filter) -> ClientResult<Envelope<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = self.list_request(kind, filter)?;
        tracing::debug!(resource = %kind, url = %request.url(), "listing resources");
        let response = self.client.execute(request).await?;
        parse_response(kind.path(), response).await
    }

    fn list_request(
        &self,
        kind: ResourceKind,
        filter: &Filter,
    ) -> Result<reqwest::Request, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, kind.path()))
            .query(&filter.to_query_pairs())
            .build()
    }
}

/// Thin client for the Consul service lookup.
#[derive(Clone)]
pub struct ConsulClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConsulClient {
    const SERVICE_PATH: &'static str = "/v1/catalog/service";

    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.consul_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up a service. The answer shape belongs to the Consul agent
    /// and is handed back verbatim.
    pub async fn get_service(
        &self,
        request: &GetServiceRequest,
    ) -> ClientResult<GetServiceResponse> {
        let request = self.service_request(request)?;
        tracing::debug!(url = %request.url(), "looking up service");
        let response = self.client.execute(request).await?;
        parse_response(Self::SERVICE_PATH, response).await
    }

    fn service_request(
        &self,
        request: &GetServiceRequest,
    ) -> Result<reqwest::Request, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, Self::SERVICE_PATH))
            .query(&request.to_query_pairs())
            .build()
    }
}

/// Decode a response, keeping the failure classes distinct: a
/// non-success status becomes an API error carrying the backend's error
/// body when it sent one, and a success payload that does not decode
/// becomes a schema error rather than being folded into the transport.
async fn parse_response<T>(endpoint: &str, response: reqwest::Response) -> ClientResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        serde_json::from_str(&text).map_err(|source| ClientError::Schema {
            endpoint: endpoint.to_string(),
            source,
        })
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&text),
        })
    }
}

/// Pick the user-facing message out of an error body: the structured
/// message when the backend sent one, the raw body otherwise.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => body.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
