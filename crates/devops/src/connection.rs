//! Authenticated connections to an Azure DevOps organization

use crate::error::{DevOpsError, Result};
use crate::models::{
    ListResponse, Wiki, WikiPageResponse, WikiSearchRequest, WikiSearchResponse,
};
use edgewiki_auth::TokenManager;
use edgewiki_core::{AuthConfig, CredentialMode, DevOpsConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Where connections get their credential from
#[derive(Clone)]
pub enum CredentialSource {
    /// Tokens issued and refreshed by a [`TokenManager`]
    Managed(Arc<TokenManager>),
    /// A personal access token from configuration
    Static(Option<String>),
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Managed(manager) => f.debug_tuple("Managed").field(manager).finish(),
            Self::Static(token) => f
                .debug_tuple("Static")
                .field(&token.as_ref().map(|_| "***REDACTED***"))
                .finish(),
        }
    }
}

impl CredentialSource {
    /// Pick the source the auth configuration asks for
    pub fn from_config(config: &AuthConfig) -> edgewiki_auth::Result<Self> {
        match config.mode {
            CredentialMode::Managed => Ok(Self::Managed(Arc::new(TokenManager::from_config(
                config,
            )?))),
            CredentialMode::Static => Ok(Self::Static(config.personal_access_token.clone())),
        }
    }

    async fn credential(&self) -> Result<String> {
        match self {
            Self::Managed(manager) => {
                let token = manager.get_access_token().await;
                if token.is_empty() {
                    return Err(DevOpsError::config(
                        "No valid access token found. Please restart the server.",
                    ));
                }
                Ok(token)
            }
            Self::Static(token) => token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .ok_or_else(|| DevOpsError::config("No personal access token configured")),
        }
    }
}

/// Builds [`DevOpsConnection`]s for one organization.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    client: Client,
    config: DevOpsConfig,
    credentials: CredentialSource,
}

impl ConnectionFactory {
    pub fn new(config: DevOpsConfig, credentials: CredentialSource) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DevOpsError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &DevOpsConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    /// Resolve a credential and bind it to a connection.
    ///
    /// Fails before any request is made when no credential is available.
    pub async fn connect(&self) -> Result<DevOpsConnection> {
        let token = self.credentials.credential().await?;
        let organization_url = parse_base(&self.config.organization_url())?;
        let search_url = parse_base(&self.config.search_organization_url())?;

        Ok(DevOpsConnection {
            client: self.client.clone(),
            organization_url,
            search_url,
            api_version: self.config.api_version.clone(),
            token,
        })
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| DevOpsError::config(format!("Invalid URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(DevOpsError::config(format!("URL '{raw}' cannot be a base")));
    }
    Ok(url)
}

/// A client bound to one organization and one credential
pub struct DevOpsConnection {
    client: Client,
    organization_url: Url,
    search_url: Url,
    api_version: String,
    token: String,
}

impl std::fmt::Debug for DevOpsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevOpsConnection")
            .field("organization_url", &self.organization_url.as_str())
            .field("search_url", &self.search_url.as_str())
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl DevOpsConnection {
    pub fn organization_url(&self) -> &Url {
        &self.organization_url
    }

    /// `base` with `segments` appended, each percent-encoded
    fn endpoint(&self, base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        url
    }

    /// Basic auth with an empty user name works for both PATs and Entra tokens
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth("", Some(&self.token))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() || status == reqwest::StatusCode::NON_AUTHORITATIVE_INFORMATION {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(DevOpsError::from_status(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| DevOpsError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    /// Full-text search over the wikis of `project`
    pub async fn search_wiki(
        &self,
        project: &str,
        request: &WikiSearchRequest,
    ) -> Result<WikiSearchResponse> {
        let url = self.endpoint(
            &self.search_url,
            &[project, "_apis", "search", "wikisearchresults"],
        );
        debug!("POST {url}");

        let response = self
            .authorize(self.client.post(url))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Fetch one page by its page path
    pub async fn get_page(
        &self,
        project: &str,
        wiki_identifier: &str,
        path: &str,
        include_content: bool,
    ) -> Result<WikiPageResponse> {
        let mut url = self.endpoint(
            &self.organization_url,
            &[project, "_apis", "wiki", "wikis", wiki_identifier, "pages"],
        );
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("includeContent", if include_content { "true" } else { "false" });
        debug!("GET {url}");

        let response = self.authorize(self.client.get(url)).send().await?;
        Self::read_json(response).await
    }

    /// Wikis defined in `project`
    pub async fn list_wikis(&self, project: &str) -> Result<Vec<Wiki>> {
        let url = self.endpoint(
            &self.organization_url,
            &[project, "_apis", "wiki", "wikis"],
        );
        debug!("GET {url}");

        let response = self.authorize(self.client.get(url)).send().await?;
        let list: ListResponse<Wiki> = Self::read_json(response).await?;
        Ok(list.value)
    }
}
