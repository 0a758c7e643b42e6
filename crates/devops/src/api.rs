//! Wiki API trait and its Azure DevOps implementation

use crate::connection::ConnectionFactory;
use crate::error::Result;
use crate::models::{Wiki, WikiPageResponse, WikiSearchRequest, WikiSearchResult};
use async_trait::async_trait;
use tracing::debug;

/// Wiki operations against one project
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Organization URL used to build browser links
    fn organization_url(&self) -> String;

    /// Full-text search across the project's wikis
    async fn search(&self, query: &str) -> Result<Vec<WikiSearchResult>>;

    /// Fetch a page, with content, by its page path
    async fn get_page(&self, wiki_id: &str, path: &str) -> Result<WikiPageResponse>;

    /// Wikis defined in the project
    async fn list_wikis(&self) -> Result<Vec<Wiki>>;
}

/// [`WikiApi`] backed by the Azure DevOps REST API.
///
/// A connection is created per call, so every request picks up a refreshed
/// token when the cached one has expired.
#[derive(Debug, Clone)]
pub struct DevOpsWikiApi {
    connections: ConnectionFactory,
}

impl DevOpsWikiApi {
    pub fn new(connections: ConnectionFactory) -> Self {
        Self { connections }
    }

    fn project(&self) -> &str {
        &self.connections.config().project
    }
}

#[async_trait]
impl WikiApi for DevOpsWikiApi {
    fn organization_url(&self) -> String {
        self.connections.config().organization_url()
    }

    async fn search(&self, query: &str) -> Result<Vec<WikiSearchResult>> {
        let connection = self.connections.connect().await?;
        let request = WikiSearchRequest::new(query, self.connections.config().search_top);
        let response = connection.search_wiki(self.project(), &request).await?;
        debug!(
            "Wiki search for '{query}' returned {} of {} results",
            response.results.len(),
            response.count
        );
        Ok(response.results)
    }

    async fn get_page(&self, wiki_id: &str, path: &str) -> Result<WikiPageResponse> {
        let connection = self.connections.connect().await?;
        connection
            .get_page(self.project(), wiki_id, path, true)
            .await
    }

    async fn list_wikis(&self) -> Result<Vec<Wiki>> {
        let connection = self.connections.connect().await?;
        connection.list_wikis(self.project()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::CredentialSource;
    use crate::error::DevOpsError;
    use edgewiki_core::DevOpsConfig;

    #[tokio::test]
    async fn test_missing_credential_surfaces_before_request() {
        let api = DevOpsWikiApi::new(
            ConnectionFactory::new(DevOpsConfig::default(), CredentialSource::Static(None))
                .unwrap(),
        );

        assert!(matches!(
            api.search("build").await,
            Err(DevOpsError::Config(_))
        ));
        assert!(matches!(
            api.get_page("wiki", "/Intro").await,
            Err(DevOpsError::Config(_))
        ));
        assert!(matches!(api.list_wikis().await, Err(DevOpsError::Config(_))));
    }

    #[test]
    fn test_organization_url() {
        let config = DevOpsConfig {
            organization: "contoso".to_string(),
            ..DevOpsConfig::default()
        };
        let api = DevOpsWikiApi::new(
            ConnectionFactory::new(config, CredentialSource::Static(None)).unwrap(),
        );
        assert_eq!(api.organization_url(), "https://dev.azure.com/contoso");
    }
}
