//! Request handlers behind the MCP tools
//!
//! Both handlers return `Result`; the server turns errors into tool results
//! so a failing backend never becomes a protocol-level fault.

use crate::error::{McpError, Result};
use edgewiki_core::{browse_url, normalize_page_path, WikiPage, WikiSearchHit};
use edgewiki_devops::{WikiApi, WikiType};
use std::sync::Arc;
use tracing::{debug, info};

/// Stateless wiki search and page retrieval
#[derive(Clone)]
pub struct WikiOperations {
    api: Arc<dyn WikiApi>,
    project: String,
}

impl std::fmt::Debug for WikiOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiOperations")
            .field("api", &"<WikiApi>")
            .field("project", &self.project)
            .finish()
    }
}

impl WikiOperations {
    pub fn new(api: Arc<dyn WikiApi>, project: impl Into<String>) -> Self {
        Self {
            api,
            project: project.into(),
        }
    }

    /// Search the project's wikis; every hit carries a browser link
    pub async fn search_wiki(&self, query: &str) -> Result<Vec<WikiSearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(McpError::InvalidInput("query must not be empty".to_string()));
        }

        let organization_url = self.api.organization_url();
        let hits: Vec<WikiSearchHit> = self
            .api
            .search(query)
            .await?
            .into_iter()
            .map(|result| WikiSearchHit {
                url: Some(browse_url(
                    &organization_url,
                    &result.project.id,
                    &result.wiki.id,
                    &result.path,
                )),
                file_name: result.file_name,
                path: result.path,
                wiki_id: result.wiki.id,
            })
            .collect();

        info!("search_wiki '{query}' returned {} hits", hits.len());
        Ok(hits)
    }

    /// Fetch a page by the raw path search returned.
    ///
    /// The path is normalized exactly once here; callers must not decode it.
    pub async fn get_wiki_by_path(&self, path: &str, wiki_id: Option<&str>) -> Result<WikiPage> {
        if path.trim().is_empty() {
            return Err(McpError::InvalidInput("path must not be empty".to_string()));
        }

        let wiki_id = match wiki_id.map(str::trim).filter(|w| !w.is_empty()) {
            Some(id) => id.to_string(),
            None => self.default_wiki_id().await?,
        };

        let page_path = normalize_page_path(path);
        debug!("Fetching '{page_path}' from wiki {wiki_id}");
        let page = self.api.get_page(&wiki_id, &page_path).await?;

        let url = page.remote_url.or_else(|| {
            Some(browse_url(
                &self.api.organization_url(),
                &self.project,
                &wiki_id,
                path,
            ))
        });

        Ok(WikiPage {
            path: page.path,
            url,
            content: page.content.unwrap_or_default(),
        })
    }

    /// The project wiki if there is one, otherwise the first wiki listed
    async fn default_wiki_id(&self) -> Result<String> {
        let wikis = self.api.list_wikis().await?;
        wikis
            .iter()
            .find(|w| w.wiki_type == WikiType::ProjectWiki)
            .or_else(|| wikis.first())
            .map(|w| {
                debug!("Defaulting to wiki {} ({})", w.name, w.id);
                w.id.clone()
            })
            .ok_or_else(|| McpError::NotFound(format!("No wikis found in project {}", self.project)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use edgewiki_devops::models::{ProjectReference, WikiReference};
    use edgewiki_devops::{DevOpsError, Wiki, WikiPageResponse, WikiSearchResult};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records page lookups and serves canned data
    #[derive(Default)]
    struct FakeWikiApi {
        results: Vec<WikiSearchResult>,
        wikis: Vec<Wiki>,
        remote_url: Option<String>,
        fail: bool,
        page_requests: Mutex<Vec<(String, String)>>,
    }

    impl FakeWikiApi {
        fn requested(&self) -> Vec<(String, String)> {
            self.page_requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WikiApi for FakeWikiApi {
        fn organization_url(&self) -> String {
            "https://dev.azure.com/microsoft".to_string()
        }

        async fn search(&self, _query: &str) -> edgewiki_devops::Result<Vec<WikiSearchResult>> {
            if self.fail {
                return Err(DevOpsError::Server("boom".to_string()));
            }
            Ok(self.results.clone())
        }

        async fn get_page(
            &self,
            wiki_id: &str,
            path: &str,
        ) -> edgewiki_devops::Result<WikiPageResponse> {
            if self.fail {
                return Err(DevOpsError::Server("boom".to_string()));
            }
            self.page_requests
                .lock()
                .unwrap()
                .push((wiki_id.to_string(), path.to_string()));
            Ok(WikiPageResponse {
                path: path.to_string(),
                content: Some(format!("content of {path}")),
                remote_url: self.remote_url.clone(),
                url: None,
            })
        }

        async fn list_wikis(&self) -> edgewiki_devops::Result<Vec<Wiki>> {
            Ok(self.wikis.clone())
        }
    }

    fn search_result(file_name: &str, path: &str) -> WikiSearchResult {
        WikiSearchResult {
            file_name: file_name.to_string(),
            path: path.to_string(),
            wiki: WikiReference {
                id: "w-1".to_string(),
                name: None,
            },
            project: ProjectReference {
                id: "p-1".to_string(),
                name: None,
            },
        }
    }

    fn wiki(id: &str, wiki_type: WikiType) -> Wiki {
        Wiki {
            id: id.to_string(),
            name: format!("{id}.wiki"),
            wiki_type,
        }
    }

    fn ops(api: FakeWikiApi) -> (WikiOperations, Arc<FakeWikiApi>) {
        let api = Arc::new(api);
        (WikiOperations::new(api.clone(), "Edge"), api)
    }

    #[tokio::test]
    async fn test_search_shapes_hits() {
        let (ops, _) = ops(FakeWikiApi {
            results: vec![search_result("Getting-Started.md", "/Getting-Started.md")],
            ..Default::default()
        });

        let hits = ops.search_wiki("getting started").await.unwrap();
        assert_eq!(
            hits,
            vec![WikiSearchHit {
                file_name: "Getting-Started.md".to_string(),
                path: "/Getting-Started.md".to_string(),
                wiki_id: "w-1".to_string(),
                url: Some(
                    "https://dev.azure.com/microsoft/p-1/_wiki/wikis/w-1/?pagePath=/Getting%20Started"
                        .to_string()
                ),
            }]
        );
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let (ops, _) = ops(FakeWikiApi::default());
        assert!(matches!(
            ops.search_wiki("  ").await,
            Err(McpError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_search_backend_failure_is_error() {
        let (ops, _) = ops(FakeWikiApi {
            fail: true,
            ..Default::default()
        });
        let err = ops.search_wiki("build").await.unwrap_err();
        assert_eq!(err.to_tool_error_message(), "Server error: boom");
    }

    #[tokio::test]
    async fn test_search_result_path_round_trip() {
        let (ops, api) = ops(FakeWikiApi {
            results: vec![search_result("Intro.md", "Intro.md")],
            ..Default::default()
        });

        let hit = ops.search_wiki("intro").await.unwrap().remove(0);
        ops.get_wiki_by_path(&hit.path, Some(&hit.wiki_id))
            .await
            .unwrap();
        assert_eq!(
            api.requested(),
            vec![("w-1".to_string(), "Intro".to_string())]
        );
    }

    #[tokio::test]
    async fn test_get_page_normalizes_encoded_path() {
        let (ops, api) = ops(FakeWikiApi::default());
        let page = ops
            .get_wiki_by_path("/Build-Instructions/Build%3A-Windows.md", Some("w-1"))
            .await
            .unwrap();

        assert_eq!(
            api.requested(),
            vec![(
                "w-1".to_string(),
                "/Build Instructions/Build: Windows".to_string()
            )]
        );
        assert_eq!(page.path, "/Build Instructions/Build: Windows");
        assert_eq!(page.content, "content of /Build Instructions/Build: Windows");
    }

    #[tokio::test]
    async fn test_get_page_prefers_remote_url() {
        let (ops, _) = ops(FakeWikiApi {
            remote_url: Some("https://dev.azure.com/microsoft/Edge/_wiki/wikis/w-1/7/Intro".to_string()),
            ..Default::default()
        });
        let page = ops.get_wiki_by_path("/Intro.md", Some("w-1")).await.unwrap();
        assert_eq!(
            page.url.as_deref(),
            Some("https://dev.azure.com/microsoft/Edge/_wiki/wikis/w-1/7/Intro")
        );
    }

    #[tokio::test]
    async fn test_get_page_builds_url_without_remote_url() {
        let (ops, _) = ops(FakeWikiApi::default());
        let page = ops.get_wiki_by_path("/Intro.md", Some("w-1")).await.unwrap();
        assert_eq!(
            page.url.as_deref(),
            Some("https://dev.azure.com/microsoft/Edge/_wiki/wikis/w-1/?pagePath=/Intro")
        );
    }

    #[tokio::test]
    async fn test_get_page_defaults_to_project_wiki() {
        let (ops, api) = ops(FakeWikiApi {
            wikis: vec![
                wiki("code", WikiType::CodeWiki),
                wiki("project", WikiType::ProjectWiki),
            ],
            ..Default::default()
        });
        ops.get_wiki_by_path("/Intro.md", None).await.unwrap();
        assert_eq!(api.requested()[0].0, "project");
    }

    #[tokio::test]
    async fn test_get_page_defaults_to_first_wiki() {
        let (ops, api) = ops(FakeWikiApi {
            wikis: vec![wiki("code", WikiType::CodeWiki)],
            ..Default::default()
        });
        ops.get_wiki_by_path("/Intro.md", Some("  ")).await.unwrap();
        assert_eq!(api.requested()[0].0, "code");
    }

    #[tokio::test]
    async fn test_get_page_without_wikis_fails() {
        let (ops, _) = ops(FakeWikiApi::default());
        assert!(matches!(
            ops.get_wiki_by_path("/Intro.md", None).await,
            Err(McpError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_page_backend_failure_is_error() {
        let (ops, _) = ops(FakeWikiApi {
            fail: true,
            ..Default::default()
        });
        assert!(matches!(
            ops.get_wiki_by_path("/Intro.md", Some("w-1")).await,
            Err(McpError::Backend(_))
        ));
    }
}
