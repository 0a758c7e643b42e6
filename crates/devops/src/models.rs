//! Wire types for the Azure DevOps wiki and search REST APIs

use serde::{Deserialize, Serialize};

/// Body of `POST {project}/_apis/search/wikisearchresults`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiSearchRequest {
    pub search_text: String,
    #[serde(rename = "$skip")]
    pub skip: usize,
    #[serde(rename = "$top")]
    pub top: usize,
    pub include_facets: bool,
}

impl WikiSearchRequest {
    pub fn new(search_text: impl Into<String>, top: usize) -> Self {
        Self {
            search_text: search_text.into(),
            skip: 0,
            top,
            include_facets: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiSearchResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<WikiSearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiSearchResult {
    pub file_name: String,
    pub path: String,
    pub wiki: WikiReference,
    pub project: ProjectReference,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiReference {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A page as returned by `GET .../wikis/{wiki}/pages?path=...`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPageResponse {
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Kind of wiki within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WikiType {
    ProjectWiki,
    CodeWiki,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wiki {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub wiki_type: WikiType,
}

/// Envelope Azure DevOps uses for list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}
