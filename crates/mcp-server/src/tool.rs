//! MCP tool definitions for edgewiki
//!
//! Defines the `search_wiki` and `get_wiki_by_path` tool schemas.

use schemars::JsonSchema;
use serde::Deserialize;

/// Request schema for the search_wiki MCP tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchWikiInput {
    /// Keywords to search for. Drop filler such as "how to" or "what is".
    #[schemars(description = "Keyword query, e.g. \"build windows debug\"")]
    pub query: String,
}

/// Request schema for the get_wiki_by_path MCP tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWikiByPathInput {
    /// Path exactly as returned by search_wiki. Do not decode it.
    #[schemars(description = "Page path from search_wiki, unmodified (may be URL-encoded)")]
    pub path: String,

    /// Wiki identifier from search_wiki. Defaults to the project wiki.
    #[schemars(description = "wiki_id from search_wiki; omit to use the project wiki")]
    pub wiki_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_input_deserialization() {
        let input: SearchWikiInput = serde_json::from_str(r#"{"query": "build"}"#).unwrap();
        assert_eq!(input.query, "build");
    }

    #[test]
    fn test_get_page_input_deserialization() {
        let json = r#"{
            "path": "/Build%3A-Windows.md",
            "wiki_id": "w-1"
        }"#;

        let input: GetWikiByPathInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.path, "/Build%3A-Windows.md");
        assert_eq!(input.wiki_id.as_deref(), Some("w-1"));
    }

    #[test]
    fn test_get_page_minimal_input() {
        let input: GetWikiByPathInput = serde_json::from_str(r#"{"path": "/Intro.md"}"#).unwrap();
        assert!(input.wiki_id.is_none());
    }

    #[test]
    fn test_missing_query_rejected() {
        assert!(serde_json::from_str::<SearchWikiInput>("{}").is_err());
    }
}
