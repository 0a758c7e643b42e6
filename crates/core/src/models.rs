//! Response records handed back to MCP clients

use serde::{Deserialize, Serialize};

/// A single wiki search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiSearchHit {
    /// File name of the page, e.g. `Getting-Started.md`
    pub file_name: String,
    /// Path as returned by search, possibly percent-encoded
    pub path: String,
    /// Identifier of the wiki the page lives in
    pub wiki_id: String,
    /// Browser URL of the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A wiki page with its markdown content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_serialization_omits_missing_url() {
        let hit = WikiSearchHit {
            file_name: "Intro.md".to_string(),
            path: "/Intro.md".to_string(),
            wiki_id: "w1".to_string(),
            url: None,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"file_name": "Intro.md", "path": "/Intro.md", "wiki_id": "w1"})
        );
    }

    #[test]
    fn test_page_serialization() {
        let page = WikiPage {
            path: "/Intro".to_string(),
            url: Some("https://example.test/Intro".to_string()),
            content: "# Intro".to_string(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["path"], "/Intro");
        assert_eq!(json["url"], "https://example.test/Intro");
        assert_eq!(json["content"], "# Intro");
    }
}
