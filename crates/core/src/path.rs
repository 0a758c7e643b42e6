//! Wiki path handling
//!
//! Search hits report the path of the markdown file backing a page
//! (`/Getting-Started/Build%3A-Windows.md`), while the page API expects the
//! page path (`/Getting Started/Build: Windows`).

use percent_encoding::percent_decode_str;

const MARKDOWN_SUFFIX: &str = ".md";

/// Convert a search-result path into the path the page API understands.
///
/// Dashes become spaces, a trailing `.md` is removed, then the result is
/// percent-decoded. This is not idempotent: apply it exactly once, to the
/// path exactly as the search API returned it.
pub fn normalize_page_path(path: &str) -> String {
    let spaced = path.replace('-', " ");
    let stem = spaced.strip_suffix(MARKDOWN_SUFFIX).unwrap_or(&spaced);
    percent_decode_str(stem).decode_utf8_lossy().into_owned()
}

/// Build the browser URL of a wiki page from a search-result path.
pub fn browse_url(organization_url: &str, project_id: &str, wiki_id: &str, path: &str) -> String {
    let encoded = path.replace('-', "%20");
    let page_path = encoded.strip_suffix(MARKDOWN_SUFFIX).unwrap_or(&encoded);
    format!(
        "{}/{project_id}/_wiki/wikis/{wiki_id}/?pagePath={page_path}",
        organization_url.trim_end_matches('/')
    )
}
