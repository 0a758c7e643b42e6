//! Prompt templates exposed over MCP

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};

/// Name of the search workflow prompt
pub const START_SEARCH_PROMPT: &str = "start_edge_wiki_search";

const START_SEARCH_DESCRIPTION: &str =
    "Prompt the assistant to search the Edge wiki and answer from the page content";

/// Workflow guidance, also returned as the server instructions
pub const SEARCH_GUIDANCE: &str = "\
You're an AI assistant for the Microsoft Edge wiki.

Analyze the user's question and extract the relevant keywords to form a query. \
Remove phrases such as \"How to\" and \"What is\" from the query. \
If a query returns nothing useful, simplify it to keywords only and try again.

Use the refined query to find relevant wiki entries with `search_wiki`. \
Once you have a page path from the search results, pass it unchanged to `get_wiki_by_path` \
together with its `wiki_id` to retrieve the full page. \
The path may be URL-encoded; do not decode it.

Answer the user's question from the page content. Cite your sources with a link in the form \
\"For more details, see [Filename](url)\", where url is the 'url' field of the \
get_wiki_by_path response.";

/// All prompts this server offers
pub fn list() -> Vec<Prompt> {
    vec![Prompt::new(
        START_SEARCH_PROMPT,
        Some(START_SEARCH_DESCRIPTION),
        None,
    )]
}

/// Render a prompt by name
pub fn get(name: &str) -> Option<GetPromptResult> {
    match name {
        START_SEARCH_PROMPT => Some(GetPromptResult {
            description: Some(START_SEARCH_DESCRIPTION.to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                SEARCH_GUIDANCE,
            )],
        }),
        _ => None,
    }
}
