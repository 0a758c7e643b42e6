//! Default values and functions for configuration

// Default constants
pub const DEFAULT_ORGANIZATION: &str = "microsoft";
pub const DEFAULT_PROJECT: &str = "Edge";

/// Azure DevOps resource id, the audience of managed tokens
pub const DEVOPS_RESOURCE_ID: &str = "499b84ac-1321-427f-aa17-267ca6975798";

pub(crate) const DEFAULT_BASE_URL: &str = "https://dev.azure.com";
pub(crate) const DEFAULT_SEARCH_BASE_URL: &str = "https://almsearch.dev.azure.com";
pub(crate) const DEFAULT_API_VERSION: &str = "7.0";
pub(crate) const DEFAULT_TENANT_ID: &str = "organizations";
// Azure CLI's public client, also used by the developer sign-on flows
pub(crate) const DEFAULT_CLIENT_ID: &str = "04b07795-8ddb-461a-bbee-02f9e1bf7b46";
pub(crate) const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub(crate) const DEFAULT_AZ_COMMAND: &str = "az";

/// Upper bound the search API accepts for `$top`
pub(crate) const MAX_SEARCH_TOP: usize = 1000;

pub(crate) fn default_organization() -> String {
    DEFAULT_ORGANIZATION.to_string()
}

pub(crate) fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}

pub(crate) fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

pub(crate) fn default_search_top() -> usize {
    500
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_resource_id() -> String {
    DEVOPS_RESOURCE_ID.to_string()
}

pub(crate) fn default_tenant_id() -> String {
    DEFAULT_TENANT_ID.to_string()
}

pub(crate) fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

pub(crate) fn default_authority_host() -> String {
    DEFAULT_AUTHORITY_HOST.to_string()
}

pub(crate) fn default_browser_timeout_secs() -> u64 {
    300
}

pub(crate) fn default_az_command() -> String {
    DEFAULT_AZ_COMMAND.to_string()
}
