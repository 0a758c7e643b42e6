//! Token from the signed-in Azure CLI session (`az login`)

use crate::credentials::TokenCredential;
use crate::error::{AuthError, Result};
use crate::token::AccessToken;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

const NAME: &str = "AzureCliCredential";

/// `az` can be slow on a cold start, but should not hang the server
const CLI_TIMEOUT_SECS: u64 = 10;

/// Tenants that mean "whatever the CLI is signed in to"
const GENERIC_TENANTS: &[&str] = &["organizations", "common"];

/// Output of `az account get-access-token --output json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenOutput {
    access_token: String,
    /// Local time, e.g. `2024-05-01 13:37:00.000000`
    expires_on: Option<String>,
    /// Unix seconds, only printed by newer CLI versions
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
}

/// Acquires tokens by shelling out to the Azure CLI
#[derive(Debug, Clone)]
pub struct AzureCliCredential {
    az_command: String,
    tenant_id: Option<String>,
}

impl AzureCliCredential {
    pub fn new(az_command: impl Into<String>, tenant_id: Option<String>) -> Self {
        let tenant_id = tenant_id.filter(|t| !GENERIC_TENANTS.contains(&t.as_str()));
        Self {
            az_command: az_command.into(),
            tenant_id,
        }
    }

    fn command(&self, resource: &str) -> Command {
        let mut args = vec![
            "account".to_string(),
            "get-access-token".to_string(),
            "--output".to_string(),
            "json".to_string(),
            "--resource".to_string(),
            resource.to_string(),
        ];
        if let Some(ref tenant) = self.tenant_id {
            args.push("--tenant".to_string());
            args.push(tenant.clone());
        }

        // az is a batch script on Windows
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.az_command);
            c
        } else {
            Command::new(&self.az_command)
        };
        command.args(args).kill_on_drop(true);
        command
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    fn name(&self) -> &str {
        NAME
    }

    async fn get_token(&self, resource: &str) -> Result<AccessToken> {
        debug!("Requesting token from Azure CLI for {resource}");

        let output = tokio::time::timeout(
            Duration::from_secs(CLI_TIMEOUT_SECS),
            self.command(resource).output(),
        )
        .await
        .map_err(|_| AuthError::Timeout(CLI_TIMEOUT_SECS))?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuthError::unavailable(NAME, "Azure CLI not found on PATH")
            } else {
                AuthError::Process(format!("Failed to run Azure CLI: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_cli_failure(&stderr));
        }

        parse_cli_output(&output.stdout)
    }
}

fn classify_cli_failure(stderr: &str) -> AuthError {
    if stderr.contains("az login") || stderr.contains("az account set") {
        AuthError::unavailable(NAME, "Please run 'az login' to set up an account")
    } else if stderr.contains("not recognized") || stderr.contains("command not found") {
        AuthError::unavailable(NAME, "Azure CLI not found on PATH")
    } else {
        AuthError::Process(stderr.trim().to_string())
    }
}

fn parse_cli_output(stdout: &[u8]) -> Result<AccessToken> {
    let parsed: CliTokenOutput = serde_json::from_slice(stdout)
        .map_err(|e| AuthError::InvalidResponse(format!("Unexpected Azure CLI output: {e}")))?;

    let expires_on = match (parsed.expires_on_unix, parsed.expires_on.as_deref()) {
        (Some(secs), _) => DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
            AuthError::InvalidResponse(format!("Invalid expires_on timestamp: {secs}"))
        })?,
        (None, Some(local)) => parse_local_expiry(local)?,
        (None, None) => {
            return Err(AuthError::InvalidResponse(
                "Azure CLI output has no expiry".to_string(),
            ))
        }
    };

    Ok(AccessToken::new(parsed.access_token, expires_on))
}

fn parse_local_expiry(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| AuthError::InvalidResponse(format!("Invalid expiresOn '{value}': {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AuthError::InvalidResponse(format!("Nonexistent local time '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unix_expiry_preferred() {
        let out = br#"{
            "accessToken": "abc",
            "expiresOn": "2000-01-01 00:00:00.000000",
            "expires_on": 1893456000,
            "tokenType": "Bearer"
        }"#;
        let token = parse_cli_output(out).unwrap();
        assert_eq!(token.token, "abc");
        assert_eq!(token.expires_on.timestamp(), 1893456000);
    }

    #[test]
    fn test_parse_local_expiry() {
        let out = br#"{"accessToken": "abc", "expiresOn": "2030-06-01 12:30:00.000000"}"#;
        let token = parse_cli_output(out).unwrap();
        let expected = Local
            .with_ymd_and_hms(2030, 6, 1, 12, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(token.expires_on, expected);
    }

    #[test]
    fn test_parse_missing_expiry() {
        let out = br#"{"accessToken": "abc"}"#;
        assert!(matches!(
            parse_cli_output(out),
            Err(AuthError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_cli_output(b"ERROR: something").is_err());
    }

    #[test]
    fn test_classify_not_logged_in() {
        let err = classify_cli_failure("ERROR: Please run 'az login' to setup account.");
        assert!(matches!(err, AuthError::CredentialUnavailable { .. }));
    }

    #[test]
    fn test_classify_other_failure() {
        let err = classify_cli_failure("ERROR: AADSTS50076 something else\n");
        match err {
            AuthError::Process(msg) => assert_eq!(msg, "ERROR: AADSTS50076 something else"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_generic_tenant_dropped() {
        let cred = AzureCliCredential::new("az", Some("organizations".to_string()));
        assert!(cred.tenant_id.is_none());
        let cred = AzureCliCredential::new("az", Some("contoso.onmicrosoft.com".to_string()));
        assert_eq!(cred.tenant_id.as_deref(), Some("contoso.onmicrosoft.com"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let cred = AzureCliCredential::new("edgewiki-definitely-not-az", None);
        if cfg!(windows) {
            // cmd /C reports a missing program on stderr instead
            assert!(cred.get_token("resource").await.is_err());
        } else {
            let err = cred.get_token("resource").await.unwrap_err();
            assert!(matches!(err, AuthError::CredentialUnavailable { .. }));
        }
    }
}
