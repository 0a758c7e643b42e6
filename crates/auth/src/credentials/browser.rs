//! Interactive browser login (OAuth 2.0 authorization code flow with PKCE)
//!
//! A small axum server on the loopback interface receives the redirect from
//! the identity provider, and the authorization code is exchanged for an
//! access token. Only one login runs at a time per credential.

use crate::credentials::TokenCredential;
use crate::error::{AuthError, Result};
use crate::token::AccessToken;
use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration as ChronoDuration, Utc};
use rand::RngCore;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch, Mutex};
use tracing::{debug, info, warn};
use url::Url;

const NAME: &str = "InteractiveBrowserCredential";

/// Token endpoint timeout in seconds
const TOKEN_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How long the redirect server may take to finish its last response
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const SUCCESS_PAGE: &str = "<html><body>Authentication complete. You can close this window.</body></html>";
const FAILURE_PAGE: &str = "<html><body>Authentication failed. Check the edgewiki logs.</body></html>";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Query string of the redirect back from the authorize endpoint
#[derive(Debug, Default, Deserialize)]
struct RedirectParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Settings for the browser login
#[derive(Debug, Clone)]
pub struct BrowserLoginSettings {
    pub authority_host: String,
    pub tenant_id: String,
    pub client_id: String,
    pub timeout_secs: u64,
}

/// Acquires tokens by sending the user through a browser sign-in
pub struct InteractiveBrowserCredential {
    settings: BrowserLoginSettings,
    client: Client,
    login_lock: Mutex<()>,
}

impl InteractiveBrowserCredential {
    pub fn new(settings: BrowserLoginSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TOKEN_REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            settings,
            client,
            login_lock: Mutex::new(()),
        })
    }

    fn endpoint(&self, leaf: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/{leaf}",
            self.settings.authority_host.trim_end_matches('/'),
            self.settings.tenant_id
        )
    }

    fn authorize_url(
        &self,
        redirect_uri: &str,
        scope: &str,
        challenge: &str,
        state: &str,
    ) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint("authorize"),
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", redirect_uri),
                ("response_mode", "query"),
                ("scope", scope),
                ("code_challenge", challenge),
                ("code_challenge_method", "S256"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AuthError::InvalidResponse(format!("Invalid authority URL: {e}")))
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        scope: &str,
        verifier: &str,
    ) -> Result<AccessToken> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .form(&[
                ("client_id", self.settings.client_id.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("code_verifier", verifier),
                ("scope", scope),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(desc) => format!("{}: {desc}", e.error),
                    None => e.error,
                })
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(AuthError::InvalidResponse(message));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse token: {e}")))?;
        Ok(AccessToken::new(
            token.access_token,
            Utc::now() + ChronoDuration::seconds(token.expires_in),
        ))
    }
}

#[async_trait]
impl TokenCredential for InteractiveBrowserCredential {
    fn name(&self) -> &str {
        NAME
    }

    async fn get_token(&self, resource: &str) -> Result<AccessToken> {
        let _login = self.login_lock.lock().await;

        let (listeners, port) = bind_loopback().await?;
        let redirect_uri = format!("http://localhost:{port}");
        let scope = scope_for(resource);
        let (verifier, challenge) = pkce_pair();
        let state = random_token(16);

        let url = self.authorize_url(&redirect_uri, &scope, &challenge, &state)?;
        info!("Opening browser for sign-in: {url}");
        if let Err(e) = open_browser(url.as_str()) {
            warn!("Could not open a browser ({e}); open the URL above manually");
        }

        let code = receive_redirect(
            listeners,
            &state,
            Duration::from_secs(self.settings.timeout_secs),
        )
        .await?;

        self.exchange_code(&code, &redirect_uri, &scope, &verifier)
            .await
    }
}

/// `.default` scope for a resource id or URI
fn scope_for(resource: &str) -> String {
    format!("{}/.default", resource.trim_end_matches('/'))
}

fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// Returns `(verifier, S256 challenge)`
fn pkce_pair() -> (String, String) {
    let verifier = random_token(32);
    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
    (verifier, challenge)
}

fn open_browser(url: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("rundll32");
        c.arg("url.dll,FileProtocolHandler");
        c
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else {
        std::process::Command::new("xdg-open")
    };
    command
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}

/// Listen on one port on both loopback addresses.
///
/// `localhost` may resolve to either family; IPv6 is skipped when unavailable.
async fn bind_loopback() -> Result<(Vec<TcpListener>, u16)> {
    let v4 = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .map_err(|e| AuthError::unavailable(NAME, format!("Cannot listen for redirect: {e}")))?;
    let port = v4
        .local_addr()
        .map_err(|e| AuthError::unavailable(NAME, e.to_string()))?
        .port();

    let mut listeners = vec![v4];
    match TcpListener::bind(SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), port)).await {
        Ok(v6) => listeners.push(v6),
        Err(e) => debug!("IPv6 loopback unavailable for redirect: {e}"),
    }
    Ok((listeners, port))
}

/// Shared by the redirect handler across connections
struct RedirectState {
    expected_state: String,
    outcome: Mutex<Option<oneshot::Sender<Result<String>>>>,
}

async fn handle_redirect(
    State(redirect): State<Arc<RedirectState>>,
    Query(params): Query<RedirectParams>,
) -> (StatusCode, Html<&'static str>) {
    let outcome = match check_redirect(params, &redirect.expected_state) {
        Ok(None) => return (StatusCode::BAD_REQUEST, Html(FAILURE_PAGE)),
        Ok(Some(code)) => Ok(code),
        Err(e) => Err(e),
    };

    let page = if outcome.is_ok() {
        SUCCESS_PAGE
    } else {
        FAILURE_PAGE
    };
    if let Some(sender) = redirect.outcome.lock().await.take() {
        let _ = sender.send(outcome);
    }
    (StatusCode::OK, Html(page))
}

/// Serve the redirect on `listeners` until it arrives or `wait` elapses
async fn receive_redirect(
    listeners: Vec<TcpListener>,
    expected_state: &str,
    wait: Duration,
) -> Result<String> {
    let (sender, receiver) = oneshot::channel();
    let app = Router::new()
        .route("/", get(handle_redirect))
        .with_state(Arc::new(RedirectState {
            expected_state: expected_state.to_string(),
            outcome: Mutex::new(Some(sender)),
        }));

    let (shutdown, _) = watch::channel(false);
    let servers: Vec<_> = listeners
        .into_iter()
        .map(|listener| {
            let app = app.clone();
            let mut stop = shutdown.subscribe();
            tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = stop.changed().await;
                    })
                    .await
            })
        })
        .collect();

    let outcome = tokio::time::timeout(wait, receiver).await;

    let _ = shutdown.send(true);
    for mut server in servers {
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await.is_err() {
            server.abort();
        }
    }

    match outcome {
        Err(_) => Err(AuthError::Timeout(wait.as_secs())),
        Ok(Err(_)) => Err(AuthError::Process(
            "Redirect server stopped before sign-in completed".to_string(),
        )),
        Ok(Ok(result)) => result,
    }
}

/// Authorization code from the redirect query.
///
/// Returns `Ok(None)` when the request carries neither a code nor an error.
fn check_redirect(params: RedirectParams, expected_state: &str) -> Result<Option<String>> {
    if let Some(error) = params.error {
        return Err(AuthError::InvalidResponse(match params.error_description {
            Some(desc) => format!("{error}: {desc}"),
            None => error,
        }));
    }

    match (params.code, params.state) {
        (Some(code), Some(state)) if state == expected_state => Ok(Some(code)),
        (Some(_), _) => Err(AuthError::InvalidResponse(
            "Redirect state does not match the login request".to_string(),
        )),
        (None, _) => Ok(None),
    }
}
