//! Authenticated HTTP session
//!
//! Logs in once with the account login and API key, keeps the session
//! cookies issued by the service, and attaches them to every later call.
//! The cookie list never changes after login; an expired session surfaces
//! as a `Status` error and is not renewed.

use crate::config::CrmConfig;
use crate::models::auth::{AuthAccount, AuthEnvelope};
use crate::services::encoder::Query;
use crate::utils::error::{from_transport, helpers, CrmError, CrmResult};
use crate::utils::logging::{truncate_body, LOG_BODY_LIMIT};
use anyhow::Context;
use reqwest::header::{HeaderMap, ACCEPT, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Login endpoint
pub const AUTH_PATH: &str = "/private/api/auth.php";

const JSON: &str = "application/json";

/// Logged-in connection to one amoCRM account
#[derive(Clone)]
pub struct Session {
    client: Client,
    base_url: String,
    login: String,
    cookies: Vec<(String, String)>,
    cookie_header: String,
    accounts: Vec<AuthAccount>,
}

impl Session {
    /// Authenticate and open a session
    pub async fn connect(config: &CrmConfig) -> CrmResult<Self> {
        config.validate()?;
        let base_url = config.url()?.as_str().trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        let span = info_span!(
            "crm_call",
            request_id = %Uuid::new_v4(),
            method = %Method::POST,
            path = AUTH_PATH,
        );

        Self::authenticate(client, base_url, config).instrument(span).await
    }

    async fn authenticate(client: Client, base_url: String, config: &CrmConfig) -> CrmResult<Self> {
        debug!("Authenticating as {}", config.login);

        let response = client
            .post(format!("{}{}", base_url, AUTH_PATH))
            .query(&[("type", "json")])
            .header(ACCEPT, JSON)
            .form(&[
                ("USER_LOGIN", config.login.as_str()),
                ("USER_HASH", config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Login request failed: {}", e);
                from_transport(e)
            })?;

        let status = response.status();
        let cookies = session_cookies(response.headers());
        let body = response.bytes().await.map_err(from_transport)?;

        if status != StatusCode::OK {
            warn!("Login answered with status {}", status);
            return Err(helpers::status_error(
                status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }

        let envelope: AuthEnvelope = serde_json::from_slice(&body)?;
        let auth = envelope.response;
        if !auth.auth {
            warn!("Login rejected (code {:?})", auth.error_code);
            return Err(helpers::auth_error(
                auth.error_code,
                auth.error
                    .unwrap_or_else(|| "credentials rejected".to_string()),
            ));
        }

        info!(
            "Logged in to {} with {} account(s), {} cookie(s)",
            base_url,
            auth.accounts.len(),
            cookies.len()
        );

        let cookie_header = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(Self {
            client,
            base_url,
            login: config.login.clone(),
            cookies,
            cookie_header,
            accounts: auth.accounts,
        })
    }

    /// GET a JSON resource with query parameters
    ///
    /// A 204 or empty answer yields an empty body.
    pub async fn get(&self, path: &str, query: &Query) -> CrmResult<Vec<u8>> {
        let request = self
            .client
            .get(self.url(path))
            .query(query.pairs())
            .header(ACCEPT, JSON);
        self.send(Method::GET, path, request).await
    }

    /// POST a JSON body
    pub async fn post_json<B>(&self, path: &str, body: &B) -> CrmResult<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        debug!(
            "POST {} body: {}",
            path,
            truncate_body(
                serde_json::to_string(body).unwrap_or_default().as_bytes(),
                LOG_BODY_LIMIT
            )
        );
        let request = self
            .client
            .post(self.url(path))
            .header(ACCEPT, JSON)
            .json(body);
        self.send(Method::POST, path, request).await
    }

    /// GET any path and return the raw bytes
    pub async fn get_raw(&self, path: &str) -> CrmResult<Vec<u8>> {
        let request = self.client.get(self.url(path));
        self.send(Method::GET, path, request).await
    }

    /// Accounts the credentials have access to, as reported at login
    pub fn accounts(&self) -> &[AuthAccount] {
        &self.accounts
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// Session cookies as `(name, value)` pairs
    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> CrmResult<Vec<u8>> {
        let span = info_span!(
            "crm_call",
            request_id = %Uuid::new_v4(),
            method = %method,
            path = %path,
        );

        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: RequestBuilder) -> CrmResult<Vec<u8>> {
        let start_time = Instant::now();
        let request = if self.cookie_header.is_empty() {
            request
        } else {
            request.header(COOKIE, self.cookie_header.as_str())
        };

        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            from_transport(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(from_transport)?;
        let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        if !status.is_success() {
            warn!(
                "Request failed with {} in {:.2}ms: {}",
                status,
                elapsed_ms,
                truncate_body(&body, LOG_BODY_LIMIT)
            );
            return Err(CrmError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if status == StatusCode::NO_CONTENT {
            debug!("No content in {:.2}ms", elapsed_ms);
            return Ok(Vec::new());
        }

        debug!(
            "Response {} in {:.2}ms: {}",
            status,
            elapsed_ms,
            truncate_body(&body, LOG_BODY_LIMIT)
        );
        Ok(body.to_vec())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.cookies.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("cookies", &names)
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

/// `name=value` pairs from every `Set-Cookie` header, attributes dropped
fn session_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| raw.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}
