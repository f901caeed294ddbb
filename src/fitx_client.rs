//! HTTP client for the FitX member portal.
//!
//! Covers the login exchange (session cookie) and the check-in history
//! report, both carrying the portal's fixed request headers.

use std::time::Duration;

use chrono::Utc;
use reqwest::{header, Method};
use serde::{Deserialize, Serialize};

use crate::config::PortalConfig;
use crate::dates::{normalize_date, trailing_window};
use crate::error::{SyncError, SyncResult};

const LOGIN_PATH: &str = "/login";
const HISTORY_PATH: &str = "/nox/v1/studios/checkin/history/report";

const CLIENT_TYPE_HEADER: &str = "x-nox-client-type";
const FACILITY_GROUP_HEADER: &str = "x-public-facility-group";
const TENANT_HEADER: &str = "x-tenant";
const CLIENT_TYPE: &str = "WEB";

const SESSION_COOKIE_PREFIX: &str = "SESSION=";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct FitxClient {
    client: reqwest::Client,
    config: PortalConfig,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// History entries arrive either as bare date strings or as records carrying
/// a `date` field, depending on the report variant the portal serves.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CheckinEntry {
    Date(String),
    Record { date: String },
}

impl CheckinEntry {
    fn date(&self) -> &str {
        match self {
            CheckinEntry::Date(date) => date,
            CheckinEntry::Record { date } => date,
        }
    }
}

impl FitxClient {
    pub fn new(config: PortalConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, config })
    }

    /// Log in and return the session cookie segment (`SESSION=<token>`).
    ///
    /// The token is only valid for the current run and is never persisted.
    pub async fn login(&self) -> SyncResult<String> {
        let body = LoginRequest {
            username: &self.config.username,
            password: &self.config.password,
        };

        let response = self
            .request(Method::POST, LOGIN_PATH)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::http("login", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Auth {
                status,
                reason: "login rejected".to_string(),
            });
        }

        for value in response.headers().get_all(header::SET_COOKIE) {
            if let Some(token) = value.to_str().ok().and_then(extract_session_cookie) {
                return Ok(token);
            }
        }

        Err(SyncError::Auth {
            status,
            reason: "no SESSION cookie in login response".to_string(),
        })
    }

    /// Fetch the check-in history for the trailing 365-day window, normalized
    /// to `MM/DD/YYYY` in report order.
    pub async fn fetch_checkin_history(&self, session_cookie: &str) -> SyncResult<Vec<String>> {
        let (from, to) = trailing_window(Utc::now().date_naive());

        let response = self
            .request(Method::GET, HISTORY_PATH)
            .query(&[
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
            ])
            .header(header::COOKIE, session_cookie)
            .send()
            .await
            .map_err(|e| SyncError::http("history fetch", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SyncError::HistoryFetch { status, body });
        }

        let entries: Vec<CheckinEntry> = response
            .json()
            .await
            .map_err(|e| SyncError::http("history decode", e))?;

        Ok(entries
            .iter()
            .map(|entry| normalize_date(entry.date()))
            .collect())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        self.client
            .request(method, url)
            .header(CLIENT_TYPE_HEADER, CLIENT_TYPE)
            .header(header::AUTHORIZATION, self.config.authorization.as_str())
            .header(FACILITY_GROUP_HEADER, self.config.facility_group.as_str())
            .header(TENANT_HEADER, self.config.tenant.as_str())
    }
}

/// Locate the `SESSION=` segment in a `Set-Cookie` value and keep everything
/// up to the first `;`.
fn extract_session_cookie(cookies: &str) -> Option<String> {
    cookies
        .split(',')
        .map(str::trim)
        .find(|segment| segment.starts_with(SESSION_COOKIE_PREFIX))
        .map(|segment| segment.split(';').next().unwrap_or(segment).to_string())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(base_url: String) -> PortalConfig {
        PortalConfig {
            base_url,
            username: "member@example.com".to_string(),
            password: "hunter2".to_string(),
            authorization: "Basic dGVzdC10b2tlbg==".to_string(),
            tenant: "fitx".to_string(),
            facility_group: "FITXDE-TEST".to_string(),
        }
    }

    fn test_client(base_url: String) -> FitxClient {
        FitxClient::new(test_config(base_url)).expect("client builds")
    }

    #[test]
    fn extracts_session_segment_up_to_first_semicolon() {
        let token = extract_session_cookie("SESSION=abc123; Path=/; HttpOnly");
        assert_eq!(token.as_deref(), Some("SESSION=abc123"));
    }

    #[test]
    fn finds_session_cookie_among_other_cookies() {
        let token = extract_session_cookie("theme=dark; Path=/, SESSION=xyz; Secure");
        assert_eq!(token.as_deref(), Some("SESSION=xyz"));
    }

    #[test]
    fn no_session_cookie_yields_none() {
        assert_eq!(extract_session_cookie("theme=dark; Path=/"), None);
    }

    #[tokio::test]
    async fn login_returns_session_cookie() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(header("x-nox-client-type", "WEB"))
            .and(header("x-tenant", "fitx"))
            .and(header("x-public-facility-group", "FITXDE-TEST"))
            .and(body_json(serde_json::json!({
                "username": "member@example.com",
                "password": "hunter2"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "SESSION=abc123; Path=/; HttpOnly"),
            )
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let token = client.login().await.expect("login succeeds");

        assert_eq!(token, "SESSION=abc123");
    }

    #[tokio::test]
    async fn rejected_login_is_an_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client.login().await.expect_err("login fails");

        assert!(matches!(
            err,
            SyncError::Auth { status, .. } if status == reqwest::StatusCode::UNAUTHORIZED
        ));
    }

    #[tokio::test]
    async fn login_without_session_cookie_is_an_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client.login().await.expect_err("login fails");

        assert!(matches!(err, SyncError::Auth { status, .. } if status.is_success()));
    }

    #[tokio::test]
    async fn history_normalizes_string_and_record_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nox/v1/studios/checkin/history/report"))
            .and(header("cookie", "SESSION=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                "3/4/2024",
                "03-05-2024",
                { "date": "3/6/2024", "studio": "Test City" }
            ])))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let history = client
            .fetch_checkin_history("SESSION=abc123")
            .await
            .expect("history fetch succeeds");

        assert_eq!(history, vec!["03/04/2024", "03/05/2024", "03/06/2024"]);
    }

    #[tokio::test]
    async fn failed_history_fetch_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nox/v1/studios/checkin/history/report"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .fetch_checkin_history("SESSION=abc123")
            .await
            .expect_err("history fetch fails");

        match err {
            SyncError::HistoryFetch { status, body } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "backend exploded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
