//! # LINE API Integration Module
//!
//! This module is the request collaborator of every operation: it performs one
//! authenticated HTTP call per method invocation and returns either a parsed body
//! or an [`ApiError`]. Operations never talk to `reqwest` directly; they receive
//! one of the traits below and [`LineClient`] is the production implementation.
//!
//! ## Architecture
//!
//! ```text
//! Operation Layer (cli::*)
//!          ↓
//! Request traits
//!     ├── OAuthApi   (channel access token issue / revoke / verify)
//!     ├── ThingsApi  (trial products, devices, scenario sets)
//!     └── TvApi      (categories, category home, modules, spotlight)
//!          ↓
//! LineClient (reqwest, JSON)
//!          ↓
//! api.line.me
//! ```
//!
//! ## Error Handling
//!
//! - `502 Bad Gateway` responses are retried a few times with a fixed delay
//! - Every other non-success status becomes [`ApiError::Status`] carrying the body
//! - Connection failures and timeouts become [`ApiError::Transport`]
//! - Malformed bodies become [`ApiError::Decode`]
//! - An API host that cannot carry path segments becomes [`ApiError::Url`]
//!
//! Nothing is retried beyond that; the caller logs the error and stops.
//!
//! ## Authentication
//!
//! - OAuth endpoints take the channel credentials as form fields
//! - LINE Things endpoints send `Authorization: Bearer <channel access token>`
//! - LINE TV endpoints send the channel ID in the `X-LINE-ChannelId` header
//!
//! ## Response Bodies
//!
//! Bodies are parsed once into a [`serde_json::Value`] and decoded from there
//! into the wire types. Both are handed back as a [`Received`], so JSON output
//! shows the document as the API sent it.
//!
//! ## Paths
//!
//! IDs typed by the user (products, devices, users) are appended with
//! [`endpoint`], one percent-encoded path segment each. A `/` or `?` in an ID
//! never changes the endpoint being called.

pub mod oauth;
pub mod things;
pub mod tv;

pub use oauth::OAuthApi;
pub use things::ThingsApi;
pub use tv::TvApi;

use std::{fmt, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{config::Config, types::Received};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_DELAY: Duration = Duration::from_secs(3);
const MAX_ATTEMPTS: u32 = 3;

/// Failure of a single request.
#[derive(Debug)]
pub enum ApiError {
    Transport(reqwest::Error),
    Status { status: StatusCode, body: String },
    Decode(serde_json::Error),
    Url(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "Request failed: {}", e),
            ApiError::Status { status, body } if body.is_empty() => {
                write!(f, "Request failed with status {}", status)
            }
            ApiError::Status { status, body } => {
                write!(f, "Request failed with status {}: {}", status, body)
            }
            ApiError::Decode(e) => write!(f, "Unexpected response body: {}", e),
            ApiError::Url(message) => write!(f, "Invalid request URL: {}", message),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            ApiError::Status { .. } | ApiError::Url(_) => None,
        }
    }
}

/// HTTP client for every LINE API this tool talks to.
///
/// Holds the credentials resolved at startup. Construct it once in `main` and
/// pass it down to the operations as `&dyn OAuthApi`, `&dyn ThingsApi` or
/// `&dyn TvApi`.
pub struct LineClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl LineClient {
    /// Creates a client for the configured API host.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying TLS backend cannot be initialised.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            access_token: config.access_token().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// URL of `base` on the configured host with `segments` appended.
    fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url, ApiError> {
        endpoint(&self.url(base), segments)
    }

    /// Sends a request, retrying `502 Bad Gateway`, and turns any other
    /// non-success status into [`ApiError::Status`].
    ///
    /// A spinner with `message` is shown on the terminal while waiting.
    async fn execute(&self, request: RequestBuilder, message: &str) -> Result<Response, ApiError> {
        let pb = spinner(message);

        let mut attempt = 1;
        let result = loop {
            let Some(current) = request.try_clone() else {
                // streaming bodies can't be replayed, send once
                break request.send().await.map_err(ApiError::from);
            };

            match current.send().await {
                Ok(response)
                    if response.status() == StatusCode::BAD_GATEWAY && attempt < MAX_ATTEMPTS =>
                {
                    attempt += 1;
                    pb.set_message(format!("{} (retry {}/{})", message, attempt, MAX_ATTEMPTS));
                    sleep(RETRY_DELAY).await;
                }
                Ok(response) => break Ok(response),
                Err(err) => break Err(ApiError::Transport(err)),
            }
        };

        pb.finish_and_clear();
        check_status(result?).await
    }

    /// Sends a request whose response must carry a JSON body.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        message: &str,
    ) -> Result<Received<T>, ApiError> {
        let response = self.execute(request, message).await?;
        let text = response.text().await?;
        let raw: Value = serde_json::from_str(&text)?;
        Ok(Received::from_value(raw)?)
    }

    /// Sends a request whose response body may be empty or `null`.
    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        message: &str,
    ) -> Result<Option<Received<T>>, ApiError> {
        let response = self.execute(request, message).await?;
        let text = response.text().await?;
        parse_optional(&text)
    }

    async fn fetch_empty(&self, request: RequestBuilder, message: &str) -> Result<(), ApiError> {
        self.execute(request, message).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

/// Parses a body that may legitimately be empty or `null`.
///
/// The parsed document is kept next to the decoded value, unknown fields
/// included.
pub fn parse_optional<T: DeserializeOwned>(text: &str) -> Result<Option<Received<T>>, ApiError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let raw: Value = serde_json::from_str(text)?;
    if raw.is_null() {
        return Ok(None);
    }
    Ok(Some(Received::from_value(raw)?))
}

/// Appends `segments` to `base`, percent-encoding each one.
///
/// # Example
///
/// ```
/// let url = endpoint("https://api.line.me/things/v1", &["devices", "a/b"])?;
/// assert_eq!(url.as_str(), "https://api.line.me/things/v1/devices/a%2Fb");
/// ```
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = Url::parse(base).map_err(|e| ApiError::Url(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Url(format!("{} cannot take path segments", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
