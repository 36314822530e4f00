use async_trait::async_trait;
use chrono::NaiveDate;
use irkun_core::{DataError, FilingDocument, FilingSource, Result};
use reqwest::{RequestBuilder, Response, StatusCode, header};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::api::{DocumentListResponse, ErrorResponse, STATUS_OK};
use crate::archive::extract_xbrl;
use crate::rate_limit::RateLimiter;
use crate::retry::RetryPolicy;

/// EDINET API v2 base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.edinet-fsa.go.jp/api/v2";

/// Pause after each response before the next request may start.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Timeout of a document list request.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout of an archive download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER_NAME: &str = "EDINET";
const SUBSCRIPTION_KEY_HEADER: &str = "Subscription-Key";
const USER_AGENT: &str = concat!("irkun/", env!("CARGO_PKG_VERSION"));

/// Document list with filing metadata (`type=2`).
const LIST_TYPE_WITH_RESULTS: &str = "2";
/// Archive of the submitted XBRL files (`type=1`).
const DOWNLOAD_TYPE_XBRL: &str = "1";

/// Client for the EDINET API v2.
///
/// Construct one per run and share it: clones share the throttle, so every
/// request made through any clone is spaced by the request delay.
#[derive(Clone)]
pub struct EdinetClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    retry: RetryPolicy,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for EdinetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdinetClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl EdinetClient {
    /// Creates a client with the given subscription key.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if the key is empty or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DataError::Config("EDINET API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_REQUEST_DELAY))),
            retry: RetryPolicy::default(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Uses another API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Uses another pause between requests.
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.rate_limiter = Arc::new(Mutex::new(RateLimiter::new(delay)));
        self
    }

    /// Uses another retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Downloads a document archive and extracts its primary XBRL instance.
    ///
    /// `Ok(None)` means the archive held no usable instance.
    pub async fn fetch_xbrl(&self, doc_id: &str) -> Result<Option<String>> {
        let bytes = self.download_archive(doc_id).await?;
        Ok(extract_xbrl(&bytes))
    }

    /// Sends a request through the throttle and the retry policy and reads
    /// the whole body.
    ///
    /// The throttle lock is held until the body is complete, and the pause
    /// before the next request starts only then, whatever the outcome.
    async fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Fetched> {
        let mut limiter = self.rate_limiter.lock().await;
        limiter.wait().await;
        let fetched = self.exchange(build).await;
        limiter.mark();
        fetched
    }

    async fn exchange(&self, build: impl Fn() -> RequestBuilder) -> Result<Fetched> {
        let response = self
            .retry
            .run(|| async {
                build()
                    .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
                    .send()
                    .await
                    .map_err(map_send_error)
            })
            .await?;
        let response = check_status(response)?;

        let is_json = is_json(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))?;
        Ok(Fetched {
            body: body.to_vec(),
            is_json,
        })
    }
}

/// A successful response, fully read.
struct Fetched {
    body: Vec<u8>,
    is_json: bool,
}

/// Classifies a failure to get a response.
///
/// Refused connections and connections dropped before a response arrived
/// are `Connection`; timeouts and everything else are `Network`.
fn map_send_error(e: reqwest::Error) -> DataError {
    if e.is_connect() || (!e.is_timeout() && is_dropped_connection(&e)) {
        DataError::Connection(e.without_url().to_string())
    } else {
        DataError::Network(e.without_url().to_string())
    }
}

fn is_dropped_connection(e: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(e);
    while let Some(err) = source {
        if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() || hyper_err.is_canceled() {
                return true;
            }
        }
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        source = err.source();
    }
    false
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(DataError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            retry_after,
        });
    }
    if !status.is_success() {
        return Err(DataError::Http {
            status: status.as_u16(),
            url: response.url().path().to_string(),
        });
    }
    Ok(response)
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[async_trait]
impl FilingSource for EdinetClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(skip(self), fields(source = PROVIDER_NAME))]
    async fn get_documents(&self, date: NaiveDate) -> Result<Vec<FilingDocument>> {
        let url = format!("{}/documents.json", self.base_url);
        let date_param = date.format("%Y-%m-%d").to_string();

        debug!(%url, date = %date_param, "Fetching document list");
        let fetched = self
            .send(|| {
                self.client
                    .get(&url)
                    .query(&[("date", date_param.as_str()), ("type", LIST_TYPE_WITH_RESULTS)])
                    .timeout(LIST_TIMEOUT)
            })
            .await?;

        let list: DocumentListResponse = serde_json::from_slice(&fetched.body)
            .map_err(|e| DataError::Parse(format!("Failed to parse document list: {e}")))?;

        if let Some(metadata) = &list.metadata {
            if metadata.status != STATUS_OK {
                return Err(DataError::Api(format!(
                    "status {}: {}",
                    metadata.status, metadata.message
                )));
            }
        }

        debug!(count = list.results.len(), "Fetched document list");
        Ok(list.results)
    }

    #[instrument(skip(self), fields(source = PROVIDER_NAME))]
    async fn download_archive(&self, doc_id: &str) -> Result<Vec<u8>> {
        if doc_id.is_empty() || !doc_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DataError::InvalidParameter(format!("invalid docID {doc_id:?}")));
        }
        let url = format!("{}/documents/{doc_id}", self.base_url);

        debug!(%url, "Downloading archive");
        let fetched = self
            .send(|| {
                self.client
                    .get(&url)
                    .query(&[("type", DOWNLOAD_TYPE_XBRL)])
                    .timeout(DOWNLOAD_TIMEOUT)
            })
            .await?;

        // EDINET reports unknown or withdrawn documents as a JSON body with 200.
        if fetched.is_json {
            let message = serde_json::from_slice::<ErrorResponse>(&fetched.body)
                .map(|e| format!("status {}: {}", e.metadata.status, e.metadata.message))
                .unwrap_or_else(|_| String::from_utf8_lossy(&fetched.body).into_owned());
            warn!(%doc_id, %message, "No archive for document");
            return Err(DataError::Api(message));
        }

        debug!(%doc_id, size = fetched.body.len(), "Downloaded archive");
        Ok(fetched.body)
    }
}
