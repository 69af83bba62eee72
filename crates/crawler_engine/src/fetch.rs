use std::time::Duration;

use futures_util::StreamExt;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("failed to fetch URL: HTTP {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("redirect limit exceeded")]
    RedirectLimit,
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Network access behind a trait so the driver can be exercised without
/// touching the wire.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch an HTML page, following redirects, as UTF-8 text.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a raw resource (an image) without content-type restrictions.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn fetch_raw(&self, url: &str, check_content_type: bool) -> Result<Vec<u8>, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                });
            }
        }

        if check_content_type {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());
            if let Some(ct) = content_type {
                if !self.is_content_type_allowed(ct) {
                    return Err(FetchError::UnsupportedContentType(ct.to_string()));
                }
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!("fetched {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Fetch for ReqwestFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let bytes = self.fetch_raw(url, true).await?;
        // Legacy pages are served as UTF-8; anything malformed is replaced
        // rather than failing the whole document.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch_raw(url, false).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    if err.is_redirect() {
        return FetchError::RedirectLimit;
    }
    FetchError::Network(err.to_string())
}
