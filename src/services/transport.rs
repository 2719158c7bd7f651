use crate::{engine::Transport, error::*, types::*};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const REDIRECT_LIMIT: usize = 10;

/// Blocking HTTP transport. Each call blocks until the response body is read
/// or the client timeout fires.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .timeout(timeout)
            .user_agent(format!("rawfetch/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn name(&self) -> &'static str {
        "reqwest-blocking"
    }

    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let parsed =
            Url::parse(&request.url).map_err(|_| RawfetchError::InvalidUrl(request.url.clone()))?;

        let mut builder = self
            .client
            .get(parsed)
            .headers(to_headermap(&request.headers)?);
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let resp = builder.send()?;
        let status = resp.status();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }
}

fn to_headermap(hs: &HeaderSet) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (k, v) in &hs.0 {
        let kn = HeaderName::from_bytes(k.as_bytes())
            .map_err(|e| RawfetchError::InvalidRequest(format!("invalid header name {k}: {e}")))?;
        let vv = HeaderValue::from_str(v).map_err(|e| {
            RawfetchError::InvalidRequest(format!("invalid header value for {k}: {e}"))
        })?;
        headers.insert(kn, vv);
    }
    Ok(headers)
}
