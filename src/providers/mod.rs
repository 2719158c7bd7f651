//! Provider variants and the two-phase fetch.
//!
//! A provider recognises urls of one hosting service, rewrites the
//! human-facing "view" url into a raw-content url, and knows how to retry
//! with that service's credentials when the anonymous request is rejected.

mod bitbucket;
mod generic;
mod github;
mod gitlab;
mod registry;

pub use bitbucket::BitBucketProvider;
pub use generic::GenericProvider;
pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;
pub use registry::ProviderRegistry;

use crate::engine::Transport;
use crate::{error::*, types::*};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    GitHub,
    BitBucket,
    GitLab,
    Generic,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::BitBucket => "bitbucket",
            Self::GitLab => "gitlab",
            Self::Generic => "generic-http",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability interface shared by every variant. Implementations are
/// stateless unit structs, so one `'static` instance per variant is enough.
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Scheme prefix the url must start with.
    fn protocol(&self) -> &'static str {
        "http"
    }

    /// Host substring that marks a url as belonging to this provider.
    fn identifier(&self) -> Option<&'static str>;

    fn can_open(&self, url: &str) -> bool {
        match self.identifier() {
            Some(id) => url.contains(id) && url.starts_with(self.protocol()),
            None => false,
        }
    }

    /// Turn a "view" url into a raw-content url. Applied exactly once per fetch.
    fn rewrite(&self, url: &str) -> String {
        url.to_string()
    }

    fn fetch_unauthenticated(&self, transport: &dyn Transport, url: &str) -> Result<HttpResponse> {
        transport.get(&HttpRequest::get(url))
    }

    /// Retry carrying service credentials. Variants without a credential
    /// strategy fail here.
    fn fetch_authenticated(
        &self,
        _transport: &dyn Transport,
        url: &str,
        _credentials: &Credentials,
    ) -> Result<HttpResponse> {
        Err(RawfetchError::fetch_failed(url, StatusCode::UNAUTHORIZED))
    }
}

/// Rewrite, try anonymously, retry with credentials only on 401.
///
/// `credentials` is resolved only when the retry happens. Any status other
/// than 200 after that is a terminal failure; there is no further retry.
pub fn fetch_page(
    provider: &dyn Provider,
    transport: &dyn Transport,
    credentials: &dyn CredentialLookup,
    url: &str,
) -> Result<FetchResult> {
    let url = provider.rewrite(url);
    tracing::debug!(provider = provider.kind().name(), "rewritten url {}", url);

    let mut attempts = 1;
    let mut authenticated = false;
    let mut response = provider
        .fetch_unauthenticated(transport, &url)
        .map_err(|e| log_failure(&url, e))?;
    tracing::debug!(status = response.status.as_u16(), "anonymous GET {}", url);

    if response.status == StatusCode::UNAUTHORIZED {
        attempts += 1;
        authenticated = true;
        let credentials = credentials.resolve();
        response = provider
            .fetch_authenticated(transport, &url, &credentials)
            .map_err(|e| log_failure(&url, e))?;
        tracing::debug!(status = response.status.as_u16(), "authenticated GET {}", url);
    }

    if response.status != StatusCode::OK {
        return Err(log_failure(
            &url,
            RawfetchError::fetch_failed(&url, response.status),
        ));
    }

    Ok(FetchResult {
        text: response.body,
        provider: provider.kind(),
        url,
        attempts,
        authenticated,
    })
}

fn log_failure(url: &str, e: RawfetchError) -> RawfetchError {
    tracing::error!(error = %e, "could not download {}", url);
    e
}
