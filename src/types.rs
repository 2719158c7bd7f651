use crate::providers::ProviderKind;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value sent in place of a credential that is not configured.
pub const CREDENTIAL_PLACEHOLDER: &str = "...";

pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const BITBUCKET_USERNAME: &str = "BITBUCKET_USERNAME";
pub const BITBUCKET_APP_PASSWORD: &str = "BITBUCKET_APP_PASSWORD";
pub const GITLAB_TOKEN: &str = "GITLAB_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSet(pub BTreeMap<String, String>);
impl HeaderSet {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }
    pub fn with(mut self, k: &str, v: &str) -> Self {
        self.0.insert(k.to_string(), v.to_string());
        self
    }
    pub fn get(&self, k: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(k))
            .map(|(_, v)| v.as_str())
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// One outbound GET, as handed to a [`crate::engine::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HeaderSet,
    pub basic_auth: Option<BasicAuth>,
}

impl HttpRequest {
    /// Anonymous GET: no headers, no credentials.
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: HeaderSet::empty(),
            basic_auth: None,
        }
    }

    pub fn with_header(mut self, k: &str, v: &str) -> Self {
        self.headers = self.headers.with(k, v);
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.basic_auth.is_some() || !self.headers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Per-service credentials used on the authenticated retry.
///
/// Missing values are not an error: the placeholder is sent instead and the
/// remote service rejects the request on its own.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub bitbucket_username: Option<String>,
    pub bitbucket_app_password: Option<String>,
    pub gitlab_token: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            github_token: get(GITHUB_TOKEN),
            bitbucket_username: get(BITBUCKET_USERNAME),
            bitbucket_app_password: get(BITBUCKET_APP_PASSWORD),
            gitlab_token: get(GITLAB_TOKEN),
        }
    }

    pub fn github_token(&self) -> &str {
        or_placeholder(self.github_token.as_deref(), GITHUB_TOKEN)
    }

    pub fn bitbucket_username(&self) -> &str {
        or_placeholder(self.bitbucket_username.as_deref(), BITBUCKET_USERNAME)
    }

    pub fn bitbucket_app_password(&self) -> &str {
        or_placeholder(self.bitbucket_app_password.as_deref(), BITBUCKET_APP_PASSWORD)
    }

    pub fn gitlab_token(&self) -> &str {
        or_placeholder(self.gitlab_token.as_deref(), GITLAB_TOKEN)
    }
}

/// Produces a credential bundle when the authenticated retry needs one.
/// Nothing is looked up for fetches that succeed anonymously.
pub trait CredentialLookup {
    fn resolve(&self) -> Credentials;
}

impl CredentialLookup for Credentials {
    fn resolve(&self) -> Credentials {
        self.clone()
    }
}

fn or_placeholder<'a>(value: Option<&'a str>, var: &str) -> &'a str {
    match value {
        Some(v) => v,
        None => {
            tracing::warn!(
                credential = var,
                "{} is not set, sending placeholder credential",
                var
            );
            CREDENTIAL_PLACEHOLDER
        }
    }
}

// Secrets stay out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("github_token", &mask(&self.github_token))
            .field("bitbucket_username", &self.bitbucket_username)
            .field("bitbucket_app_password", &mask(&self.bitbucket_app_password))
            .field("gitlab_token", &mask(&self.gitlab_token))
            .finish()
    }
}

/// Result of a fetch operation including which provider served it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// The page text
    pub text: String,
    /// The provider variant that handled the url
    pub provider: ProviderKind,
    /// The rewritten url that was actually requested
    pub url: String,
    /// 1 for an anonymous hit, 2 when the authenticated retry was needed
    pub attempts: usize,
    pub authenticated: bool,
}

impl FetchResult {
    /// Consume the result and return just the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
