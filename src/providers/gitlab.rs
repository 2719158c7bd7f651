use super::{Provider, ProviderKind};
use crate::engine::Transport;
use crate::{error::*, types::*};

/// Only the public raw route is handled. Private projects go through the
/// same `/-/raw/` url with a `PRIVATE-TOKEN` header; the repository files API
/// (`/api/v4/projects/:id/repository/files/:path/raw`) is not constructed.
pub struct GitLabProvider;

impl Provider for GitLabProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitLab
    }

    fn identifier(&self) -> Option<&'static str> {
        Some("gitlab.com")
    }

    fn rewrite(&self, url: &str) -> String {
        url.replace("/blob/", "/raw/")
    }

    fn fetch_authenticated(
        &self,
        transport: &dyn Transport,
        url: &str,
        credentials: &Credentials,
    ) -> Result<HttpResponse> {
        let request =
            HttpRequest::get(url).with_header("PRIVATE-TOKEN", credentials.gitlab_token());
        transport.get(&request)
    }
}
