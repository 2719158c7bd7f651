use super::{Provider, ProviderKind};
use crate::engine::Transport;
use crate::{error::*, types::*};

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

pub struct GitHubProvider;

impl Provider for GitHubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn identifier(&self) -> Option<&'static str> {
        Some("github.com")
    }

    /// `github.com/o/r/blob/main/f` -> `raw.githubusercontent.com/o/r/main/f`
    fn rewrite(&self, url: &str) -> String {
        url.replace("/blob/", "/")
            .replace("/raw/", "/")
            .replace("github.com/", "raw.githubusercontent.com/")
    }

    fn fetch_authenticated(
        &self,
        transport: &dyn Transport,
        url: &str,
        credentials: &Credentials,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::get(url)
            .with_header("Authorization", &format!("token {}", credentials.github_token()))
            .with_header("Accept", RAW_MEDIA_TYPE);
        transport.get(&request)
    }
}
