use super::{Provider, ProviderKind};
use crate::engine::Transport;
use crate::{error::*, types::*};

pub struct BitBucketProvider;

impl Provider for BitBucketProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::BitBucket
    }

    fn identifier(&self) -> Option<&'static str> {
        Some("bitbucket.org")
    }

    // The 2.0 API serves `src/<ref>/<path>` as raw content.
    fn rewrite(&self, url: &str) -> String {
        url.replace("bitbucket.org/", "api.bitbucket.org/2.0/repositories/")
    }

    fn fetch_authenticated(
        &self,
        transport: &dyn Transport,
        url: &str,
        credentials: &Credentials,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::get(url).with_basic_auth(
            credentials.bitbucket_username(),
            credentials.bitbucket_app_password(),
        );
        transport.get(&request)
    }
}
