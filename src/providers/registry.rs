use super::{BitBucketProvider, GenericProvider, GitHubProvider, GitLabProvider, Provider};
use crate::error::*;

static GITHUB: GitHubProvider = GitHubProvider;
static BITBUCKET: BitBucketProvider = BitBucketProvider;
static GITLAB: GitLabProvider = GitLabProvider;
static GENERIC: GenericProvider = GenericProvider;

/// Ordered provider table. The first provider whose `can_open` accepts the
/// url wins, so specific providers must come before the generic catch-all.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<&'static dyn Provider>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<&'static dyn Provider>) -> Self {
        Self { providers }
    }

    /// GitHub, BitBucket, GitLab, then generic HTTP.
    pub fn builtin() -> Self {
        let providers: [&'static dyn Provider; 4] = [&GITHUB, &BITBUCKET, &GITLAB, &GENERIC];
        Self::new(providers.to_vec())
    }

    pub fn providers(&self) -> &[&'static dyn Provider] {
        &self.providers
    }

    pub fn select(&self, url: &str) -> Result<&'static dyn Provider> {
        self.providers
            .iter()
            .copied()
            .find(|p| p.can_open(url))
            .ok_or_else(|| RawfetchError::NoProvider(url.to_string()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.kind()))
            .finish()
    }
}
