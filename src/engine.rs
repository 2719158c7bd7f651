use crate::providers::{fetch_page, Provider, ProviderRegistry};
use crate::{error::*, types::*};

/// HTTP collaborator. Returns whatever status the server answered with;
/// only network-level problems are errors here.
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Where credentials come from on each fetch.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the environment at fetch time.
    Env,
    Fixed(Credentials),
}

impl CredentialLookup for CredentialSource {
    fn resolve(&self) -> Credentials {
        match self {
            CredentialSource::Env => Credentials::from_env(),
            CredentialSource::Fixed(c) => c.clone(),
        }
    }
}

pub struct Engine<'a> {
    pub registry: ProviderRegistry,
    pub transport: &'a dyn Transport,
    pub credentials: CredentialSource,
}

impl<'a> Engine<'a> {
    pub fn new(transport: &'a dyn Transport, credentials: Credentials) -> Self {
        Self {
            registry: ProviderRegistry::builtin(),
            transport,
            credentials: CredentialSource::Fixed(credentials),
        }
    }

    pub fn from_env(transport: &'a dyn Transport) -> Self {
        Self {
            registry: ProviderRegistry::builtin(),
            transport,
            credentials: CredentialSource::Env,
        }
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Pick the provider for `url` without touching the network.
    pub fn provider_for(&self, url: &str) -> Result<&'static dyn Provider> {
        self.registry.select(url)
    }

    /// Resolve the provider and run the two-phase fetch.
    pub fn fetch(&self, url: &str) -> Result<FetchResult> {
        let provider = self.registry.select(url)?;
        tracing::info!(
            provider = provider.kind().name(),
            transport = self.transport.name(),
            "fetching {}",
            url
        );
        fetch_page(provider, self.transport, &self.credentials, url)
    }

    /// Convenience wrapper that returns only the page text.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        self.fetch(url).map(FetchResult::into_text)
    }
}
