use super::{Provider, ProviderKind};

/// Catch-all for any http(s) url no specific provider claimed.
/// No rewrite and no credential strategy.
pub struct GenericProvider;

impl Provider for GenericProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Generic
    }

    fn identifier(&self) -> Option<&'static str> {
        None
    }

    fn can_open(&self, url: &str) -> bool {
        url.starts_with(self.protocol())
    }
}
