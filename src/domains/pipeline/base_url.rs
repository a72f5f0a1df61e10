//! Base URL derivation.

use url::Url;

use crate::core::config::EngineConfig;

/// Derives the base URL resource links are built against.
pub trait BaseUrlService: Send + Sync {
    /// The base URL for a request.
    fn base_url(&self, request_uri: &Url) -> String;

    /// The context path the engine is served under, without surrounding
    /// slashes. Empty when serving from the root.
    fn context_path(&self) -> String;
}

/// Default implementation: scheme, host, explicit port, context path.
#[derive(Debug, Clone, Default)]
pub struct DefaultBaseUrlService {
    context_path: String,
}

impl DefaultBaseUrlService {
    /// Create a service with the given context path; surrounding slashes
    /// are stripped.
    pub fn new(context_path: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into().trim_matches('/').to_string(),
        }
    }

    /// Create a service from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.base_url.context_path.clone())
    }
}

impl BaseUrlService for DefaultBaseUrlService {
    fn base_url(&self, request_uri: &Url) -> String {
        let mut base = format!(
            "{}://{}",
            request_uri.scheme(),
            request_uri.host_str().unwrap_or_default()
        );
        if let Some(port) = request_uri.port() {
            base.push_str(&format!(":{port}"));
        }
        if !self.context_path.is_empty() {
            base.push('/');
            base.push_str(&self.context_path);
        }
        base
    }

    fn context_path(&self) -> String {
        self.context_path.clone()
    }
}
