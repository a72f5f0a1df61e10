//! Per-call materialization request.

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::domains::query::QueryParams;

/// Everything one materialization call needs from the inbound request.
///
/// One instance per call; directives derived from it are never shared
/// across requests. Identifier parsing from the request path is the
/// transport's responsibility and arrives separately.
#[derive(Debug, Clone)]
pub struct MaterializationRequest {
    /// Ordered query parameters of the request.
    pub params: QueryParams,

    /// Full request URI, used to derive the base URL.
    pub uri: Url,

    /// Cancellation signal observed at the start of the pipeline and
    /// before each suspend point.
    pub cancel: CancellationToken,
}

impl MaterializationRequest {
    /// Build a request from a URI, taking the query parameters from it.
    pub fn new(uri: Url) -> Self {
        Self {
            params: QueryParams::from_url(&uri),
            uri,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the query parameters.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Attach an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
