//! Request query parameters.
//!
//! A request's query string is carried as an ordered sequence of key/value
//! pairs; duplicate keys are preserved. The engine reserves the `sort`,
//! `include`, and pagination keys, and treats every other key as a filter
//! on the wire field it spells.

use url::Url;

use crate::core::config::PaginationConfig;
use crate::domains::registry::ConfigurationError;

/// Query parameter key holding the sort expression.
pub const SORT_PARAM_KEY: &str = "sort";

/// Query parameter key holding the include expression.
pub const INCLUDE_PARAM_KEY: &str = "include";

/// Query parameter key holding the 1-based page number.
pub const PAGE_NUMBER_PARAM_KEY: &str = "page[number]";

/// Query parameter key holding the page size.
pub const PAGE_SIZE_PARAM_KEY: &str = "page[size]";

/// Whether a query parameter key is consumed by the engine itself.
pub fn is_reserved_key(key: &str) -> bool {
    matches!(
        key,
        SORT_PARAM_KEY | INCLUDE_PARAM_KEY | PAGE_NUMBER_PARAM_KEY | PAGE_SIZE_PARAM_KEY
    )
}

/// A page of records to request, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub number: u64,

    /// Records per page.
    pub size: u64,
}

impl PageRequest {
    /// Number of records before this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Ordered request query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// An empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered sequence of pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a raw, url-encoded query string.
    pub fn from_query_str(raw: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;
        Ok(Self { pairs })
    }

    /// Extract the query parameters of a request URL.
    pub fn from_url(url: &Url) -> Self {
        Self {
            pairs: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// The value of the first occurrence of `key`, if any.
    pub fn first_value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate all pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate the pairs not consumed by sort, include, or pagination.
    pub fn filter_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| !is_reserved_key(k))
    }

    /// Resolve the requested page, honoring configured defaults and limits.
    ///
    /// With no page parameters and no configured default page size, the
    /// result is `None` and the record set is left unpaginated.
    pub fn page_request(
        &self,
        config: &PaginationConfig,
    ) -> Result<Option<PageRequest>, ConfigurationError> {
        let number = self.positive_number(PAGE_NUMBER_PARAM_KEY)?;
        let size = self.positive_number(PAGE_SIZE_PARAM_KEY)?;

        let size = match (size, config.default_page_size) {
            (Some(requested), _) => requested.min(config.max_page_size),
            (None, Some(default)) => default.min(config.max_page_size),
            (None, None) if number.is_some() => config.max_page_size,
            (None, None) => return Ok(None),
        };

        Ok(Some(PageRequest {
            number: number.unwrap_or(1),
            size,
        }))
    }

    fn positive_number(&self, key: &str) -> Result<Option<u64>, ConfigurationError> {
        match self.first_value(key) {
            None => Ok(None),
            Some(raw) => match raw.parse::<u64>() {
                Ok(value) if value > 0 => Ok(Some(value)),
                _ => Err(ConfigurationError::InvalidPageParameter {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
            },
        }
    }
}
