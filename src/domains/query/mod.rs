//! Query parameter domain.
//!
//! Carries a request's raw query parameters and extracts the structured
//! sort and include directives the materialization pipeline consumes.

pub mod extractors;
pub mod params;

pub use extractors::{extract_include_directives, extract_sort_directives};
pub use params::{
    INCLUDE_PARAM_KEY, PAGE_NUMBER_PARAM_KEY, PAGE_SIZE_PARAM_KEY, PageRequest, QueryParams,
    SORT_PARAM_KEY, is_reserved_key,
};
