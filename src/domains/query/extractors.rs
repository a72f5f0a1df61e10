//! Sort and include expression extractors.
//!
//! Both extractors are total functions over the request parameters: an
//! absent key yields an empty sequence, and a present key is split on
//! commas with order and empty tokens preserved. Nothing is validated
//! here; field paths are checked later, when a directive is applied
//! against a concrete type's field map.

use super::params::{INCLUDE_PARAM_KEY, QueryParams, SORT_PARAM_KEY};

/// Extract the ordered sort directives of a request.
///
/// Only the first occurrence of the `sort` key is honored. A leading `-`
/// on a token denotes descending order; the sign is left on the token for
/// the consumer to interpret.
pub fn extract_sort_directives(params: &QueryParams) -> Vec<String> {
    extract(params, SORT_PARAM_KEY)
}

/// Extract the ordered include directives of a request.
///
/// Only the first occurrence of the `include` key is honored. Each token
/// is a relationship path.
pub fn extract_include_directives(params: &QueryParams) -> Vec<String> {
    extract(params, INCLUDE_PARAM_KEY)
}

fn extract(params: &QueryParams, key: &str) -> Vec<String> {
    match params.first_value(key) {
        None => Vec::new(),
        Some(value) => value.split(',').map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_yields_empty_sequence() {
        let params = QueryParams::from_pairs([("filter", "x")]);
        assert!(extract_sort_directives(&params).is_empty());
        assert!(extract_include_directives(&params).is_empty());
    }

    #[test]
    fn test_sort_tokens_preserve_order_and_sign() {
        let params = QueryParams::from_pairs([("sort", "name,-age")]);
        assert_eq!(extract_sort_directives(&params), vec!["name", "-age"]);
    }

    #[test]
    fn test_empty_tokens_pass_through() {
        let params = QueryParams::from_pairs([("include", "a,,b")]);
        assert_eq!(extract_include_directives(&params), vec!["a", "", "b"]);
    }

    #[test]
    fn test_only_first_occurrence_is_honored() {
        let params = QueryParams::from_pairs([("sort", "name"), ("sort", "age")]);
        assert_eq!(extract_sort_directives(&params), vec!["name"]);
    }

    #[test]
    fn test_tokens_are_not_trimmed() {
        let params = QueryParams::from_pairs([("sort", " name , age")]);
        assert_eq!(extract_sort_directives(&params), vec![" name ", " age"]);
    }
}
