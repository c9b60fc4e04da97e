//! Query string encoding
//!
//! One rule covers every parameter the client sends: a name maps to zero or
//! more values, no values means the parameter is left out, and several values
//! become repeated `name=value` pairs in insertion order.

use std::fmt::Display;

/// Encode one parameter. Returns an empty string when `values` is empty.
pub fn encode_param<S: AsRef<str>>(name: &str, values: &[S]) -> String {
    values
        .iter()
        .map(|v| format!("{}={}", name, urlencoding::encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

/// Ordered multimap of query parameters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    fn values_mut(&mut self, name: &str) -> &mut Vec<String> {
        let idx = match self.entries.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.entries.push((name.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Append a single value under `name`.
    pub fn push<T: Display>(&mut self, name: &str, value: T) -> &mut Self {
        self.values_mut(name).push(value.to_string());
        self
    }

    /// Append a value only when present.
    pub fn push_opt<T: Display>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Append every value under `name`. An empty iterator adds nothing.
    pub fn extend<I>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_some() {
            self.values_mut(name).extend(values.map(|v| v.to_string()));
        }
        self
    }

    /// Values recorded under `name`, empty if absent
    pub fn get(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of `name=value` pairs that will be emitted
    pub fn pair_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pair_count() == 0
    }

    /// Render as a query string without the leading `?`.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(name, values)| encode_param(name, values))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_repeated_values_in_order() {
        assert_eq!(encode_param("key", &["4567", "ABCD"]), "key=4567&key=ABCD");
    }

    #[test]
    fn test_encode_empty_values_emits_nothing() {
        let empty: [&str; 0] = [];
        assert_eq!(encode_param("key", &empty), "");
    }

    #[test]
    fn test_encode_present_but_empty_value() {
        assert_eq!(encode_param("key", &[""]), "key=");
    }

    #[test]
    fn test_encode_percent_encodes_values() {
        assert_eq!(
            encode_param("name", &["Puma concolor", "a&b=c"]),
            "name=Puma%20concolor&name=a%26b%3Dc"
        );
    }

    #[test]
    fn test_pair_count_matches_value_count() {
        for n in 0..6 {
            let values: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();
            let encoded = encode_param("rank", &values);
            assert_eq!(encoded.matches("rank=").count(), n);
            let expected: Vec<String> = values.iter().map(|v| format!("rank={}", v)).collect();
            assert_eq!(encoded, expected.join("&"));
        }
    }

    #[test]
    fn test_query_params_first_insertion_order() {
        let mut params = QueryParams::new();
        params
            .push("q", "Puma")
            .push("rank", "SPECIES")
            .push("limit", 20)
            .push("rank", "GENUS");
        assert_eq!(params.encode(), "q=Puma&rank=SPECIES&rank=GENUS&limit=20");
        assert_eq!(params.get("rank"), ["SPECIES", "GENUS"]);
        assert_eq!(params.pair_count(), 4);
    }

    #[test]
    fn test_query_params_absent_and_empty_are_equivalent() {
        let mut params = QueryParams::new();
        params
            .push_opt("language", Option::<&str>::None)
            .extend("datasetKey", Vec::<String>::new());
        assert!(params.is_empty());
        assert_eq!(params.encode(), "");
        assert_eq!(params, QueryParams::new());
    }

    #[test]
    fn test_query_params_extend() {
        let mut params = QueryParams::new();
        params.extend("datasetKey", ["d7dddbf4", "7ddf754f"]);
        assert_eq!(params.encode(), "datasetKey=d7dddbf4&datasetKey=7ddf754f");
    }
}
