//! Raw query-string input.

use std::str::FromStr;

/// An ordered multimap of query-string keys to values.
///
/// Repeated keys are kept in arrival order, so `?category=a&category=b`
/// and `?category=a,b` can both be read as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

/// Classification of a numeric parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue<T> {
    /// Key not present.
    Missing,
    /// Present but not parseable as `T`. Holds the raw text.
    Malformed(String),
    Number(T),
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds params from key/value pairs.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::query::QueryParams;
    ///
    /// let raw = QueryParams::from_pairs([("category", "books,toys"), ("category", "other")]);
    /// assert_eq!(raw.get("category"), Some("books,toys"));
    /// assert_eq!(raw.list("category"), vec!["books", "toys", "other"]);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryParams {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in arrival order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Every value for `key`, with comma-separated values split out.
    /// Items are trimmed and empty items dropped.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get_all(key)
            .into_iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parses the first value for `key` as a number.
    pub fn number<T: FromStr>(&self, key: &str) -> ParamValue<T> {
        match self.get(key) {
            None => ParamValue::Missing,
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(n) => ParamValue::Number(n),
                Err(_) => ParamValue::Malformed(raw.to_string()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        QueryParams::from_pairs(iter)
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        QueryParams { pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_value() {
        let raw = QueryParams::from_pairs([("page", "2"), ("page", "5")]);
        assert_eq!(raw.get("page"), Some("2"));
        assert_eq!(raw.get_all("page"), vec!["2", "5"]);
        assert_eq!(raw.get("limit"), None);
    }

    #[test]
    fn test_list_splits_and_trims() {
        let raw = QueryParams::from_pairs([("fields", " name , ,price"), ("fields", "id")]);
        assert_eq!(raw.list("fields"), vec!["name", "price", "id"]);
        assert!(raw.list("category").is_empty());
    }

    #[test]
    fn test_number_classification() {
        let raw = QueryParams::from_pairs([("page", "3"), ("limit", "ten"), ("minPrice", " 4.5 ")]);
        assert_eq!(raw.number::<i64>("page"), ParamValue::Number(3));
        assert_eq!(
            raw.number::<i64>("limit"),
            ParamValue::Malformed("ten".to_string())
        );
        assert_eq!(raw.number::<f64>("minPrice"), ParamValue::Number(4.5));
        assert_eq!(raw.number::<i64>("sortBy"), ParamValue::Missing);
    }
}
