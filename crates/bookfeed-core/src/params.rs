//! Request parameter map.
//!
//! Provides [`RequestParams`], the mutable name/value map a request is built
//! from. Parameters are kept in a `BTreeMap`, so iteration is always in
//! lexicographic key order regardless of the order they were inserted in.

use std::collections::BTreeMap;
use std::fmt;

/// Ordered map of request parameter names to string values.
///
/// # Examples
///
/// ```
/// use bookfeed_core::RequestParams;
///
/// let mut params = RequestParams::new();
/// params.insert("Operation", "ItemSearch");
/// params.insert("ItemPage", 1);
///
/// let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, ["ItemPage", "Operation"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RequestParams {
    inner: BTreeMap<String, String>,
}

impl RequestParams {
    /// Create an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) -> Option<String> {
        self.inner.insert(name.into(), value.to_string())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(name)
    }

    /// Whether a parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Renders `k=v` pairs joined by `&`, unencoded. For log output only; the
/// wire form is the canonical query string.
impl fmt::Display for RequestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}
