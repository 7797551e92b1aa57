//! Request encoding
//!
//! List filters become flat query-string pairs where an unset (zero or
//! empty) field is left out entirely. Mutations are wrapped in the
//! singleton `{"add": [..]}` / `{"update": [..]}` envelope the API expects.

use serde::Serialize;

/// Join identifiers with commas, preserving input order
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Flat query-string builder that drops unset values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integer parameter; zero means unset
    pub fn num(mut self, key: &'static str, value: i64) -> Self {
        if value != 0 {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// String parameter; empty means unset
    pub fn text(mut self, key: &'static str, value: &str) -> Self {
        if !value.is_empty() {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Comma-joined identifier list; empty means unset
    pub fn ids(mut self, key: &'static str, values: &[i64]) -> Self {
        if !values.is_empty() {
            self.pairs.push((key, join_ids(values)));
        }
        self
    }

    /// Comma-joined string list; empty means unset
    pub fn list(mut self, key: &'static str, values: &[&str]) -> Self {
        if !values.is_empty() {
            self.pairs.push((key, values.join(",")));
        }
        self
    }

    /// Boolean parameter; `None` means unset
    pub fn flag(mut self, key: &'static str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, if value { "1" } else { "0" }.to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Filter objects that encode into a query string
pub trait ToQuery {
    fn to_query(&self) -> Query;
}

/// Write envelope for add/update calls
///
/// Serializes as `{"add": [item]}` or `{"update": [item]}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutation<'a, T: Serialize> {
    Add([&'a T; 1]),
    Update([&'a T; 1]),
}

impl<'a, T: Serialize> Mutation<'a, T> {
    pub fn add(item: &'a T) -> Self {
        Mutation::Add([item])
    }

    pub fn update(item: &'a T) -> Self {
        Mutation::Update([item])
    }
}
