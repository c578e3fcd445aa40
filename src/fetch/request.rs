//! Pending request descriptor.

use reqwest::Method;
use serde_json::Value;

/// One logical upstream call.
///
/// Immutable across retries except for `attempt`, which the executor bumps
/// before each retry. Query parameters are an ordered list of pairs so that
/// array-valued parameters (e.g. `expand=owner&expand=hiringManager`) can
/// repeat a key.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Zero-based attempt number.
    pub attempt: u32,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        RequestDescriptor {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            attempt: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Appends a query parameter only when a value is present.
    pub fn with_query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    /// Appends one `key=value` pair per value.
    pub fn with_query_all<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Appends every pair of an existing parameter list.
    pub fn with_query_pairs(mut self, pairs: &[(String, String)]) -> Self {
        self.query.extend(pairs.iter().cloned());
        self
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_parameter_order_and_repeats() {
        let request = RequestDescriptor::get("/postings")
            .with_query("state", "published")
            .with_query_all("expand", ["owner", "hiringManager"])
            .with_query_opt("offset", None::<String>)
            .with_query_opt("limit", Some(100));

        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![
                ("state".to_string(), "published".to_string()),
                ("expand".to_string(), "owner".to_string()),
                ("expand".to_string(), "hiringManager".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
        assert_eq!(request.query_value("expand"), Some("owner"));
        assert_eq!(request.query_value("offset"), None);
        assert_eq!(request.attempt, 0);
    }

    #[test]
    fn test_body_is_attached() {
        let request =
            RequestDescriptor::post("/opportunities/1/notes").with_body(json!({"value": "hi"}));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(json!({"value": "hi"})));
    }
}
