//! HTTP method resolution for JSON invocation events.
//!
//! Gateways put the request method in different places depending on the
//! payload version: function URLs and HTTP APIs use
//! `requestContext.http.method`, REST APIs use `httpMethod`, and some test
//! harnesses send a bare top-level `method`. Which fields to consult is
//! configuration, not code.

use http::Method;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::CounterError;

/// Field paths tried when no configuration overrides them, in order.
pub const DEFAULT_METHOD_PATHS: [&str; 3] = ["requestContext.http.method", "httpMethod", "method"];

/// A dotted path to a string field inside an event document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPath {
    segments: Vec<String>,
}

impl MethodPath {
    /// Looks the path up in `event`, returning the value only if it is a string.
    pub fn lookup<'a>(&self, event: &'a Value) -> Option<&'a str> {
        self.segments
            .iter()
            .try_fold(event, |node, segment| node.get(segment.as_str()))
            .and_then(Value::as_str)
    }

    /// The built-in path list.
    pub fn defaults() -> Vec<MethodPath> {
        DEFAULT_METHOD_PATHS
            .iter()
            .filter_map(|path| path.parse().ok())
            .collect()
    }

    /// Parses a comma-separated path list, e.g. `"requestContext.http.method,method"`.
    pub fn parse_list(list: &str) -> Result<Vec<MethodPath>, CounterError> {
        let paths = list
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(MethodPath::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if paths.is_empty() {
            return Err(CounterError::Config("method path list is empty".to_string()));
        }
        Ok(paths)
    }
}

impl FromStr for MethodPath {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.trim().split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(CounterError::Config(format!("invalid method path '{s}'")));
        }
        Ok(MethodPath { segments })
    }
}

impl fmt::Display for MethodPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Resolves the request method from an event.
///
/// Paths are tried in order; the first string found wins. Returns `None`
/// when no path yields a string or the string is not a valid method token.
pub fn resolve_method(event: &Value, paths: &[MethodPath]) -> Option<Method> {
    let raw = paths.iter().find_map(|path| path.lookup(event))?;
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes()).ok()
}
