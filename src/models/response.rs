//! Response bodies and the gateway-style response envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headers attached to every response, success or failure.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Success body: `{"views": n}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewsBody {
    pub views: u64,
}

/// Failure body: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Response in the shape API gateways and function URLs expect from a
/// proxy integration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    /// Builds a response carrying the fixed CORS header set.
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        ProxyResponse {
            status_code,
            headers: cors_header_map(),
            body: body.into(),
        }
    }
}

/// The fixed CORS headers as an owned map.
pub fn cors_header_map() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_response_uses_gateway_field_names() {
        let response = ProxyResponse::new(200, "");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "");
        assert_eq!(json["headers"]["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_header_map_has_exactly_four_entries() {
        let headers = cors_header_map();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET,OPTIONS");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
    }
}
