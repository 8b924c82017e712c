use serde_json::json;
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::CounterError;
use crate::models::response::{ProxyResponse, ViewsBody, CORS_HEADERS};

/// Outcome of one invocation, before it is framed for a particular runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterResponse {
    pub status: StatusCode,
    pub body: String,
}

impl CounterResponse {
    /// Answer to a CORS preflight: 200 with an empty body.
    pub fn preflight() -> Self {
        CounterResponse {
            status: StatusCode::OK,
            body: String::new(),
        }
    }

    pub fn views(views: u64) -> Result<Self, CounterError> {
        Ok(CounterResponse {
            status: StatusCode::OK,
            body: serde_json::to_string(&ViewsBody { views })?,
        })
    }

    /// 500 carrying the error's message.
    pub fn failure(err: &CounterError) -> Self {
        CounterResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": err.to_string() }).to_string(),
        }
    }

    pub fn method_not_allowed() -> Self {
        CounterResponse {
            status: StatusCode::METHOD_NOT_ALLOWED,
            body: json!({ "error": "Method not allowed" }).to_string(),
        }
    }

    /// Frames the response for the Vercel runtime, CORS headers attached.
    pub fn into_http(self) -> Result<Response<Body>, http::Error> {
        CORS_HEADERS
            .iter()
            .fold(Response::builder().status(self.status), |builder, (name, value)| {
                builder.header(*name, *value)
            })
            .body(Body::Text(self.body))
    }

    /// Frames the response as a gateway proxy result, CORS headers attached.
    pub fn into_proxy(self) -> ProxyResponse {
        ProxyResponse::new(self.status.as_u16(), self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::response::ErrorBody;

    #[test]
    fn test_http_response_carries_all_cors_headers() {
        let response = CounterResponse::views(3).unwrap().into_http().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().len(), 4);
        for (name, value) in CORS_HEADERS {
            assert_eq!(response.headers()[name], value);
        }
        match response.body() {
            Body::Text(text) => assert_eq!(text, r#"{"views":3}"#),
            _ => panic!("expected a text body"),
        }
    }

    #[test]
    fn test_failure_body_has_error_field() {
        let err = CounterError::Store("connection refused".to_string());
        let response = CounterResponse::failure(&err).into_proxy();
        assert_eq!(response.status_code, 500);
        let body: ErrorBody = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body.error, "connection refused");
        assert_eq!(response.headers.len(), 4);
    }

    #[test]
    fn test_preflight_body_is_empty() {
        let response = CounterResponse::preflight().into_http().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        match response.body() {
            Body::Text(text) => assert!(text.is_empty()),
            _ => panic!("expected a text body"),
        }
    }

    #[test]
    fn test_method_not_allowed_is_405_json() {
        let response = CounterResponse::method_not_allowed().into_proxy();
        assert_eq!(response.status_code, 405);
        let body: ErrorBody = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body.error, "Method not allowed");
    }
}
