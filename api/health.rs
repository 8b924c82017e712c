use serde_json::json;
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};
use resume_view_counter::handler::lazy::counter_from_env;
use resume_view_counter::handler::LazyCounter;
use resume_view_counter::{telemetry, version};

static COUNTER: LazyCounter = LazyCounter::new();

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();
    run(handler).await
}

/// GET /api/health — version and store backend; 500 when the counter
/// cannot be built from the current configuration.
pub async fn handler(_req: Request) -> Result<Response<Body>, Error> {
    let (status, payload) = match COUNTER.get_or_build(counter_from_env).await {
        Ok(counter) => (
            StatusCode::OK,
            json!({
                "status": "ok",
                "version": version(),
                "backend": counter.backend(),
            }),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "status": "misconfigured",
                "version": version(),
                "error": err.to_string(),
            }),
        ),
    };

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(payload.to_string()))?)
}
