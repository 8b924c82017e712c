use vercel_runtime::{run, Body, Error, Request, Response};

use resume_view_counter::handler::lazy::counter_from_env;
use resume_view_counter::handler::LazyCounter;
use resume_view_counter::telemetry;

/// Built on the first invocation, reused by every warm one after it.
static COUNTER: LazyCounter = LazyCounter::new();

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();
    run(handler).await
}

/// GET /api/views — count a visit and return the new total.
/// OPTIONS /api/views — CORS preflight.
pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let response = COUNTER.respond(&req, counter_from_env).await;
    Ok(response.into_http()?)
}
