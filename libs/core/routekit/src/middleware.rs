use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use futures::FutureExt;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderName, HeaderValue, ORIGIN, VARY,
};
use http::{Method, StatusCode};

use crate::context::Context;
use crate::error::HttpError;
use crate::router::{BoxFuture, Next};

/// A middleware wraps the rest of the chain: it may short-circuit by not
/// running `next`, mutate the response before or after, or translate a
/// failure.
pub type Middleware = Arc<dyn Fn(Context, Next) -> BoxFuture + Send + Sync>;

/// Build a [`Middleware`] from an async closure.
pub fn from_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
{
    Arc::new(move |ctx, next| Box::pin(f(ctx, next)))
}

/// Stamps every response with an `X-Request-ID` header drawn from the
/// given counter. The counter is owned by the caller and injected here so
/// two runtimes in one process never share id sequences.
pub fn request_id(counter: Arc<AtomicU64>) -> Middleware {
    from_fn(move |ctx, next| {
        let counter = counter.clone();
        async move {
            let id = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
                ctx.set_response_header(HeaderName::from_static("x-request-id"), value);
            }
            next.run(ctx).await
        }
    })
}

/// Converts a panic inside the wrapped chain into a 500. The panic payload
/// is logged by the error handler, never sent to the client.
pub fn recover() -> Middleware {
    from_fn(|ctx, next| async move {
        match std::panic::AssertUnwindSafe(next.run(ctx)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error",
            )
            .with_internal(format!("handler panicked: {}", panic_message(&panic)))),
        }
    })
}

/// Logs one line per request: method, path, status and latency.
pub fn logger() -> Middleware {
    from_fn(|ctx, next| async move {
        let start = Instant::now();
        let method = ctx.method().clone();
        let path = ctx.path().to_string();

        let result = next.run(ctx.clone()).await;

        let status = match &result {
            Ok(()) => ctx.response_status().unwrap_or(StatusCode::OK).as_u16(),
            Err(err) => err.status.as_u16(),
        };
        tracing::info!(
            method = %method,
            path = %path,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request"
        );

        result
    })
}

/// CORS with a configurable origin allow-list; a `*` entry allows every
/// origin. Preflight `OPTIONS` requests short-circuit with 204.
pub fn cors(allow_origins: Vec<String>) -> Middleware {
    let allow_all = allow_origins.iter().any(|o| o == "*");
    from_fn(move |ctx, next| {
        let allow_origins = allow_origins.clone();
        async move {
            let allowed = if allow_all {
                Some(HeaderValue::from_static("*"))
            } else {
                ctx.headers()
                    .get(ORIGIN)
                    .and_then(|v| v.to_str().ok())
                    .filter(|origin| allow_origins.iter().any(|a| a == origin))
                    .and_then(|origin| HeaderValue::from_str(origin).ok())
            };

            if let Some(value) = allowed {
                ctx.set_response_header(ACCESS_CONTROL_ALLOW_ORIGIN, value);
                ctx.set_response_header(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
                );
                ctx.set_response_header(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type, Authorization"),
                );
                if !allow_all {
                    ctx.set_response_header(VARY, HeaderValue::from_static("Origin"));
                }
            }

            if ctx.method() == Method::OPTIONS {
                return ctx.no_content(StatusCode::NO_CONTENT);
            }

            next.run(ctx).await
        }
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
