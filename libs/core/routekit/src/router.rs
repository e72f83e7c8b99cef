use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};

use crate::context::Context;
use crate::error::HttpError;

pub type BoxFuture = Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send>>;

/// A route handler: writes its response through the [`Context`] and
/// returns an [`HttpError`] on failure.
pub type Handler = Arc<dyn Fn(Context) -> BoxFuture + Send + Sync>;

/// Error handler invoked when the middleware chain returns an error.
/// Must be a no-op when the response is already committed.
pub type ErrorHandler = Arc<dyn Fn(&HttpError, &Context) + Send + Sync>;

struct Route {
    method: Method,
    pattern: String,
    handler: Handler,
}

/// Ordered route table plus middleware chain.
///
/// Routes are tried in registration order; the first matching
/// (method, pattern) pair wins. Middleware composes so that the first
/// registered middleware is outermost.
pub struct Router {
    routes: Vec<Route>,
    middleware: Vec<crate::middleware::Middleware>,
    error_handler: ErrorHandler,
    request_timeout: Option<Duration>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: Vec::new(),
            error_handler: Arc::new(default_error_handler),
            request_timeout: None,
        }
    }

    /// Append a middleware. Registration order is significant: the first
    /// registered wraps all later ones and the route handler.
    pub fn apply(&mut self, middleware: crate::middleware::Middleware) {
        self.middleware.push(middleware);
    }

    /// Replace the top-level error handler.
    pub fn error_handler(&mut self, handler: ErrorHandler) {
        self.error_handler = handler;
    }

    /// Give every request a deadline of now + `timeout`, surfaced through
    /// [`Context::deadline`].
    pub fn request_timeout(&mut self, timeout: Duration) {
        self.request_timeout = Some(timeout);
    }

    pub fn add(&mut self, method: Method, pattern: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            handler,
        });
    }

    pub fn get<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        self.add(Method::GET, pattern, into_handler(handler));
    }

    pub fn post<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        self.add(Method::POST, pattern, into_handler(handler));
    }

    pub fn put<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        self.add(Method::PUT, pattern, into_handler(handler));
    }

    pub fn delete<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        self.add(Method::DELETE, pattern, into_handler(handler));
    }

    /// A registration view that prefixes every pattern, e.g.
    /// `router.group("/api/v1/users")`.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group {
            prefix: prefix.to_string(),
            router: self,
        }
    }

    /// Run a request through matching, the middleware chain and the error
    /// handler, producing the final response.
    pub async fn dispatch<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: hyper::body::Body + Send,
        B::Data: Send,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path().to_string();

        let Some((pattern, params, handler)) = self.resolve(&parts.method, &path) else {
            return envelope_response(StatusCode::NOT_FOUND, "Not Found", &path);
        };

        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::debug!(error = %e, path = %path, "failed to read request body");
                return envelope_response(StatusCode::BAD_REQUEST, "invalid request payload", &path);
            }
        };

        let ctx = Context::new(
            parts.method,
            path,
            parts.headers,
            body,
            params,
            pattern,
            self.request_timeout.map(|t| Instant::now() + t),
        );

        // Innermost is the route handler; first-registered middleware
        // ends up outermost.
        let mut handler = handler;
        for middleware in self.middleware.iter().rev() {
            let middleware = middleware.clone();
            let inner = handler;
            handler =
                Arc::new(move |ctx: Context| middleware(ctx, Next { inner: inner.clone() }));
        }

        if let Err(err) = handler(ctx.clone()).await {
            (self.error_handler)(&err, &ctx);
        }

        ctx.take_response().into_response()
    }

    /// Find the handler for (method, path): the first registered route
    /// wins. An `OPTIONS` request whose path matches some route of another
    /// method still runs the middleware chain (so CORS preflight can
    /// answer) around a bare 204 handler.
    fn resolve(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(String, HashMap<String, String>, Handler)> {
        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            if let Some(params) = match_path(&route.pattern, path) {
                return Some((route.pattern.clone(), params, route.handler.clone()));
            }
        }

        if *method == Method::OPTIONS {
            for route in &self.routes {
                if let Some(params) = match_path(&route.pattern, path) {
                    let preflight: Handler = Arc::new(|ctx: Context| {
                        Box::pin(async move { ctx.no_content(StatusCode::NO_CONTENT) })
                    });
                    return Some((route.pattern.clone(), params, preflight));
                }
            }
        }

        None
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// The remainder of the middleware chain. Consumed by [`Next::run`];
/// dropping it without running short-circuits the chain.
pub struct Next {
    inner: Handler,
}

impl Next {
    pub fn run(self, ctx: Context) -> BoxFuture {
        (self.inner)(ctx)
    }
}

/// Route registration scoped under a shared path prefix.
pub struct Group<'r> {
    prefix: String,
    router: &'r mut Router,
}

impl Group<'_> {
    pub fn get<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        let pattern = combine_path(&self.prefix, pattern);
        self.router.get(&pattern, handler);
    }

    pub fn post<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        let pattern = combine_path(&self.prefix, pattern);
        self.router.post(&pattern, handler);
    }

    pub fn put<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        let pattern = combine_path(&self.prefix, pattern);
        self.router.put(&pattern, handler);
    }

    pub fn delete<H, Fut>(&mut self, pattern: &str, handler: H)
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
    {
        let pattern = combine_path(&self.prefix, pattern);
        self.router.delete(&pattern, handler);
    }
}

fn into_handler<H, Fut>(handler: H) -> Handler
where
    H: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HttpError>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(handler(ctx)))
}

/// Match a request path against a pattern. Segments starting with `:`
/// bind the corresponding path component; everything else must match
/// literally, and the segment counts must agree.
fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    if pattern == path {
        return Some(HashMap::new());
    }

    let pattern_parts: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_parts: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pattern_part, path_part) in pattern_parts.iter().zip(&path_parts) {
        if let Some(name) = pattern_part.strip_prefix(':') {
            params.insert(name.to_string(), (*path_part).to_string());
        } else if pattern_part != path_part {
            return None;
        }
    }

    Some(params)
}

fn combine_path(prefix: &str, path: &str) -> String {
    if path.is_empty() {
        return prefix.to_string();
    }
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    if path.starts_with('/') {
        format!("{}{}", prefix, path)
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Default top-level error handler: writes the JSON error envelope, or
/// nothing at all when the response is already committed.
pub(crate) fn default_error_handler(err: &HttpError, ctx: &Context) {
    if ctx.committed() {
        return;
    }
    if let Some(detail) = &err.internal {
        tracing::error!(status = err.status.as_u16(), error = %detail, path = %ctx.path(), "request failed");
    }
    let _ = ctx.json(
        err.status,
        &serde_json::json!({
            "error": err.message,
            "status": err.status.as_u16(),
            "request": ctx.path(),
        }),
    );
}

fn envelope_response(status: StatusCode, message: &str, path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(&serde_json::json!({
        "error": message,
        "status": status.as_u16(),
        "request": path,
    }))
    .unwrap_or_default();

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
