use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::HttpError;
use crate::response::ResponseState;

/// Per-request context handed to handlers and middleware.
///
/// Cloning is cheap; every clone views the same response state, so a
/// middleware and the handler it wraps observe each other's writes.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    route: String,
    deadline: Option<Instant>,
    response: Mutex<ResponseState>,
}

impl Context {
    pub(crate) fn new(
        method: Method,
        path: String,
        headers: HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
        route: String,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                method,
                path,
                headers,
                body,
                params,
                route,
                deadline,
                response: Mutex::new(ResponseState::new()),
            }),
        }
    }

    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// The registered pattern that matched this request, e.g. `/users/:id`.
    pub fn route(&self) -> &str {
        &self.inner.route
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.inner.body
    }

    /// A bound path parameter, e.g. `id` for the pattern `/users/:id`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.inner.params.get(name).map(String::as_str)
    }

    /// The point in time after which this request should give up, when the
    /// server was configured with a request timeout.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Deserialize the JSON request body. Unknown-field and type errors
    /// surface as a 400 with an opaque message; the decoder detail is kept
    /// for logging only.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.inner.body).map_err(|e| {
            HttpError::new(StatusCode::BAD_REQUEST, "invalid request payload").with_internal(e)
        })
    }

    /// Write a JSON response, committing `status`. A no-op status-wise if
    /// the response was already committed.
    pub fn json<T: Serialize + ?Sized>(&self, status: StatusCode, value: &T) -> Result<(), HttpError> {
        let payload = serde_json::to_vec(value).map_err(HttpError::internal)?;
        let mut response = self.response();
        if !response.committed() {
            response.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        response.commit(status);
        response.write(&payload);
        Ok(())
    }

    /// Commit `status` with an empty body.
    pub fn no_content(&self, status: StatusCode) -> Result<(), HttpError> {
        self.response().commit(status);
        Ok(())
    }

    /// Set a response header. Ignored once the response is committed.
    pub fn set_response_header(&self, name: HeaderName, value: HeaderValue) {
        self.response().set_header(name, value);
    }

    pub fn committed(&self) -> bool {
        self.response().committed()
    }

    /// The committed response status, if any.
    pub fn response_status(&self) -> Option<StatusCode> {
        self.response().status()
    }

    pub(crate) fn take_response(&self) -> ResponseState {
        std::mem::take(&mut *self.response())
    }

    fn response(&self) -> MutexGuard<'_, ResponseState> {
        self.inner
            .response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
