use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;

/// Buffered response with single-commit semantics.
///
/// The first status write commits the response: status and headers become
/// immutable and later status writes are silently ignored. Body writes on
/// an uncommitted response commit `200 OK` first. This mirrors the
/// write-once contract of an HTTP stream even though the body is buffered.
#[derive(Debug, Default)]
pub struct ResponseState {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
    committed: bool,
}

impl ResponseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header. Ignored once the response is committed.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if !self.committed {
            self.headers.insert(name, value);
        }
    }

    /// Commit the response with `status`. Returns false (and does nothing)
    /// if already committed.
    pub fn commit(&mut self, status: StatusCode) -> bool {
        if self.committed {
            return false;
        }
        self.status = Some(status);
        self.committed = true;
        true
    }

    /// Append body bytes, committing `200 OK` first if needed.
    pub fn write(&mut self, bytes: &[u8]) {
        if !self.committed {
            self.commit(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }

    pub fn committed(&self) -> bool {
        self.committed
    }

    /// The committed status, or `None` before the first status write.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Finish the response. An untouched response becomes an empty `200 OK`.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}
