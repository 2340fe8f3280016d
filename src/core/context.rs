//! Call-site context classification and field enrichment
//!
//! A record's context is decided at the call boundary as one of three shapes:
//! a web request, nothing at all, or some other value that is logged through
//! its display form. Each shape maps to a fixed set of fields.

use super::field::Field;
use std::fmt;

/// Header carrying the distributed trace / request id
pub const REQUEST_ID_HEADER: &str = "x-b3-traceid";
/// Header naming the calling application
pub const ORIGIN_APP_HEADER: &str = "app-name";

pub const KEY_PATH: &str = "path";
pub const KEY_TITLE: &str = "title";
pub const KEY_ORIGIN_APP_NAME: &str = "origin_app_name";
pub const KEY_CTX: &str = "ctx";

/// Read access to an inbound web request.
///
/// Implemented for [`http::Request`] and [`http::request::Parts`], so
/// handlers built on the `http` types (axum, hyper, tower) can pass their
/// request directly.
pub trait RequestContext {
    /// Value of the header `name`, if present and valid UTF-8
    fn header(&self, name: &str) -> Option<&str>;

    /// Request target as received: path plus query string
    fn request_uri(&self) -> String;
}

fn uri_target(uri: &http::Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

impl<B> RequestContext for http::Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn request_uri(&self) -> String {
        uri_target(self.uri())
    }
}

impl RequestContext for http::request::Parts {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn request_uri(&self) -> String {
        uri_target(&self.uri)
    }
}

/// The context a record is logged under
#[derive(Clone, Copy, Default)]
pub enum CallContext<'a> {
    /// An inbound web request
    Request(&'a dyn RequestContext),
    /// No context supplied
    #[default]
    Absent,
    /// Any other value, logged as its display string
    Opaque(&'a dyn fmt::Display),
}

impl<'a> CallContext<'a> {
    pub fn request(request: &'a dyn RequestContext) -> Self {
        CallContext::Request(request)
    }

    pub fn opaque(value: &'a dyn fmt::Display) -> Self {
        CallContext::Opaque(value)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CallContext::Absent)
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallContext::Request(request) => f
                .debug_tuple("Request")
                .field(&request.request_uri())
                .finish(),
            CallContext::Absent => f.write_str("Absent"),
            CallContext::Opaque(value) => f.debug_tuple("Opaque").field(&value.to_string()).finish(),
        }
    }
}

impl<'a, B> From<&'a http::Request<B>> for CallContext<'a> {
    fn from(request: &'a http::Request<B>) -> Self {
        CallContext::Request(request)
    }
}

impl<'a> From<&'a http::request::Parts> for CallContext<'a> {
    fn from(parts: &'a http::request::Parts) -> Self {
        CallContext::Request(parts)
    }
}

impl<'a> From<Option<&'a dyn RequestContext>> for CallContext<'a> {
    fn from(request: Option<&'a dyn RequestContext>) -> Self {
        request.map_or(CallContext::Absent, CallContext::Request)
    }
}

/// Fields contributed by `ctx`, always including `title`.
///
/// A request always yields `path`, the request-id header, `title` and
/// `origin_app_name`; missing headers become empty strings.
pub fn enrich(ctx: &CallContext<'_>, title: &str) -> Vec<Field> {
    match ctx {
        CallContext::Request(request) => vec![
            Field::new(KEY_PATH, request.request_uri()),
            Field::new(REQUEST_ID_HEADER, request.header(REQUEST_ID_HEADER).unwrap_or("")),
            Field::new(KEY_TITLE, title),
            Field::new(
                KEY_ORIGIN_APP_NAME,
                request.header(ORIGIN_APP_HEADER).unwrap_or(""),
            ),
        ],
        CallContext::Absent => vec![Field::new(KEY_TITLE, title)],
        CallContext::Opaque(value) => vec![
            Field::new(KEY_CTX, value.to_string()),
            Field::new(KEY_TITLE, title),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    fn keys(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn test_enrich_request() {
        let request = http::Request::builder()
            .uri("/v1/x?page=2")
            .header(REQUEST_ID_HEADER, "abc123")
            .header(ORIGIN_APP_HEADER, "gateway")
            .body(())
            .unwrap();

        let fields = enrich(&CallContext::from(&request), "login");
        assert_eq!(
            fields,
            vec![
                Field::new("path", "/v1/x?page=2"),
                Field::new("x-b3-traceid", "abc123"),
                Field::new("title", "login"),
                Field::new("origin_app_name", "gateway"),
            ]
        );
    }

    #[test]
    fn test_enrich_request_missing_headers() {
        let (parts, _) = http::Request::builder()
            .uri("/health")
            .body(())
            .unwrap()
            .into_parts();

        let fields = enrich(&CallContext::from(&parts), "healthcheck");
        assert_eq!(keys(&fields), ["path", "x-b3-traceid", "title", "origin_app_name"]);
        assert_eq!(fields[1].value, FieldValue::String(String::new()));
        assert_eq!(fields[3].value, FieldValue::String(String::new()));
    }

    #[test]
    fn test_enrich_absent() {
        let fields = enrich(&CallContext::Absent, "info");
        assert_eq!(fields, vec![Field::new("title", "info")]);
    }

    #[test]
    fn test_enrich_opaque() {
        let job = "nightly-batch";
        let fields = enrich(&CallContext::opaque(&job), "cron");
        assert_eq!(
            fields,
            vec![Field::new("ctx", "nightly-batch"), Field::new("title", "cron")]
        );
    }

    #[test]
    fn test_from_optional_request() {
        let none: Option<&dyn RequestContext> = None;
        assert!(CallContext::from(none).is_absent());
    }
}
