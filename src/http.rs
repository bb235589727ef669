//! Transport primitives for Access Management calls.
//!
//! The module exposes [`AmHttpClient`] alongside the [`AmRequest`]/[`AmResponse`] pair so
//! hosts can plug in their own HTTP stack. The resource builds every request itself (method,
//! endpoint, headers, body, deadline) and only asks the client to move bytes; status handling
//! stays in [`crate::response`].

#[cfg(feature = "reqwest")] mod transport;
#[cfg(feature = "reqwest")] pub use transport::*;

// crates.io
pub use ::http::{
	Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
// self
use crate::{_prelude::*, error::TransportError};

/// Correlation header carrying a fresh UUID per outbound call.
pub static REQUEST_ID: HeaderName = HeaderName::from_static("x-gravitee-request-id");

/// `application/json` media type.
pub const APPLICATION_JSON: &str = "application/json";
/// `application/x-www-form-urlencoded` media type.
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Future returned by [`AmHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AmResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to reach the Access Management server.
///
/// Implementations must be `Send + Sync + 'static` so one pooled instance can serve every
/// in-flight operation, and the returned future must be `Send` so gateway executors can move
/// it between worker threads. Only failures that prevent a response from being read belong in
/// the `Err` branch; any HTTP status is a successful [`AmResponse`].
pub trait AmHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and collects the full response body.
	fn execute(&self, request: AmRequest) -> HttpFuture<'_>;
}

/// Outbound request handed to an [`AmHttpClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct AmRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute endpoint URL.
	pub url: Url,
	/// Request headers; `Authorization` is marked sensitive.
	pub headers: HeaderMap,
	/// Request body, if any.
	pub body: Option<String>,
	/// Per-request deadline; `None` leaves the client defaults in charge.
	pub timeout: Option<Duration>,
}
impl AmRequest {
	/// Creates a `GET` request without a body.
	pub fn get(url: Url) -> Self {
		Self { method: Method::GET, url, headers: HeaderMap::new(), body: None, timeout: None }
	}

	/// Creates a `POST` request carrying `body`.
	pub fn post(url: Url, body: impl Into<String>) -> Self {
		Self {
			method: Method::POST,
			url,
			headers: HeaderMap::new(),
			body: Some(body.into()),
			timeout: None,
		}
	}

	/// Sets a header, replacing any previous value.
	///
	/// Fails when `value` contains bytes a header cannot carry (control characters, newlines).
	pub fn header(
		mut self,
		name: &HeaderName,
		value: impl AsRef<str>,
	) -> Result<Self, TransportError> {
		let mut value = HeaderValue::from_str(value.as_ref())
			.map_err(|source| TransportError::InvalidHeader { name: name.clone(), source })?;

		value.set_sensitive(name == AUTHORIZATION);
		self.headers.insert(name.clone(), value);

		Ok(self)
	}

	/// Sets the per-request deadline.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Returns the value recorded for `name`, if it is visible ASCII.
	pub fn header_value(&self, name: &HeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}
impl Debug for AmRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AmRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &self.headers)
			.field("body_set", &self.body.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Response collected from the Access Management server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl AmResponse {
	/// Creates a response from a status code and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for `200 OK`.
	pub fn is_ok(&self) -> bool {
		self.status == 200
	}
}
