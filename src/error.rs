//! Resource-level error types shared by configuration, transport, and response handling.
//!
//! Only [`ConfigError`] ever escapes the public API as an `Err`, wrapped in [`Error`]: it is
//! fatal to resource startup. [`TransportError`] and [`ProtocolError`] are folded into the
//! operation results so the gateway always receives a value.

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// Resource-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical resource error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and validation failures raised while starting the resource.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The configuration document could not be deserialized.
	#[error("Resource configuration is invalid.")]
	Deserialize {
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The Access Management server URL cannot be parsed.
	#[error("Server URL `{url}` is invalid.")]
	InvalidServerUrl {
		/// Raw URL supplied by the configuration.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The Access Management server URL does not use HTTP(S).
	#[error("Server URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Scheme found in the configured URL.
		scheme: String,
	},
	/// The Access Management server URL has no host component.
	#[error("Server URL `{url}` has no host.")]
	MissingHost {
		/// Raw URL supplied by the configuration.
		url: String,
	},
	/// The security domain is empty.
	#[error("Security domain cannot be empty.")]
	MissingSecurityDomain,
	/// Proxy is enabled without a host to dial.
	#[error("Proxy is enabled but no proxy host is configured.")]
	MissingProxyHost,
	/// Proxy protocol is not available on this transport.
	#[error("Proxy type {kind} is not supported.")]
	UnsupportedProxyType {
		/// Proxy protocol label.
		kind: &'static str,
	},
	/// Key or trust store format is not available on this transport.
	#[error("The {store} store type {kind} is not supported; use PEM.")]
	UnsupportedStore {
		/// Which store failed validation.
		store: &'static str,
		/// Store type label.
		kind: &'static str,
	},
	/// A PEM store declares neither a path nor inline content.
	#[error("The {store} store has no {material} path or content.")]
	MissingStoreMaterial {
		/// Which store failed validation.
		store: &'static str,
		/// Missing material label (certificate, key).
		material: &'static str,
	},
	/// A PEM file referenced by a store could not be read.
	#[error("Unable to read {store} store material at {}.", .path.display())]
	StoreRead {
		/// Which store failed to load.
		store: &'static str,
		/// File path that could not be read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, request construction, lifecycle).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Access Management server: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete before its deadline.
	#[error("Request to the Access Management server timed out.")]
	Timeout,
	/// A header value could not be encoded, so the request was never sent.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header that was being set.
		name: ::http::HeaderName,
		/// Encoding failure.
		#[source]
		source: ::http::header::InvalidHeaderValue,
	},
	/// The resource was stopped and its HTTP client released.
	#[error("HTTP client is closed.")]
	Closed,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Upstream answers that violate the Access Management contract.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// The endpoint answered with a non-200 status.
	#[error("The {endpoint} endpoint returned status {status}.")]
	UnexpectedStatus {
		/// Endpoint label (introspection, userinfo).
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
	},
	/// A V2/V3 introspection body is not a JSON object with a boolean `active` flag.
	#[error("Introspection endpoint returned a malformed body.")]
	MalformedIntrospection {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transport_messages_carry_the_cause() {
		let err = TransportError::network(std::io::Error::other("connection refused"));

		assert_eq!(
			err.to_string(),
			"Network error occurred while calling the Access Management server: connection refused."
		);
		assert_eq!(TransportError::Closed.to_string(), "HTTP client is closed.");

		let source = ::http::HeaderValue::from_str("line\nbreak")
			.expect_err("Newlines are not valid header bytes.");
		let err = TransportError::InvalidHeader { name: ::http::header::AUTHORIZATION, source };

		assert_eq!(err.to_string(), "Header `authorization` has an invalid value.");
	}

	#[test]
	fn config_errors_lift_into_the_canonical_error() {
		let err: Error = ConfigError::MissingSecurityDomain.into();

		assert!(matches!(err, Error::Config(ConfigError::MissingSecurityDomain)));
		assert_eq!(err.to_string(), "Security domain cannot be empty.");
	}
}
