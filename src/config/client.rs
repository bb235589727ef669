//! Connection pool, timeout, and protocol settings for the outbound HTTP client.

// self
use crate::_prelude::*;

/// HTTP protocol version negotiated with the Access Management server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpProtocolVersion {
	#[default]
	/// HTTP/1.1 only.
	#[serde(rename = "HTTP_1_1")]
	Http11,
	/// HTTP/2, over ALPN for TLS targets.
	#[serde(rename = "HTTP_2")]
	Http2,
}

/// Connection pool and timeout settings for the outbound client.
///
/// Durations are expressed in milliseconds to match the plugin's JSON surface; a zero value
/// disables the corresponding timeout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpClientOptions {
	/// TCP connect timeout.
	pub connect_timeout: u64,
	/// Maximum wait between two reads of a response.
	pub read_timeout: u64,
	/// How long an idle pooled connection is kept.
	pub idle_timeout: u64,
	/// Enables TCP keep-alive probes.
	pub keep_alive: bool,
	/// Interval between TCP keep-alive probes.
	pub keep_alive_timeout: u64,
	/// Connection cap from the plugin configuration.
	///
	/// reqwest has no hard limit on concurrent connections per host, so the value caps the
	/// pooled idle connections instead; bursts above it open extra, short-lived connections.
	pub max_concurrent_connections: usize,
	/// Follows upstream redirects when set.
	pub follow_redirects: bool,
	/// Allows cleartext HTTP/2 to start as HTTP/1.1 instead of assuming prior knowledge.
	pub clear_text_upgrade: bool,
	/// Protocol version.
	pub version: HttpProtocolVersion,
}
impl HttpClientOptions {
	const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
	const DEFAULT_IDLE_TIMEOUT_MS: u64 = 60_000;
	const DEFAULT_KEEP_ALIVE_TIMEOUT_MS: u64 = 30_000;
	const DEFAULT_MAX_CONCURRENT_CONNECTIONS: usize = 100;
	const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
}
impl Default for HttpClientOptions {
	fn default() -> Self {
		Self {
			connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT_MS,
			read_timeout: Self::DEFAULT_READ_TIMEOUT_MS,
			idle_timeout: Self::DEFAULT_IDLE_TIMEOUT_MS,
			keep_alive: true,
			keep_alive_timeout: Self::DEFAULT_KEEP_ALIVE_TIMEOUT_MS,
			max_concurrent_connections: Self::DEFAULT_MAX_CONCURRENT_CONNECTIONS,
			follow_redirects: false,
			clear_text_upgrade: true,
			version: HttpProtocolVersion::default(),
		}
	}
}

/// Converts a millisecond setting into a duration, treating zero as "disabled".
pub(crate) fn millis(value: u64) -> Option<Duration> {
	(value > 0).then(|| Duration::from_millis(value))
}
