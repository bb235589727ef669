//! Outbound proxy settings: explicit HTTP/SOCKS5 proxies or the environment proxy.

// self
use crate::{_prelude::*, config::Secret, error::ConfigError};

/// Proxy protocols understood by the plugin configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProxyType {
	#[default]
	/// HTTP CONNECT proxy.
	Http,
	/// SOCKS4 proxy.
	Socks4,
	/// SOCKS5 proxy.
	Socks5,
}
impl ProxyType {
	/// Returns a stable label matching the configuration surface.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProxyType::Http => "HTTP",
			ProxyType::Socks4 => "SOCKS4",
			ProxyType::Socks5 => "SOCKS5",
		}
	}

	const fn default_port(self) -> u16 {
		match self {
			ProxyType::Http => 3128,
			ProxyType::Socks4 | ProxyType::Socks5 => 1080,
		}
	}
}
impl Display for ProxyType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound proxy settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpProxyOptions {
	/// Routes outbound calls through a proxy when set.
	pub enabled: bool,
	/// Uses the proxy declared by the process environment instead of `host`/`port`.
	pub use_system_proxy: bool,
	/// Proxy host.
	pub host: Option<String>,
	/// Proxy port; defaults per proxy type.
	pub port: Option<u16>,
	/// Proxy username for basic authentication.
	pub username: Option<String>,
	/// Proxy password for basic authentication.
	pub password: Option<Secret>,
	/// Proxy protocol.
	#[serde(rename = "type")]
	pub kind: ProxyType,
}
impl HttpProxyOptions {
	/// Proxy settings that defer to the environment (`HTTP_PROXY`, `HTTPS_PROXY`, ...).
	pub fn system() -> Self {
		Self { enabled: true, use_system_proxy: true, ..Default::default() }
	}

	/// Returns `true` when the explicit `host`/`port` proxy must be dialed.
	pub fn is_explicit(&self) -> bool {
		self.enabled && !self.use_system_proxy
	}

	/// Builds the proxy URL for explicit proxies.
	pub fn proxy_url(&self) -> Result<String, ConfigError> {
		let host = self
			.host
			.as_deref()
			.map(str::trim)
			.filter(|host| !host.is_empty())
			.ok_or(ConfigError::MissingProxyHost)?;
		let scheme = match self.kind {
			ProxyType::Http => "http",
			ProxyType::Socks5 => "socks5",
			ProxyType::Socks4 =>
				return Err(ConfigError::UnsupportedProxyType { kind: self.kind.as_str() }),
		};
		let port = self.port.unwrap_or(self.kind.default_port());

		Ok(format!("{scheme}://{host}:{port}"))
	}
}
