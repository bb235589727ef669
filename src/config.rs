//! Resource configuration consumed once when the resource starts.
//!
//! [`ResourceConfiguration`] mirrors the plugin's JSON document (`serverURL`,
//! `securityDomain`, credentials, protocol `version`, `userClaim`, and the `http`/`proxy`/`ssl`
//! option bags). It can be deserialized with [`ResourceConfiguration::from_json`] or assembled
//! with [`ResourceConfigurationBuilder`]; both paths run the same validation.

pub mod client;
pub mod proxy;
pub mod secret;
pub mod ssl;

pub use client::*;
pub use proxy::*;
pub use secret::*;
pub use ssl::*;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, endpoint, error::ConfigError};

/// Access Management protocol versions.
///
/// The version selects the endpoint layout and how introspection answers are read. `V3` is
/// wire-compatible with `V2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmVersion {
	#[default]
	/// Legacy servers exposing `/oauth/check_token` and `/userinfo`.
	#[serde(rename = "V1_X", alias = "V1")]
	V1,
	/// Servers exposing `/oauth/introspect` and `/oidc/userinfo`.
	#[serde(rename = "V2_X", alias = "V2")]
	V2,
	/// Same endpoint layout as [`AmVersion::V2`].
	#[serde(rename = "V3_X", alias = "V3")]
	V3,
}
impl AmVersion {
	/// Returns `true` for the legacy endpoint layout.
	pub const fn is_legacy(self) -> bool {
		matches!(self, AmVersion::V1)
	}

	/// Returns a stable label matching the configuration surface.
	pub const fn as_str(self) -> &'static str {
		match self {
			AmVersion::V1 => "V1_X",
			AmVersion::V2 => "V2_X",
			AmVersion::V3 => "V3_X",
		}
	}
}
impl Display for AmVersion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable configuration for an Access Management backed resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfiguration {
	/// Base URL of the Access Management server, optionally with a sub-path.
	#[serde(rename = "serverURL")]
	pub server_url: String,
	/// Security domain path segment scoping every endpoint.
	pub security_domain: String,
	/// Client identifier used to authenticate introspection calls.
	#[serde(default)]
	pub client_id: Secret,
	/// Client secret used to authenticate introspection calls.
	#[serde(default)]
	pub client_secret: Secret,
	/// Access Management protocol version.
	#[serde(default)]
	pub version: AmVersion,
	/// Claim the gateway reads from userinfo to identify the end user.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_claim: Option<String>,
	/// Routes outbound calls through the environment's proxy.
	#[serde(default)]
	pub use_system_proxy: bool,
	/// Connection pool and timeout settings.
	#[serde(default)]
	pub http: HttpClientOptions,
	/// Outbound proxy settings.
	#[serde(default)]
	pub proxy: HttpProxyOptions,
	/// TLS settings; a missing or `null` block selects [`SslOptions::legacy`].
	#[serde(default = "SslOptions::legacy", deserialize_with = "ssl::deserialize_or_legacy")]
	pub ssl: SslOptions,
}
impl ResourceConfiguration {
	/// Creates a new builder for the provided server and security domain.
	pub fn builder(
		server_url: impl Into<String>,
		security_domain: impl Into<String>,
	) -> ResourceConfigurationBuilder {
		ResourceConfigurationBuilder::new(server_url, security_domain)
	}

	/// Deserializes and validates a plugin configuration document.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let deserializer = &mut serde_json::Deserializer::from_str(raw);
		let configuration: Self = serde_path_to_error::deserialize(deserializer)
			.map_err(|source| ConfigError::Deserialize { source })?;

		configuration.validate()?;

		Ok(configuration)
	}

	/// Validates invariants required to start the resource.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.security_domain.trim().is_empty() {
			return Err(ConfigError::MissingSecurityDomain);
		}

		endpoint::parse_server_url(&self.server_url)?;

		let proxy = self.effective_proxy();

		if proxy.is_explicit() {
			proxy.proxy_url()?;
		}

		self.ssl.validate()
	}

	/// Proxy settings after applying the `useSystemProxy` switch.
	///
	/// Older plugin versions only carried the switch, so enabling it forces the proxy on and
	/// defers to the environment regardless of the `proxy` block.
	pub fn effective_proxy(&self) -> Cow<'_, HttpProxyOptions> {
		if self.use_system_proxy {
			Cow::Owned(HttpProxyOptions {
				enabled: true,
				use_system_proxy: true,
				..self.proxy.clone()
			})
		} else {
			Cow::Borrowed(&self.proxy)
		}
	}

	/// `Authorization` header value used for introspection calls.
	pub fn basic_authorization(&self) -> Secret {
		let credentials =
			format!("{}:{}", self.client_id.expose(), self.client_secret.expose());

		Secret::new(format!("Basic {}", STANDARD.encode(credentials)))
	}
}

/// Builder for [`ResourceConfiguration`] values.
#[derive(Debug)]
pub struct ResourceConfigurationBuilder {
	/// Configuration being assembled.
	pub configuration: ResourceConfiguration,
}
impl ResourceConfigurationBuilder {
	/// Creates a new builder seeded with the server and security domain.
	pub fn new(server_url: impl Into<String>, security_domain: impl Into<String>) -> Self {
		Self {
			configuration: ResourceConfiguration {
				server_url: server_url.into(),
				security_domain: security_domain.into(),
				client_id: Secret::default(),
				client_secret: Secret::default(),
				version: AmVersion::default(),
				user_claim: None,
				use_system_proxy: false,
				http: HttpClientOptions::default(),
				proxy: HttpProxyOptions::default(),
				ssl: SslOptions::default(),
			},
		}
	}

	/// Sets the client credentials used for introspection.
	pub fn client_credentials(
		mut self,
		client_id: impl Into<Secret>,
		client_secret: impl Into<Secret>,
	) -> Self {
		self.configuration.client_id = client_id.into();
		self.configuration.client_secret = client_secret.into();

		self
	}

	/// Overrides the protocol version (defaults to [`AmVersion::V1`]).
	pub fn version(mut self, version: AmVersion) -> Self {
		self.configuration.version = version;

		self
	}

	/// Sets the claim used to identify the end user.
	pub fn user_claim(mut self, claim: impl Into<String>) -> Self {
		self.configuration.user_claim = Some(claim.into());

		self
	}

	/// Toggles the environment proxy.
	pub fn use_system_proxy(mut self, enabled: bool) -> Self {
		self.configuration.use_system_proxy = enabled;

		self
	}

	/// Overrides the connection pool and timeout settings.
	pub fn http_options(mut self, options: HttpClientOptions) -> Self {
		self.configuration.http = options;

		self
	}

	/// Overrides the proxy settings.
	pub fn proxy_options(mut self, options: HttpProxyOptions) -> Self {
		self.configuration.proxy = options;

		self
	}

	/// Overrides the TLS settings.
	pub fn ssl_options(mut self, options: SslOptions) -> Self {
		self.configuration.ssl = options;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ResourceConfiguration, ConfigError> {
		self.configuration.validate()?;

		Ok(self.configuration)
	}
}
