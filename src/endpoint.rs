//! Access Management endpoint resolution.
//!
//! Endpoints are computed once from the configuration when the resource starts. The server
//! URL's path is normalized to end with a separator before the security domain is appended, so
//! `http://host/test` and `http://host/test/` resolve to the same endpoints.

// self
use crate::{
	_prelude::*,
	config::{AmVersion, ResourceConfiguration},
	error::ConfigError,
};

const PATH_SEPARATOR: char = '/';
const CHECK_TOKEN_ENDPOINT: &str = "/oauth/check_token";
const INTROSPECT_ENDPOINT: &str = "/oauth/introspect";
const USERINFO_ENDPOINT: &str = "/userinfo";
const OIDC_USERINFO_ENDPOINT: &str = "/oidc/userinfo";
const OIDC_SEGMENT: &str = "oidc";

/// Endpoints resolved from a [`ResourceConfiguration`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmEndpoints {
	/// Host of the Access Management server.
	pub host: String,
	/// Port of the Access Management server, defaulted from the scheme when absent.
	pub port: u16,
	/// Token introspection endpoint.
	pub introspection: Url,
	/// Userinfo endpoint.
	pub user_info: Url,
}
impl AmEndpoints {
	/// Resolves the endpoints for the configured server, security domain, and version.
	pub fn from_configuration(configuration: &ResourceConfiguration) -> Result<Self, ConfigError> {
		Self::resolve(
			&configuration.server_url,
			&configuration.security_domain,
			configuration.version,
		)
	}

	/// Resolves the endpoints from their raw inputs.
	pub fn resolve(
		server_url: &str,
		security_domain: &str,
		version: AmVersion,
	) -> Result<Self, ConfigError> {
		let server = parse_server_url(server_url)?;
		let host = server
			.host_str()
			.ok_or_else(|| ConfigError::MissingHost { url: server_url.to_owned() })?
			.to_owned();
		let port = server.port_or_known_default().unwrap_or(default_port(server.scheme()));
		let mut base = match server.path() {
			"" => PATH_SEPARATOR.to_string(),
			path => path.to_owned(),
		};

		if !base.ends_with(PATH_SEPARATOR) {
			base.push(PATH_SEPARATOR);
		}

		let (introspection, user_info) = if version.is_legacy() {
			(CHECK_TOKEN_ENDPOINT, USERINFO_ENDPOINT)
		} else {
			(INTROSPECT_ENDPOINT, OIDC_USERINFO_ENDPOINT)
		};

		Ok(Self {
			host,
			port,
			introspection: with_path(&server, &format!("{base}{security_domain}{introspection}")),
			user_info: with_path(&server, &format!("{base}{security_domain}{user_info}")),
		})
	}

	/// Path component of the introspection endpoint.
	pub fn introspection_path(&self) -> &str {
		self.introspection.path()
	}

	/// Path component of the userinfo endpoint.
	pub fn user_info_path(&self) -> &str {
		self.user_info.path()
	}
}

/// Parses and checks the Access Management server URL.
pub fn parse_server_url(server_url: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(server_url.trim())
		.map_err(|source| ConfigError::InvalidServerUrl { url: server_url.to_owned(), source })?;

	match url.scheme() {
		"http" | "https" => {},
		scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
	}

	if url.host_str().is_none_or(str::is_empty) {
		return Err(ConfigError::MissingHost { url: server_url.to_owned() });
	}

	Ok(url)
}

/// Authorization server identifier advertised in protected-resource metadata.
///
/// Joins `server_url`, `security_domain`, and `oidc` with exactly one separator at each join
/// point no matter which side already carries one, and strips trailing separators. An explicit
/// default port (`:443` for https) is normalized away; any other port is kept.
pub fn authorization_server(
	server_url: &str,
	security_domain: &str,
) -> Result<String, ConfigError> {
	let raw =
		format!("{server_url}{PATH_SEPARATOR}{security_domain}{PATH_SEPARATOR}{OIDC_SEGMENT}");
	let mut url = parse_server_url(&raw)?;
	let segments = url
		.path_segments()
		.map(|segments| {
			segments.filter(|segment| !segment.is_empty()).collect::<Vec<_>>().join("/")
		})
		.unwrap_or_default();

	url.set_path(&format!("{PATH_SEPARATOR}{segments}"));

	Ok(url.as_str().trim_end_matches(PATH_SEPARATOR).to_owned())
}

fn with_path(server: &Url, path: &str) -> Url {
	let mut url = server.clone();

	url.set_path(path);
	url.set_query(None);
	url.set_fragment(None);

	url
}

fn default_port(scheme: &str) -> u16 {
	if scheme == "https" { 443 } else { 80 }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn resolve(server_url: &str, version: AmVersion) -> AmEndpoints {
		AmEndpoints::resolve(server_url, "domain", version).expect("Endpoints should resolve.")
	}

	#[test]
	fn legacy_layout_uses_check_token_and_userinfo() {
		let endpoints = resolve("http://localhost:8092", AmVersion::V1);

		assert_eq!(endpoints.introspection_path(), "/domain/oauth/check_token");
		assert_eq!(endpoints.user_info_path(), "/domain/userinfo");
		assert_eq!(
			endpoints.introspection.as_str(),
			"http://localhost:8092/domain/oauth/check_token"
		);
	}

	#[test]
	fn current_layout_uses_introspect_and_oidc_userinfo() {
		for version in [AmVersion::V2, AmVersion::V3] {
			let endpoints = resolve("http://localhost:8092", version);

			assert_eq!(endpoints.introspection_path(), "/domain/oauth/introspect");
			assert_eq!(endpoints.user_info_path(), "/domain/oidc/userinfo");
		}
	}

	#[test]
	fn sub_paths_get_exactly_one_separator() {
		for server_url in ["http://localhost:8092/test", "http://localhost:8092/test/"] {
			let endpoints = resolve(server_url, AmVersion::V1);

			assert_eq!(endpoints.user_info_path(), "/test/domain/userinfo");
			assert_eq!(endpoints.introspection_path(), "/test/domain/oauth/check_token");
		}
	}

	#[test]
	fn ports_default_from_the_scheme() {
		assert_eq!(resolve("https://am.gateway.dev", AmVersion::V2).port, 443);
		assert_eq!(resolve("http://am.gateway.dev", AmVersion::V2).port, 80);

		let endpoints = resolve("http://am_internal.gateway.dev:8092", AmVersion::V2);

		assert_eq!(endpoints.port, 8092);
		assert_eq!(endpoints.host, "am_internal.gateway.dev");
	}

	#[test]
	fn resolution_is_idempotent() {
		assert_eq!(
			resolve("http://localhost:8092/am", AmVersion::V2),
			resolve("http://localhost:8092/am", AmVersion::V2)
		);
	}

	#[test]
	fn query_and_fragment_are_dropped() {
		let endpoints = resolve("http://localhost:8092/am?tenant=1#frag", AmVersion::V1);

		assert_eq!(endpoints.user_info.as_str(), "http://localhost:8092/am/domain/userinfo");
	}

	#[test]
	fn malformed_server_urls_fail() {
		assert!(matches!(
			AmEndpoints::resolve("localhost:8092", "domain", AmVersion::V1),
			Err(ConfigError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			AmEndpoints::resolve("http://", "domain", AmVersion::V1),
			Err(ConfigError::InvalidServerUrl { .. })
		));
	}

	#[test]
	fn authorization_server_collapses_separators() {
		for (server_url, security_domain) in [
			("https://am.gateway.dev", "test"),
			("https://am.gateway.dev/", "test"),
			("https://am.gateway.dev", "/test"),
			("https://am.gateway.dev/", "/test/"),
		] {
			assert_eq!(
				authorization_server(server_url, security_domain)
					.expect("Authorization server should resolve."),
				"https://am.gateway.dev/test/oidc"
			);
		}
	}

	#[test]
	fn authorization_server_elides_only_the_scheme_default_port() {
		assert_eq!(
			authorization_server("https://am.gateway.dev:443/", "test")
				.expect("Authorization server should resolve."),
			"https://am.gateway.dev/test/oidc"
		);
		assert_eq!(
			authorization_server("https://am.gateway.dev:8443/", "test")
				.expect("Authorization server should resolve."),
			"https://am.gateway.dev:8443/test/oidc"
		);
	}
}
