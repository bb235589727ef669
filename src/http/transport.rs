// std
use std::ops::Deref;
// crates.io
use reqwest::{Certificate, Identity, Proxy, redirect::Policy};
// self
use crate::{
	_prelude::*,
	config::{HttpProtocolVersion, ResourceConfiguration, client},
	error::{ConfigError, TransportError},
	http::{AmHttpClient, AmRequest, AmResponse, HttpFuture},
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// `reqwest::Client` pools connections behind an `Arc`, so one instance is shared by every
/// concurrent operation of a resource.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client from the configuration's `http`, `proxy`, and `ssl` option bags.
	pub fn from_configuration(configuration: &ResourceConfiguration) -> Result<Self, ConfigError> {
		let http = &configuration.http;
		let keep_alive =
			if http.keep_alive { client::millis(http.keep_alive_timeout) } else { None };
		let mut builder = ReqwestClient::builder()
			.pool_idle_timeout(client::millis(http.idle_timeout))
			.pool_max_idle_per_host(http.max_concurrent_connections)
			.tcp_keepalive(keep_alive)
			.redirect(if http.follow_redirects { Policy::default() } else { Policy::none() });

		if let Some(timeout) = client::millis(http.connect_timeout) {
			builder = builder.connect_timeout(timeout);
		}
		if let Some(timeout) = client::millis(http.read_timeout) {
			builder = builder.read_timeout(timeout);
		}

		builder = match http.version {
			HttpProtocolVersion::Http11 => builder.http1_only(),
			HttpProtocolVersion::Http2 if !http.clear_text_upgrade =>
				builder.http2_prior_knowledge(),
			HttpProtocolVersion::Http2 => builder,
		};

		let proxy = configuration.effective_proxy();

		if !proxy.enabled {
			builder = builder.no_proxy();
		} else if proxy.is_explicit() {
			let mut explicit = Proxy::all(proxy.proxy_url()?)?;

			if let Some(username) = proxy.username.as_deref() {
				let password =
					proxy.password.as_ref().map(|secret| secret.expose()).unwrap_or_default();

				explicit = explicit.basic_auth(username, password);
			}

			builder = builder.proxy(explicit);
		}

		let ssl = &configuration.ssl;

		builder = builder
			.danger_accept_invalid_certs(ssl.trust_all)
			.danger_accept_invalid_hostnames(!ssl.hostname_verifier);

		let trust_pem = ssl.trust_store.as_ref().map(|store| store.pem()).transpose()?.flatten();
		let identity_pem = ssl.key_store.as_ref().map(|store| store.pem()).transpose()?.flatten();

		if let Some(pem) = trust_pem {
			for certificate in Certificate::from_pem_bundle(&pem)? {
				builder = builder.add_root_certificate(certificate);
			}
		}
		if let Some(pem) = identity_pem {
			builder = builder.identity(Identity::from_pem(&pem)?);
		}

		Ok(Self(builder.build()?))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AmHttpClient for ReqwestHttpClient {
	fn execute(&self, request: AmRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}
			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.text().await.map_err(TransportError::from)?;

			Ok(AmResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::{HttpClientOptions, HttpProxyOptions, KeyStore, ProxyType, SslOptions};

	fn configuration() -> ResourceConfiguration {
		ResourceConfiguration::builder("https://am.gateway.dev", "domain")
			.build()
			.expect("Fixture configuration should build.")
	}

	#[test]
	fn builds_client_from_default_options() {
		assert!(ReqwestHttpClient::from_configuration(&configuration()).is_ok());
	}

	#[test]
	fn builds_client_from_tuned_pool_and_timeouts() {
		let mut configuration = configuration();

		configuration.http = HttpClientOptions {
			connect_timeout: 0,
			read_timeout: 0,
			keep_alive: false,
			max_concurrent_connections: 1,
			follow_redirects: true,
			clear_text_upgrade: false,
			version: HttpProtocolVersion::Http2,
			..Default::default()
		};

		assert!(ReqwestHttpClient::from_configuration(&configuration).is_ok());
	}

	#[test]
	fn builds_client_with_explicit_proxy_and_legacy_trust() {
		let mut configuration = configuration();

		configuration.proxy = HttpProxyOptions {
			enabled: true,
			host: Some("proxy.internal".into()),
			username: Some("gateway".into()),
			password: Some("secret".into()),
			kind: ProxyType::Socks5,
			..Default::default()
		};
		configuration.ssl = SslOptions::legacy();

		assert!(ReqwestHttpClient::from_configuration(&configuration).is_ok());
	}

	#[test]
	fn invalid_identity_material_fails_the_build() {
		let mut configuration = configuration();

		configuration.ssl.key_store = Some(KeyStore {
			cert_content: Some("not a certificate".into()),
			key_content: Some("not a key".into()),
			..Default::default()
		});

		assert!(matches!(
			ReqwestHttpClient::from_configuration(&configuration),
			Err(ConfigError::HttpClientBuild { .. })
		));
	}
}
