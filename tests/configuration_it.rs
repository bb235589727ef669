mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use oauth2_am_resource::{
	config::{AmVersion, HttpProtocolVersion, ProxyType, ResourceConfiguration},
	error::{ConfigError, Error},
	resource::ReqwestAmResource,
	response::FailureKind,
};

const PLUGIN_DOCUMENT: &str = r#"{
	"serverURL": "https://am.gateway.dev/auth",
	"securityDomain": "my-domain",
	"clientId": "gravitee",
	"clientSecret": "secret",
	"version": "V3_X",
	"userClaim": "email",
	"http": {
		"connectTimeout": 5000,
		"readTimeout": 15000,
		"maxConcurrentConnections": 20,
		"version": "HTTP_2"
	},
	"proxy": {
		"enabled": true,
		"host": "proxy.internal",
		"port": 3128,
		"type": "HTTP"
	},
	"ssl": {
		"trustAll": false,
		"hostnameVerifier": true
	}
}"#;

#[test]
fn plugin_document_configures_every_option_bag() {
	let configuration =
		ResourceConfiguration::from_json(PLUGIN_DOCUMENT).expect("Plugin document should parse.");

	assert_eq!(configuration.version, AmVersion::V3);
	assert_eq!(configuration.client_id.expose(), "gravitee");
	assert_eq!(configuration.user_claim.as_deref(), Some("email"));
	assert_eq!(configuration.http.connect_timeout, 5000);
	assert_eq!(configuration.http.max_concurrent_connections, 20);
	assert_eq!(configuration.http.version, HttpProtocolVersion::Http2);
	assert!(configuration.http.keep_alive, "Unset fields keep their defaults.");
	assert_eq!(configuration.proxy.kind, ProxyType::Http);
	assert_eq!(configuration.proxy.host.as_deref(), Some("proxy.internal"));
	assert!(!configuration.ssl.trust_all);

	let resource = ReqwestAmResource::new(configuration)
		.expect("Resource should start from the plugin document.");

	assert_eq!(resource.user_claim(), Some("email"));
	assert_eq!(
		resource.endpoints().introspection.as_str(),
		"https://am.gateway.dev/auth/my-domain/oauth/introspect"
	);
	assert_eq!(
		resource.endpoints().user_info.as_str(),
		"https://am.gateway.dev/auth/my-domain/oidc/userinfo"
	);
}

#[test]
fn secrets_never_reach_debug_output() {
	let configuration =
		ResourceConfiguration::from_json(PLUGIN_DOCUMENT).expect("Plugin document should parse.");
	let rendered = format!("{:?}", ReqwestAmResource::new(configuration));

	assert!(!rendered.contains("\"secret\""));
	assert!(!rendered.contains(BASIC_AUTHORIZATION));
}

#[test]
fn invalid_server_urls_fail_at_start() {
	for server_url in ["", "am.gateway.dev", "ftp://am.gateway.dev"] {
		let mut configuration = configuration("https://am.gateway.dev", AmVersion::V1);

		configuration.server_url = server_url.into();

		assert!(
			matches!(ReqwestAmResource::new(configuration), Err(Error::Config(_))),
			"{server_url:?} should be rejected."
		);
	}
}

#[test]
fn socks4_proxies_are_rejected() {
	let document = r#"{
		"serverURL": "https://am.gateway.dev",
		"securityDomain": "domain",
		"proxy": {"enabled": true, "host": "proxy.internal", "type": "SOCKS4"}
	}"#;

	assert!(matches!(
		ResourceConfiguration::from_json(document),
		Err(ConfigError::UnsupportedProxyType { .. })
	));
}

#[test]
fn metadata_normalizes_server_slashes() {
	for (server_url, domain) in [
		("https://am.gateway.dev", "test"),
		("https://am.gateway.dev/", "test"),
		("https://am.gateway.dev", "/test"),
		("https://am.gateway.dev/", "/test/"),
	] {
		let configuration = ResourceConfiguration::builder(server_url, domain)
			.build()
			.expect("Configuration should build.");
		let resource = ReqwestAmResource::new(configuration).expect("Resource should start.");
		let metadata = resource.protected_resource_metadata("https://api.gateway.dev/echo");

		assert_eq!(
			metadata.authorization_servers,
			["https://am.gateway.dev/test/oidc"],
			"{server_url} + {domain} should normalize."
		);
	}
}

#[tokio::test]
async fn minimal_document_starts_a_working_resource() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/domain/userinfo");
			then.status(200).body("{\"sub\": \"john\"}");
		})
		.await;
	let document = format!(
		r#"{{"serverURL": "{}", "securityDomain": "domain"}}"#,
		server.base_url()
	);
	let configuration =
		ResourceConfiguration::from_json(&document).expect("Minimal document should parse.");

	assert!(configuration.ssl.trust_all);

	let result = ReqwestAmResource::new(configuration)
		.expect("Resource should start.")
		.user_info(ACCESS_TOKEN)
		.await;

	assert!(result.is_success());

	mock.assert_async().await;
}

#[tokio::test]
async fn verified_tls_refuses_self_signed_servers() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/domain/oauth/check_token");
			then.status(200).body("{}");
		})
		.await;
	let configuration = ResourceConfiguration::builder(server.base_url(), SECURITY_DOMAIN)
		.client_credentials(CLIENT_ID, CLIENT_SECRET)
		.build()
		.expect("Configuration should build.");

	assert!(server.base_url().starts_with("https://"));
	assert!(configuration.ssl.hostname_verifier && !configuration.ssl.trust_all);

	let result = ReqwestAmResource::new(configuration)
		.expect("Resource should start.")
		.introspect(ACCESS_TOKEN)
		.await;

	assert_eq!(result.failure, Some(FailureKind::Transport));

	mock.assert_calls_async(0).await;
}
