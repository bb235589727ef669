#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use oauth2_am_resource::{
	config::{AmVersion, ResourceConfiguration, SslOptions},
	resource::ReqwestAmResource,
};

pub const SECURITY_DOMAIN: &str = "domain";
pub const ACCESS_TOKEN: &str = "xxxx-xxxx-xxxx-xxxx";
pub const CLIENT_ID: &str = "gravitee";
pub const CLIENT_SECRET: &str = "secret";
/// `Basic base64("gravitee:secret")`.
pub const BASIC_AUTHORIZATION: &str = "Basic Z3Jhdml0ZWU6c2VjcmV0";

/// Configuration trusting the mock server's self-signed certificate.
pub fn configuration(server_url: &str, version: AmVersion) -> ResourceConfiguration {
	ResourceConfiguration::builder(server_url, SECURITY_DOMAIN)
		.client_credentials(CLIENT_ID, CLIENT_SECRET)
		.version(version)
		.ssl_options(SslOptions::legacy())
		.build()
		.expect("Test configuration should build.")
}

pub fn resource(server: &MockServer, version: AmVersion) -> ReqwestAmResource {
	resource_at(&server.base_url(), version)
}

pub fn resource_at(server_url: &str, version: AmVersion) -> ReqwestAmResource {
	ReqwestAmResource::new(configuration(server_url, version))
		.expect("Resource should start against the mock server.")
}
