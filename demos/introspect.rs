//! Demonstrates starting the resource against a mocked Access Management server, introspecting an
//! access token, and reading the matching userinfo through the gateway-facing trait.

// std
use std::sync::Arc;
// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
// self
use oauth2_am_resource::{
	config::{AmVersion, ResourceConfiguration, SslOptions},
	resource::{OAuth2Resource, ReqwestAmResource},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let introspect_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/demo/oauth/introspect").body("token=demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"active\":true,\"client_id\":\"demo-client\",\"sub\":\"demo-user\"}");
		})
		.await;
	let user_info_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/demo/oidc/userinfo")
				.header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"sub\":\"demo-user\",\"email\":\"demo@gateway.dev\"}");
		})
		.await;
	let configuration = ResourceConfiguration::builder(server.base_url(), "demo")
		.client_credentials("demo-client", "super-secret")
		.version(AmVersion::V2)
		.user_claim("email")
		// The mock server presents a self-signed certificate.
		.ssl_options(SslOptions::legacy())
		.build()?;
	let resource: Arc<dyn OAuth2Resource> = Arc::new(ReqwestAmResource::new(configuration)?);
	let introspection = resource.introspect("demo-access").await;

	if !introspection.is_success() {
		return Err(eyre!("Introspection failed: {}.", introspection.payload));
	}

	println!("Introspection payload: {}.", introspection.payload);

	let user_info = resource.user_info("demo-access").await;

	println!("Userinfo payload: {}.", user_info.payload);
	println!("User claim: {:?}.", resource.user_claim());

	let metadata = resource.protected_resource_metadata("https://api.gateway.dev/demo");

	println!("Protected resource metadata: {}.", serde_json::to_string(&metadata)?);

	introspect_mock.assert_async().await;
	user_info_mock.assert_async().await;

	Ok(())
}
