//! OAuth 2.0 protected-resource metadata (RFC 9728) advertised by the gateway.

// self
use crate::_prelude::*;

/// Metadata describing which authorization server protects a gateway resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedResourceMetadata {
	/// Identifier of the protected resource, echoed unchanged.
	#[serde(rename = "resource")]
	pub protected_resource_uri: String,
	/// Authorization servers able to issue tokens for the resource.
	pub authorization_servers: Vec<String>,
	/// Scopes the resource understands; never advertised by this resource.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scopes_supported: Option<Vec<String>>,
}
impl ProtectedResourceMetadata {
	/// Creates metadata pointing at a single authorization server.
	pub fn new(
		protected_resource_uri: impl Into<String>,
		authorization_server: impl Into<String>,
	) -> Self {
		Self {
			protected_resource_uri: protected_resource_uri.into(),
			authorization_servers: vec![authorization_server.into()],
			scopes_supported: None,
		}
	}
}
