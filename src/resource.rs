//! The Access Management backed OAuth 2.0 resource.

mod introspect;
mod user_info;

// crates.io
use tracing::{info, warn};
// self
use crate::{
	_prelude::*,
	config::{ResourceConfiguration, Secret},
	endpoint::{self, AmEndpoints},
	error::TransportError,
	http::AmHttpClient,
	metadata::ProtectedResourceMetadata,
	response::{IntrospectionResult, UserInfoResult},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Default `User-Agent` sent to the Access Management server.
pub const DEFAULT_USER_AGENT: &str =
	concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[cfg(feature = "reqwest")]
/// Resource specialized for the crate's default reqwest transport.
pub type ReqwestAmResource = OAuth2AmResource<ReqwestHttpClient>;

/// Boxed future returned by [`OAuth2Resource`] operations.
pub type ResourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Gateway-facing contract implemented by OAuth 2.0 resources.
///
/// Policies only see this trait, so they can hold any resource behind `Arc<dyn
/// OAuth2Resource>`. Each returned future resolves exactly once with the final result, whether
/// the call succeeded, was rejected, or never reached the server.
pub trait OAuth2Resource
where
	Self: Send + Sync,
{
	/// Checks whether `access_token` is currently active.
	fn introspect<'a>(&'a self, access_token: &'a str) -> ResourceFuture<'a, IntrospectionResult>;

	/// Fetches the identity bound to `access_token`.
	fn user_info<'a>(&'a self, access_token: &'a str) -> ResourceFuture<'a, UserInfoResult>;

	/// Claim used to identify the end user, when configured.
	fn user_claim(&self) -> Option<&str>;

	/// Metadata advertising the authorization server protecting `protected_resource_uri`.
	fn protected_resource_metadata(
		&self,
		protected_resource_uri: &str,
	) -> ProtectedResourceMetadata;
}

/// OAuth 2.0 resource delegating to an Access Management server.
///
/// The resource owns the configuration, the endpoints resolved from it, and the shared HTTP
/// client for its start/stop lifecycle. Operations only read that state, so one instance can
/// serve any number of concurrent calls.
pub struct OAuth2AmResource<C>
where
	C: ?Sized + AmHttpClient,
{
	configuration: ResourceConfiguration,
	endpoints: AmEndpoints,
	authorization_server: String,
	introspection_authorization: Secret,
	user_agent: String,
	http_client: RwLock<Option<Arc<C>>>,
}
impl<C> OAuth2AmResource<C>
where
	C: ?Sized + AmHttpClient,
{
	/// Starts a resource that reuses the caller-provided HTTP client.
	///
	/// Fails when the configuration cannot produce valid endpoints.
	pub fn start(
		configuration: ResourceConfiguration,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		info!(
			server_url = %configuration.server_url,
			security_domain = %configuration.security_domain,
			version = %configuration.version,
			"Starting an OAuth2 resource backed by an Access Management server."
		);

		configuration.validate()?;

		let endpoints = AmEndpoints::from_configuration(&configuration)?;
		let authorization_server = endpoint::authorization_server(
			&configuration.server_url,
			&configuration.security_domain,
		)?;
		let introspection_authorization = configuration.basic_authorization();

		Ok(Self {
			configuration,
			endpoints,
			authorization_server,
			introspection_authorization,
			user_agent: DEFAULT_USER_AGENT.into(),
			http_client: RwLock::new(Some(http_client.into())),
		})
	}

	/// Overrides the `User-Agent` sent with every call.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Releases the HTTP client.
	///
	/// Stopping twice only logs a warning. Operations issued afterwards resolve to a transport
	/// failure.
	pub fn stop(&self) {
		match self.http_client.write().take() {
			Some(_) => info!(
				server_url = %self.configuration.server_url,
				"Stopped OAuth2 resource and released its HTTP client."
			),
			None => warn!("{}", TransportError::Closed),
		}
	}

	/// Returns `true` until [`stop`](Self::stop) is called.
	pub fn is_running(&self) -> bool {
		self.http_client.read().is_some()
	}

	/// Configuration the resource was started with.
	pub fn configuration(&self) -> &ResourceConfiguration {
		&self.configuration
	}

	/// Endpoints resolved at start time.
	pub fn endpoints(&self) -> &AmEndpoints {
		&self.endpoints
	}

	/// `User-Agent` sent with every call.
	pub fn user_agent(&self) -> &str {
		&self.user_agent
	}

	/// Claim used to identify the end user, when configured.
	pub fn user_claim(&self) -> Option<&str> {
		self.configuration.user_claim.as_deref()
	}

	/// Metadata advertising `{serverURL}/{securityDomain}/oidc` as the authorization server.
	pub fn protected_resource_metadata(
		&self,
		protected_resource_uri: &str,
	) -> ProtectedResourceMetadata {
		ProtectedResourceMetadata::new(protected_resource_uri, self.authorization_server.as_str())
	}

	fn http_client(&self) -> Result<Arc<C>, TransportError> {
		self.http_client.read().clone().ok_or(TransportError::Closed)
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2AmResource<ReqwestHttpClient> {
	/// Starts a resource with a reqwest client built from the configuration's option bags.
	pub fn new(configuration: ResourceConfiguration) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_configuration(&configuration)?;

		Self::start(configuration, http_client)
	}
}
impl<C> OAuth2Resource for OAuth2AmResource<C>
where
	C: ?Sized + AmHttpClient,
{
	fn introspect<'a>(&'a self, access_token: &'a str) -> ResourceFuture<'a, IntrospectionResult> {
		Box::pin(OAuth2AmResource::introspect(self, access_token))
	}

	fn user_info<'a>(&'a self, access_token: &'a str) -> ResourceFuture<'a, UserInfoResult> {
		Box::pin(OAuth2AmResource::user_info(self, access_token))
	}

	fn user_claim(&self) -> Option<&str> {
		OAuth2AmResource::user_claim(self)
	}

	fn protected_resource_metadata(
		&self,
		protected_resource_uri: &str,
	) -> ProtectedResourceMetadata {
		OAuth2AmResource::protected_resource_metadata(self, protected_resource_uri)
	}
}
impl<C> Debug for OAuth2AmResource<C>
where
	C: ?Sized + AmHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2AmResource")
			.field("configuration", &self.configuration)
			.field("endpoints", &self.endpoints)
			.field("running", &self.is_running())
			.finish()
	}
}
