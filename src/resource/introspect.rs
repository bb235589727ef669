//! Token introspection against the Access Management server.
//!
//! The access token is posted as a form body to the version-specific introspection endpoint,
//! authenticated with the resource's client credentials. The call carries a fixed deadline so a
//! stalled server cannot hold a gateway request forever.

// std
use std::time::Instant;
// crates.io
use url::form_urlencoded::Serializer;
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{
		ACCEPT, APPLICATION_FORM_URLENCODED, APPLICATION_JSON, AUTHORIZATION, AmHttpClient,
		AmRequest, CONTENT_TYPE, REQUEST_ID, USER_AGENT,
	},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	resource::OAuth2AmResource,
	response::{self, IntrospectionResult},
};

/// Deadline applied to every introspection call.
pub const INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(30);

impl<C> OAuth2AmResource<C>
where
	C: ?Sized + AmHttpClient,
{
	/// Checks whether `access_token` is currently active.
	///
	/// The token is forwarded as-is; its shape is never validated locally.
	pub async fn introspect(&self, access_token: &str) -> IntrospectionResult {
		const KIND: OperationKind = OperationKind::Introspect;

		let span = OperationSpan::new(KIND, "introspect");
		let started = Instant::now();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				tracing::debug!(
					endpoint = %self.endpoints.introspection,
					"Introspect access token."
				);

				let outcome = async {
					let client = self.http_client()?;
					let request = self.introspection_request(access_token)?;

					client.execute(request).await
				}
				.await;

				response::translate_introspection(self.configuration.version, outcome)
			})
			.await;

		obs::record_operation_outcome(KIND, result.outcome());
		obs::record_operation_duration(KIND, result.outcome(), started.elapsed());

		result
	}

	fn introspection_request(&self, access_token: &str) -> Result<AmRequest, TransportError> {
		let body = Serializer::new(String::new()).append_pair("token", access_token).finish();
		let request = AmRequest::post(self.endpoints.introspection.clone(), body)
			.header(&USER_AGENT, &self.user_agent)?
			.header(&REQUEST_ID, Uuid::new_v4().to_string())?
			.header(&AUTHORIZATION, self.introspection_authorization.expose())?
			.header(&ACCEPT, APPLICATION_JSON)?
			.header(&CONTENT_TYPE, APPLICATION_FORM_URLENCODED)?
			.timeout(INTROSPECTION_TIMEOUT);

		Ok(request)
	}
}
