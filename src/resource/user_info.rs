// std
use std::time::Instant;
// crates.io
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{
		ACCEPT, APPLICATION_JSON, AUTHORIZATION, AmHttpClient, AmRequest, REQUEST_ID, USER_AGENT,
	},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	resource::OAuth2AmResource,
	response::{self, UserInfoResult},
};

impl<C> OAuth2AmResource<C>
where
	C: ?Sized + AmHttpClient,
{
	/// Fetches the identity bound to `access_token` from the userinfo endpoint.
	///
	/// No deadline is set on the request; the client's own timeouts apply.
	pub async fn user_info(&self, access_token: &str) -> UserInfoResult {
		const KIND: OperationKind = OperationKind::UserInfo;

		let span = OperationSpan::new(KIND, "user_info");
		let started = Instant::now();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				tracing::debug!(endpoint = %self.endpoints.user_info, "Get userinfo.");

				let outcome = async {
					let client = self.http_client()?;
					let request = self.user_info_request(access_token)?;

					client.execute(request).await
				}
				.await;

				response::translate_user_info(outcome)
			})
			.await;

		obs::record_operation_outcome(KIND, result.outcome());
		obs::record_operation_duration(KIND, result.outcome(), started.elapsed());

		result
	}

	fn user_info_request(&self, access_token: &str) -> Result<AmRequest, TransportError> {
		AmRequest::get(self.endpoints.user_info.clone())
			.header(&USER_AGENT, &self.user_agent)?
			.header(&REQUEST_ID, Uuid::new_v4().to_string())?
			.header(&AUTHORIZATION, format!("Bearer {access_token}"))?
			.header(&ACCEPT, APPLICATION_JSON)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::{AmVersion, ResourceConfiguration},
		http::{AmResponse, HttpFuture, Method},
		response::FailureKind,
	};

	struct NoopClient;
	impl AmHttpClient for NoopClient {
		fn execute(&self, _request: AmRequest) -> HttpFuture<'_> {
			Box::pin(async { Ok(AmResponse::new(200, "")) })
		}
	}

	#[test]
	fn request_uses_bearer_authorization_without_deadline() {
		let configuration = ResourceConfiguration::builder("http://localhost:8092/test", "domain")
			.build()
			.expect("Fixture configuration should build.");
		let resource = OAuth2AmResource::<NoopClient>::start(configuration, NoopClient)
			.expect("Resource should start.");
		let request = resource
			.user_info_request("xxxx-xxxx-xxxx-xxxx")
			.expect("Userinfo request should build.");

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.url.path(), "/test/domain/userinfo");
		assert_eq!(request.header_value(&AUTHORIZATION), Some("Bearer xxxx-xxxx-xxxx-xxxx"));
		assert_eq!(request.header_value(&ACCEPT), Some(APPLICATION_JSON));
		assert_eq!(request.body, None);
		assert_eq!(request.timeout, None);
		assert!(request.header_value(&REQUEST_ID).is_some());
		assert_eq!(resource.configuration().version, AmVersion::V1);
	}

	#[tokio::test]
	async fn tokens_that_cannot_travel_in_a_header_fail_locally() {
		let configuration = ResourceConfiguration::builder("http://localhost:8092", "domain")
			.build()
			.expect("Fixture configuration should build.");
		let resource = OAuth2AmResource::<NoopClient>::start(configuration, NoopClient)
			.expect("Resource should start.");
		let result = resource.user_info("abc\r\nx-injected: yes").await;

		assert!(!result.is_success());
		assert_eq!(result.failure, Some(FailureKind::Transport));
		assert_eq!(result.payload, "Header `authorization` has an invalid value.");
	}
}
