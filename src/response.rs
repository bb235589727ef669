//! Operation results and the translation of Access Management answers into them.
//!
//! Every operation resolves to a result value, never to an `Err`: transport failures carry the
//! transport error text as payload, while protocol failures (unexpected status, inactive or
//! malformed introspection answers) carry a fixed, user-facing payload. The upstream status and
//! body are only written to the log.

// self
use crate::{
	_prelude::*,
	config::AmVersion,
	error::{ProtocolError, TransportError},
	http::AmResponse,
	obs::OperationOutcome,
};

/// Payload returned when introspection is rejected.
pub const INTROSPECTION_FAILURE_MESSAGE: &str = "An error occurs while checking access token";
/// Payload returned when a userinfo lookup is rejected.
pub const USER_INFO_FAILURE_MESSAGE: &str =
	"An error occurs while getting userinfo from access token";
/// Payload returned when a V2/V3 server reports an inactive token.
pub const INVALID_ACCESS_TOKEN_PAYLOAD: &str = "{\"error\": \"Invalid Access Token\"}";

macro_rules! def_result {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
		pub struct $name {
			/// Whether the operation succeeded.
			pub success: bool,
			/// Raw response body on success, or an error message on failure.
			pub payload: String,
			/// Failure classification; `None` on success.
			#[serde(default, skip_serializing_if = "Option::is_none")]
			pub failure: Option<FailureKind>,
		}
		impl $name {
			/// Successful result carrying the upstream body.
			pub fn success(payload: impl Into<String>) -> Self {
				Self { success: true, payload: payload.into(), failure: None }
			}

			/// Failed result carrying `payload`.
			pub fn failure(kind: FailureKind, payload: impl Into<String>) -> Self {
				Self { success: false, payload: payload.into(), failure: Some(kind) }
			}

			/// Failed result carrying the transport error text.
			pub fn transport_failure(error: &TransportError) -> Self {
				Self::failure(FailureKind::Transport, error.to_string())
			}

			/// Returns `true` when the operation succeeded.
			pub fn is_success(&self) -> bool {
				self.success
			}

			/// Outcome label for observability.
			pub fn outcome(&self) -> OperationOutcome {
				if self.success { OperationOutcome::Success } else { OperationOutcome::Failure }
			}
		}
	};
}

/// Why an operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
	/// The server could not be reached or the response could not be read.
	Transport,
	/// The server answered with a non-200 status.
	Rejected,
	/// The server reported the token as inactive.
	Inactive,
	/// The server answered 200 with a body the resource cannot read.
	Malformed,
}

def_result! { IntrospectionResult, "Outcome of a token introspection." }
def_result! { UserInfoResult, "Outcome of a userinfo lookup." }

#[derive(Deserialize)]
struct IntrospectionBody {
	// `null` reads as absent.
	#[serde(default)]
	active: Option<bool>,
}

/// Maps an introspection exchange into an [`IntrospectionResult`].
pub fn translate_introspection(
	version: AmVersion,
	outcome: Result<AmResponse, TransportError>,
) -> IntrospectionResult {
	let response = match outcome {
		Ok(response) => response,
		Err(e) => {
			tracing::error!(error = %e, "{INTROSPECTION_FAILURE_MESSAGE}.");

			return IntrospectionResult::transport_failure(&e);
		},
	};

	tracing::debug!(
		status = response.status,
		"Access Management introspection endpoint answered."
	);

	if !response.is_ok() {
		let e =
			ProtocolError::UnexpectedStatus { endpoint: "introspection", status: response.status };

		tracing::error!(error = %e, body = %response.body, "{INTROSPECTION_FAILURE_MESSAGE}.");

		return IntrospectionResult::failure(FailureKind::Rejected, INTROSPECTION_FAILURE_MESSAGE);
	}
	// Legacy servers only answer 200 for valid tokens and the body is opaque.
	if version.is_legacy() {
		return IntrospectionResult::success(response.body);
	}

	match read_active(&response.body) {
		Ok(true) => IntrospectionResult::success(response.body),
		Ok(false) =>
			IntrospectionResult::failure(FailureKind::Inactive, INVALID_ACCESS_TOKEN_PAYLOAD),
		Err(e) => {
			tracing::error!(error = %e, body = %response.body, "{INTROSPECTION_FAILURE_MESSAGE}.");

			IntrospectionResult::failure(FailureKind::Malformed, INTROSPECTION_FAILURE_MESSAGE)
		},
	}
}

/// Maps a userinfo exchange into a [`UserInfoResult`].
pub fn translate_user_info(outcome: Result<AmResponse, TransportError>) -> UserInfoResult {
	let response = match outcome {
		Ok(response) => response,
		Err(e) => {
			tracing::error!(error = %e, "{USER_INFO_FAILURE_MESSAGE}.");

			return UserInfoResult::transport_failure(&e);
		},
	};

	tracing::debug!(status = response.status, "Access Management userinfo endpoint answered.");

	if response.is_ok() {
		return UserInfoResult::success(response.body);
	}

	let e = ProtocolError::UnexpectedStatus { endpoint: "userinfo", status: response.status };

	tracing::error!(error = %e, body = %response.body, "{USER_INFO_FAILURE_MESSAGE}.");

	UserInfoResult::failure(FailureKind::Rejected, USER_INFO_FAILURE_MESSAGE)
}

fn read_active(body: &str) -> Result<bool, ProtocolError> {
	let deserializer = &mut serde_json::Deserializer::from_str(body);
	let parsed: IntrospectionBody = serde_path_to_error::deserialize(deserializer)
		.map_err(|source| ProtocolError::MalformedIntrospection { source })?;

	Ok(parsed.active.unwrap_or_default())
}
