//! Counters and latency histograms for resource operations.
//!
//! Without the `metrics` feature every recorder compiles to nothing.

// self
use crate::{
	_prelude::*,
	obs::{OperationKind, OperationOutcome},
};

#[cfg(feature = "metrics")]
const OPERATION_TOTAL: &str = "oauth2_am_resource_operation_total";
#[cfg(feature = "metrics")]
const OPERATION_DURATION: &str = "oauth2_am_resource_operation_duration_seconds";

/// Counts one operation outcome, labeled by `operation` and `outcome`.
#[cfg(feature = "metrics")]
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	metrics::counter!(
		OPERATION_TOTAL,
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
}

/// Counts one operation outcome, labeled by `operation` and `outcome`.
#[cfg(not(feature = "metrics"))]
pub fn record_operation_outcome(_kind: OperationKind, _outcome: OperationOutcome) {}

/// Records how long a finished operation took, end to end.
///
/// `outcome` is expected to be terminal; attempts are not timed.
#[cfg(feature = "metrics")]
pub fn record_operation_duration(
	kind: OperationKind,
	outcome: OperationOutcome,
	elapsed: Duration,
) {
	metrics::histogram!(
		OPERATION_DURATION,
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.record(elapsed.as_secs_f64());
}

/// Records how long a finished operation took, end to end.
#[cfg(not(feature = "metrics"))]
pub fn record_operation_duration(
	_kind: OperationKind,
	_outcome: OperationOutcome,
	_elapsed: Duration,
) {
}
