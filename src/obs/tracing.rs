// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::{_prelude::*, obs::OperationKind};

/// Span wrapping one resource operation.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	span: Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		let span =
			tracing::info_span!("oauth2_am_resource.operation", operation = kind.as_str(), stage);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
