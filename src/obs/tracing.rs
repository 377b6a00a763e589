// std
use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	manager::Backend,
	obs::{self, BridgeExit, Operation, OperationOutcome},
};

/// Future returned by [`OperationSpan::instrument`]; a passthrough when tracing is disabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; a passthrough when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// One adapter operation against one backend.
///
/// Carries the labels shared by the `remote_config.operation` span and the outcome counter, so
/// a call site records every outcome through the span that covers it.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	operation: Operation,
	backend: Backend,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens the span for `operation` against `backend`.
	pub fn new(operation: Operation, backend: Backend) -> Self {
		Self {
			operation,
			backend,
			#[cfg(feature = "tracing")]
			span: tracing::info_span!(
				"remote_config.operation",
				operation = operation.as_str(),
				backend = backend.as_str()
			),
		}
	}

	/// Operation this span covers.
	pub fn operation(&self) -> Operation {
		self.operation
	}

	/// Backend selected for the operation.
	pub fn backend(&self) -> Backend {
		self.backend
	}

	/// Counts `outcome` for this operation and backend.
	pub fn record(&self, outcome: OperationOutcome) {
		obs::record_operation_outcome(self.operation, self.backend, outcome);
	}

	/// Enters the span until the returned guard drops.
	pub fn enter(&self) -> OperationSpanGuard<'_> {
		OperationSpanGuard {
			#[cfg(feature = "tracing")]
			_entered: self.span.enter(),
			_span: PhantomData,
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Guard returned by [`OperationSpan::enter`].
pub struct OperationSpanGuard<'a> {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::Entered<'a>,
	_span: PhantomData<&'a OperationSpan>,
}
impl Debug for OperationSpanGuard<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

/// Emits a warning when a watch channel could not be created.
pub fn trace_watch_unavailable(error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %error, "watch channel unavailable");

	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

/// Emits a debug event when the watch bridge for `backend` stops.
pub fn trace_bridge_exit(backend: Backend, exit: BridgeExit) {
	#[cfg(feature = "tracing")]
	tracing::debug!(backend = backend.as_str(), reason = exit.as_str(), "watch bridge stopped");

	#[cfg(not(feature = "tracing"))]
	let _ = (backend, exit);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn span_keeps_operation_labels() {
		let span = OperationSpan::new(Operation::WatchChannel, Backend::EtcdV3);
		let _guard = span.enter();

		assert_eq!(span.operation(), Operation::WatchChannel);
		assert_eq!(span.backend(), Backend::EtcdV3);

		span.record(OperationOutcome::Attempt);
		trace_bridge_exit(span.backend(), BridgeExit::Quit);
	}

	#[tokio::test]
	async fn instrument_passes_output_through() {
		let span = OperationSpan::new(Operation::Get, Backend::Consul);

		assert_eq!(span.instrument(async { 42 }).await, 42);
	}
}
