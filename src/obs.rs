//! Optional observability helpers for adapter operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `remote_config.operation` with the
//!   `operation` and `backend` fields, plus events when a watch channel cannot be created or a
//!   bridge shuts down.
//! - Enable `metrics` to increment [`OPERATION_COUNTER`] for every attempt/success/failure,
//!   labeled by `operation`, `backend` and `outcome`, and [`BRIDGE_EXIT_COUNTER`] whenever a
//!   watch bridge stops, labeled by `backend` and `reason`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Adapter entry points observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// One-shot fetch.
	Get,
	/// Watch entry point (one-shot fetch).
	Watch,
	/// Bridged watch channel.
	WatchChannel,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Get => "get",
			Operation::Watch => "watch",
			Operation::WatchChannel => "watch_channel",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an adapter operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why a watch bridge stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BridgeExit {
	/// The caller sent (or dropped) the quit handle.
	Quit,
	/// The caller dropped the response receiver.
	ConsumerGone,
}
impl BridgeExit {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			BridgeExit::Quit => "quit",
			BridgeExit::ConsumerGone => "consumer_gone",
		}
	}
}
