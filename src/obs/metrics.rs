// self
use crate::{
	manager::Backend,
	obs::{BridgeExit, Operation, OperationOutcome},
};

/// Counter incremented for every adapter operation attempt and its outcome.
pub const OPERATION_COUNTER: &str = "remote_config_operation_total";
/// Counter incremented whenever a watch bridge stops.
pub const BRIDGE_EXIT_COUNTER: &str = "remote_config_bridge_exit_total";

type Labels<const N: usize> = [(&'static str, &'static str); N];

/// Records an operation outcome against `backend` via the global metrics recorder.
pub fn record_operation_outcome(operation: Operation, backend: Backend, outcome: OperationOutcome) {
	let labels = operation_labels(operation, backend, outcome);

	#[cfg(feature = "metrics")]
	metrics::counter!(OPERATION_COUNTER, &labels).increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = labels;
}

/// Records why a watch bridge for `backend` stopped.
pub fn record_bridge_exit(backend: Backend, exit: BridgeExit) {
	let labels = bridge_exit_labels(backend, exit);

	#[cfg(feature = "metrics")]
	metrics::counter!(BRIDGE_EXIT_COUNTER, &labels).increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = labels;
}

fn operation_labels(
	operation: Operation,
	backend: Backend,
	outcome: OperationOutcome,
) -> Labels<3> {
	[
		("operation", operation.as_str()),
		("backend", backend.as_str()),
		("outcome", outcome.as_str()),
	]
}

fn bridge_exit_labels(backend: Backend, exit: BridgeExit) -> Labels<2> {
	[("backend", backend.as_str()), ("reason", exit.as_str())]
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_carry_backend() {
		assert_eq!(
			operation_labels(Operation::Get, Backend::EtcdV3, OperationOutcome::Failure),
			[("operation", "get"), ("backend", "etcd3"), ("outcome", "failure")],
		);
		assert_eq!(
			bridge_exit_labels(Backend::Nats, BridgeExit::ConsumerGone),
			[("backend", "nats"), ("reason", "consumer_gone")],
		);
	}

	#[test]
	fn recording_without_recorder_is_silent() {
		record_operation_outcome(
			Operation::WatchChannel,
			Backend::Consul,
			OperationOutcome::Attempt,
		);
		record_bridge_exit(Backend::Firestore, BridgeExit::Quit);
	}

	#[cfg(feature = "metrics")]
	mod recorded {
		// std
		use std::sync::atomic::{AtomicU64, Ordering};
		// crates.io
		use metrics::{
			Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
		};
		// self
		use super::*;
		use crate::_prelude::*;

		#[derive(Default)]
		struct CountingRecorder {
			counters: Mutex<Vec<(Key, Arc<AtomicU64>)>>,
		}
		impl CountingRecorder {
			fn total(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
				self.counters
					.lock()
					.iter()
					.filter(|(key, _)| {
						key.name() == name
							&& key.labels().map(|l| (l.key(), l.value())).eq(labels.iter().copied())
					})
					.map(|(_, value)| value.load(Ordering::Relaxed))
					.sum()
			}
		}
		impl Recorder for CountingRecorder {
			fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
				let value = Arc::new(AtomicU64::new(0));

				self.counters.lock().push((key.clone(), value.clone()));

				Counter::from_arc(value)
			}

			fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
				Gauge::noop()
			}

			fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
				Histogram::noop()
			}
		}

		#[test]
		fn bridge_exit_counter_is_labelled_by_reason() {
			let recorder = CountingRecorder::default();

			metrics::with_local_recorder(&recorder, || {
				record_bridge_exit(Backend::Nats, BridgeExit::ConsumerGone);
				record_bridge_exit(Backend::Nats, BridgeExit::ConsumerGone);
				record_bridge_exit(Backend::Nats, BridgeExit::Quit);
			});

			let consumer_gone = [("backend", "nats"), ("reason", "consumer_gone")];

			assert_eq!(recorder.total(BRIDGE_EXIT_COUNTER, &consumer_gone), 2);
			assert_eq!(
				recorder.total(BRIDGE_EXIT_COUNTER, &[("backend", "nats"), ("reason", "quit")]),
				1,
			);
		}

		#[test]
		fn operation_counter_is_labelled_by_backend() {
			let recorder = CountingRecorder::default();

			metrics::with_local_recorder(&recorder, || {
				record_operation_outcome(
					Operation::Get,
					Backend::EtcdV2,
					OperationOutcome::Success,
				);
			});

			assert_eq!(
				recorder.total(
					OPERATION_COUNTER,
					&[("operation", "get"), ("backend", "etcd"), ("outcome", "success")],
				),
				1,
			);
			assert_eq!(recorder.total(OPERATION_COUNTER, &[]), 0);
		}
	}
}
