//! Watch bridge converting backend responses into host responses.

// crates.io
use tokio::sync::{mpsc, oneshot};
// self
use crate::{
	manager::{Backend, ConfigManager, ManagerResponse, ResponseStream},
	obs::{self, BridgeExit},
	remote::RemoteResponse,
};

/// Forwards backend updates to `responses` until the caller quits or stops listening.
///
/// Quit always wins over pending backend traffic. A closed backend stream only disables that
/// branch; the bridge keeps waiting for quit. On exit, one quit signal is forwarded to the
/// backend watch and the manager is released.
pub(super) async fn bridge(
	kind: Backend,
	manager: Box<dyn ConfigManager>,
	mut backend: ResponseStream,
	responses: mpsc::Sender<RemoteResponse>,
	mut quit_ack: oneshot::Receiver<()>,
	quit: oneshot::Sender<()>,
) -> BridgeExit {
	let mut backend_open = true;
	let exit = loop {
		tokio::select! {
			biased;
			_ = &mut quit_ack => break BridgeExit::Quit,
			_ = responses.closed() => break BridgeExit::ConsumerGone,
			update = backend.recv(), if backend_open => {
				let Some(ManagerResponse { value, error }) = update else {
					backend_open = false;

					continue;
				};

				tokio::select! {
					biased;
					_ = &mut quit_ack => break BridgeExit::Quit,
					sent = responses.send(RemoteResponse { value, error }) =>
						if sent.is_err() {
							break BridgeExit::ConsumerGone;
						},
				}
			},
		}
	};

	// The backend watch may have ended already.
	let _ = quit.send(());

	drop(manager);
	obs::trace_bridge_exit(kind, exit);
	obs::record_bridge_exit(kind, exit);

	exit
}
