//! Provider adapter that resolves a config manager per call and serves the host contract.
//!
//! Every entry point re-resolves a manager from scratch: the endpoint string is split on `;`,
//! the optional keyring is opened for the duration of the constructor call, and the provider
//! tag picks the backend. `etcd3` endpoints additionally run through
//! [`endpoint::parse_endpoint_users`], and recovered credentials switch to the configuration-object
//! constructor (ignoring any keyring).

mod bridge;

// std
use std::io::Cursor;
// crates.io
use tokio::{
	runtime::Handle,
	sync::{mpsc, oneshot},
};
// self
use crate::{
	_prelude::*,
	endpoint::{self, EndpointCredentials},
	keyring::Keyring,
	manager::{Backend, ConfigManager, EtcdV3Config, ManagerFactory, ManagerRequest},
	obs::{self, Operation, OperationOutcome, OperationSpan},
	remote::{
		RemoteConfig, RemoteFuture, RemoteProvider, RemoteReader, WatchChannel, WatchQuit,
	},
};

/// [`RemoteConfig`] implementation backed by a [`ManagerFactory`].
#[derive(Clone)]
pub struct RemoteConfigAdapter {
	factory: Arc<dyn ManagerFactory>,
	response_buffer: usize,
}
impl RemoteConfigAdapter {
	/// Capacity of the converted response channel unless overridden.
	pub const DEFAULT_RESPONSE_BUFFER: usize = 1;

	/// Creates an adapter that builds managers through `factory`.
	pub fn new(factory: Arc<dyn ManagerFactory>) -> Self {
		Self { factory, response_buffer: Self::DEFAULT_RESPONSE_BUFFER }
	}

	/// Overrides the capacity of watch response channels; values below 1 are raised to 1.
	pub fn with_response_buffer(mut self, capacity: usize) -> Self {
		self.response_buffer = capacity.max(1);

		self
	}

	/// Capacity used for watch response channels.
	pub fn response_buffer(&self) -> usize {
		self.response_buffer
	}

	/// Builds a fresh config manager for `provider`.
	pub fn resolve_manager(&self, provider: &dyn RemoteProvider) -> Result<Box<dyn ConfigManager>> {
		let endpoints = endpoint::split_endpoints(provider.endpoint());
		let backend = Backend::from_tag(provider.provider());
		let mut keyring = match provider.secret_keyring() {
			"" => None,
			path => Some(Keyring::open(path)?),
		};
		let request = match backend {
			Backend::EtcdV3 => {
				let parsed = endpoint::parse_endpoint_users(&endpoints)?;

				match parsed.credentials {
					Some(EndpointCredentials { username, password }) =>
						ManagerRequest::EtcdV3Config(EtcdV3Config {
							endpoints: parsed.endpoints,
							username,
							password,
						}),
					None => constructor_request(backend, parsed.endpoints, keyring.as_mut()),
				}
			},
			_ => constructor_request(backend, endpoints, keyring.as_mut()),
		};
		let manager = self.factory.create(request);

		drop(keyring);

		Ok(manager?)
	}

	async fn fetch(
		&self,
		operation: Operation,
		provider: &dyn RemoteProvider,
	) -> Result<RemoteReader> {
		let span = OperationSpan::new(operation, Backend::from_tag(provider.provider()));

		span.record(OperationOutcome::Attempt);

		let result = span
			.instrument(async {
				let manager = self.resolve_manager(provider)?;
				let payload = manager.get(provider.path()).await?;

				Ok::<_, Error>(Cursor::new(payload))
			})
			.await;

		span.record(match result {
			Ok(_) => OperationOutcome::Success,
			Err(_) => OperationOutcome::Failure,
		});

		result
	}

	fn start_bridge(
		&self,
		provider: &dyn RemoteProvider,
		span: &OperationSpan,
	) -> Result<WatchChannel> {
		let runtime = Handle::try_current().map_err(|_| Error::Runtime)?;
		let manager = self.resolve_manager(provider)?;
		let (quit_tx, quit_rx) = oneshot::channel();
		let (quit_ack_tx, quit_ack_rx) = oneshot::channel();
		let (response_tx, response_rx) = mpsc::channel(self.response_buffer);
		let backend_stream = manager.watch(provider.path(), quit_rx);

		runtime.spawn(span.instrument(bridge::bridge(
			span.backend(),
			manager,
			backend_stream,
			response_tx,
			quit_ack_rx,
			quit_tx,
		)));

		Ok(WatchChannel { responses: response_rx, quit: WatchQuit(quit_ack_tx) })
	}
}
impl RemoteConfig for RemoteConfigAdapter {
	fn get<'a>(&'a self, provider: &'a dyn RemoteProvider) -> RemoteFuture<'a, RemoteReader> {
		Box::pin(self.fetch(Operation::Get, provider))
	}

	fn watch<'a>(&'a self, provider: &'a dyn RemoteProvider) -> RemoteFuture<'a, RemoteReader> {
		Box::pin(self.fetch(Operation::Watch, provider))
	}

	fn watch_channel(&self, provider: &dyn RemoteProvider) -> Option<WatchChannel> {
		let backend = Backend::from_tag(provider.provider());
		let span = OperationSpan::new(Operation::WatchChannel, backend);
		let _guard = span.enter();

		span.record(OperationOutcome::Attempt);

		match self.start_bridge(provider, &span) {
			Ok(channel) => {
				span.record(OperationOutcome::Success);

				Some(channel)
			},
			Err(e) => {
				obs::trace_watch_unavailable(&e);
				span.record(OperationOutcome::Failure);

				None
			},
		}
	}
}
impl Debug for RemoteConfigAdapter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RemoteConfigAdapter")
			.field("response_buffer", &self.response_buffer)
			.finish_non_exhaustive()
	}
}

fn constructor_request<'a>(
	backend: Backend,
	endpoints: Vec<String>,
	keyring: Option<&'a mut Keyring>,
) -> ManagerRequest<'a> {
	match keyring {
		Some(keyring) => ManagerRequest::Keyed { backend, endpoints, keyring },
		None => ManagerRequest::Standard { backend, endpoints },
	}
}
