//! Thread-safe in-memory [`ManagerFactory`] for local development and tests.

// std
use std::{collections::HashSet, path::PathBuf};
// crates.io
use tokio::sync::{
	broadcast::{self, error::RecvError},
	mpsc,
};
// self
use crate::{
	_prelude::*,
	error::BackendError,
	manager::{
		Backend, ConfigManager, ManagerFactory, ManagerFuture, ManagerRequest, ManagerResponse,
		QuitSignal, ResponseStream,
	},
};

const UPDATE_CAPACITY: usize = 64;
const WATCH_BUFFER: usize = 16;

type ValueMap = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// Constructor variant observed by [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestAuth {
	/// Plain constructor.
	Plain,
	/// Keyring-aware constructor.
	Keyring {
		/// Keyring path.
		path: PathBuf,
		/// Key material read during construction.
		key_material: Vec<u8>,
	},
	/// Configuration-object etcd v3 constructor.
	Credentials {
		/// Username handed to the client.
		username: String,
		/// Password handed to the client.
		password: String,
	},
}

/// Snapshot of one [`ManagerFactory::create`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
	/// Backend the adapter selected.
	pub backend: Backend,
	/// Endpoints passed to the constructor.
	pub endpoints: Vec<String>,
	/// Constructor variant.
	pub auth: RequestAuth,
}

#[derive(Clone, Debug)]
struct WatchEvent {
	path: String,
	outcome: Result<Vec<u8>, String>,
}

/// In-process key/value backend shared by every manager it creates.
///
/// Values are kept per path regardless of the selected backend; [`MemoryBackend::put`] and
/// [`MemoryBackend::fail_watch`] fan out to live watchers of the matching path.
#[derive(Debug)]
pub struct MemoryBackend {
	values: ValueMap,
	updates: broadcast::Sender<WatchEvent>,
	unavailable: RwLock<HashSet<Backend>>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl MemoryBackend {
	/// Stores `value` at `path` and notifies watchers.
	pub fn put(&self, path: impl Into<String>, value: impl Into<Vec<u8>>) {
		let path = path.into();
		let value = value.into();

		self.values.write().insert(path.clone(), value.clone());
		// No live watchers is fine.
		let _ = self.updates.send(WatchEvent { path, outcome: Ok(value) });
	}

	/// Pushes an error update to watchers of `path` without touching the stored value.
	pub fn fail_watch(&self, path: impl Into<String>, message: impl Into<String>) {
		let _ = self.updates.send(WatchEvent { path: path.into(), outcome: Err(message.into()) });
	}

	/// Makes every subsequent constructor call for `backend` fail.
	pub fn mark_unavailable(&self, backend: Backend) {
		self.unavailable.write().insert(backend);
	}

	/// Returns every constructor call observed so far, oldest first.
	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}

	/// Returns the most recent constructor call.
	pub fn last_request(&self) -> Option<RecordedRequest> {
		self.requests.lock().last().cloned()
	}

	/// Number of watch tasks currently subscribed to updates.
	pub fn watcher_count(&self) -> usize {
		self.updates.receiver_count()
	}

	fn record(&self, request: ManagerRequest<'_>) -> Result<Backend, BackendError> {
		let backend = request.backend();
		let (endpoints, auth) = match request {
			ManagerRequest::Standard { endpoints, .. } => (endpoints, RequestAuth::Plain),
			ManagerRequest::Keyed { endpoints, keyring, .. } => {
				let key_material = keyring.read_all().map_err(BackendError::new)?;
				let path = keyring.path().to_path_buf();

				(endpoints, RequestAuth::Keyring { path, key_material })
			},
			ManagerRequest::EtcdV3Config(config) => (
				config.endpoints,
				RequestAuth::Credentials { username: config.username, password: config.password },
			),
		};

		self.requests.lock().push(RecordedRequest { backend, endpoints, auth });

		Ok(backend)
	}
}
impl Default for MemoryBackend {
	fn default() -> Self {
		let (updates, _) = broadcast::channel(UPDATE_CAPACITY);

		Self {
			values: Default::default(),
			updates,
			unavailable: Default::default(),
			requests: Default::default(),
		}
	}
}
impl ManagerFactory for MemoryBackend {
	fn create(&self, request: ManagerRequest<'_>) -> Result<Box<dyn ConfigManager>, BackendError> {
		let backend = self.record(request)?;

		if self.unavailable.read().contains(&backend) {
			return Err(BackendError::msg(format!("{backend} backend is unavailable")));
		}

		Ok(Box::new(MemoryConfigManager {
			values: self.values.clone(),
			updates: self.updates.clone(),
		}))
	}
}

struct MemoryConfigManager {
	values: ValueMap,
	updates: broadcast::Sender<WatchEvent>,
}
impl ConfigManager for MemoryConfigManager {
	fn get<'a>(&'a self, path: &'a str) -> ManagerFuture<'a, Vec<u8>> {
		let values = self.values.clone();

		Box::pin(async move {
			values
				.read()
				.get(path)
				.cloned()
				.ok_or_else(|| BackendError::msg(format!("key not found: {path}")))
		})
	}

	fn watch(&self, path: &str, mut quit: QuitSignal) -> ResponseStream {
		let path = path.to_owned();
		let mut updates = self.updates.subscribe();
		let (tx, rx) = mpsc::channel(WATCH_BUFFER);

		tokio::spawn(async move {
			loop {
				let event = tokio::select! {
					biased;
					_ = &mut quit => break,
					event = updates.recv() => event,
				};
				let response = match event {
					Ok(WatchEvent { path: event_path, .. }) if event_path != path => continue,
					Ok(WatchEvent { outcome: Ok(value), .. }) =>
						ManagerResponse { value, error: None },
					Ok(WatchEvent { outcome: Err(message), .. }) => failed(message),
					Err(RecvError::Lagged(skipped)) =>
						failed(format!("watch lagged by {skipped} updates")),
					Err(RecvError::Closed) => break,
				};

				if tx.send(response).await.is_err() {
					break;
				}
			}
		});

		rx
	}
}

fn failed(message: String) -> ManagerResponse {
	ManagerResponse { value: Vec::new(), error: Some(BackendError::msg(message)) }
}
