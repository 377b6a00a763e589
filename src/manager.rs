//! Config-manager capability and the constructor requests the adapter dispatches.
//!
//! Concrete etcd, Consul, Firestore, and NATS clients live outside this crate; they plug in by
//! implementing [`ManagerFactory`] (one constructor entry point keyed by [`ManagerRequest`]) and
//! [`ConfigManager`] (fetch + watch against one backend). [`MemoryBackend`] is the in-process
//! implementation used for local development and tests.

pub mod memory;

pub use memory::MemoryBackend;

// crates.io
use tokio::sync::{mpsc, oneshot};
// self
use crate::{_prelude::*, error::BackendError, keyring::Keyring};

/// Boxed future returned by [`ConfigManager::get`].
pub type ManagerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + 'a + Send>>;

/// Receiver that resolves once the watch should stop.
pub type QuitSignal = oneshot::Receiver<()>;

/// Backend-native stream of watch updates.
pub type ResponseStream = mpsc::Receiver<ManagerResponse>;

/// Key/value backends a provider tag can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
	/// etcd v2 API (`etcd`).
	EtcdV2,
	/// etcd v3 API (`etcd3`).
	EtcdV3,
	/// Google Cloud Firestore (`firestore`).
	Firestore,
	/// NATS key/value (`nats`).
	Nats,
	/// Consul KV; selected by every other tag.
	Consul,
}
impl Backend {
	/// Maps a provider tag onto a backend; matching is exact and case-sensitive.
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"etcd" => Self::EtcdV2,
			"etcd3" => Self::EtcdV3,
			"firestore" => Self::Firestore,
			"nats" => Self::Nats,
			_ => Self::Consul,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::EtcdV2 => "etcd",
			Self::EtcdV3 => "etcd3",
			Self::Firestore => "firestore",
			Self::Nats => "nats",
			Self::Consul => "consul",
		}
	}
}
impl Display for Backend {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Client settings for an authenticated etcd v3 manager.
#[derive(Clone, PartialEq, Eq)]
pub struct EtcdV3Config {
	/// Cleaned `host:port` endpoints.
	pub endpoints: Vec<String>,
	/// Username lifted from the first credentialed endpoint.
	pub username: String,
	/// Matching password; may be empty.
	pub password: String,
}
impl Debug for EtcdV3Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EtcdV3Config")
			.field("endpoints", &self.endpoints)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Constructor variant selected for one manager resolution.
#[derive(Debug)]
pub enum ManagerRequest<'a> {
	/// Plain constructor; payloads are used as stored.
	Standard {
		/// Selected backend.
		backend: Backend,
		/// Endpoint list handed to the client.
		endpoints: Vec<String>,
	},
	/// Keyring-aware constructor; payloads are decrypted with the keyring.
	Keyed {
		/// Selected backend.
		backend: Backend,
		/// Endpoint list handed to the client.
		endpoints: Vec<String>,
		/// Keyring opened for the duration of the constructor call.
		keyring: &'a mut Keyring,
	},
	/// Configuration-object etcd v3 constructor carrying basic-auth credentials.
	EtcdV3Config(EtcdV3Config),
}
impl ManagerRequest<'_> {
	/// Backend this request targets.
	pub fn backend(&self) -> Backend {
		match self {
			Self::Standard { backend, .. } | Self::Keyed { backend, .. } => *backend,
			Self::EtcdV3Config(_) => Backend::EtcdV3,
		}
	}

	/// Endpoints this request targets.
	pub fn endpoints(&self) -> &[String] {
		match self {
			Self::Standard { endpoints, .. } | Self::Keyed { endpoints, .. } => endpoints,
			Self::EtcdV3Config(config) => &config.endpoints,
		}
	}
}

/// Native watch update emitted by a backend.
#[derive(Debug, Default)]
pub struct ManagerResponse {
	/// Raw payload.
	pub value: Vec<u8>,
	/// Backend failure for this update.
	pub error: Option<BackendError>,
}

/// Fetch and watch operations against one backend.
pub trait ConfigManager
where
	Self: Send + Sync,
{
	/// Fetches the payload stored at `path`.
	fn get<'a>(&'a self, path: &'a str) -> ManagerFuture<'a, Vec<u8>>;

	/// Streams updates for `path` until `quit` resolves.
	///
	/// Implementations may spawn onto the ambient Tokio runtime.
	fn watch(&self, path: &str, quit: QuitSignal) -> ResponseStream;
}

/// Constructor entry point for config managers.
pub trait ManagerFactory
where
	Self: Send + Sync,
{
	/// Builds a fresh manager for the request; managers are never pooled by the adapter.
	fn create(&self, request: ManagerRequest<'_>) -> Result<Box<dyn ConfigManager>, BackendError>;
}
