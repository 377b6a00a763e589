//! Remote configuration provider adapter: resolve etcd, Consul, Firestore, and NATS config
//! managers per request, split credentials out of `etcd://` endpoints, and bridge backend watch
//! streams into the host library's response channel.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod adapter;
pub mod endpoint;
pub mod error;
pub mod keyring;
pub mod manager;
pub mod obs;
pub mod registry;
pub mod remote;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::{
		env,
		path::PathBuf,
		process,
		sync::atomic::{AtomicUsize, Ordering},
		time::{SystemTime, UNIX_EPOCH},
	};
	// self
	use crate::{adapter::RemoteConfigAdapter, manager::MemoryBackend, remote::RemoteProviderConfig};

	/// Constructs a [`RemoteConfigAdapter`] backed by a fresh [`MemoryBackend`], returning both
	/// so tests can seed values and inspect recorded constructor requests.
	pub fn build_memory_adapter() -> (RemoteConfigAdapter, Arc<MemoryBackend>) {
		let backend = Arc::new(MemoryBackend::default());
		let adapter = RemoteConfigAdapter::new(backend.clone());

		(adapter, backend)
	}

	/// Builds a provider descriptor without a keyring.
	pub fn provider(tag: &str, endpoint: &str, path: &str) -> RemoteProviderConfig {
		RemoteProviderConfig::new(tag, endpoint, path)
	}

	/// Returns a unique, not-yet-created path inside the system temp directory.
	pub fn temp_path(label: &str) -> PathBuf {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);

		let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
		let unique = format!(
			"remote_config_adapter_{label}_{}_{nanos}_{}",
			process::id(),
			COUNTER.fetch_add(1, Ordering::Relaxed),
		);

		env::temp_dir().join(unique)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;

	pub use crate::error::{Error, Result};
}

pub use tokio;
pub use url;
#[cfg(test)] use {color_eyre as _, serde_json as _};
