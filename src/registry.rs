//! Process-wide registration of the remote configuration implementation.
//!
//! The host library looks up a single [`RemoteConfig`] for the whole process. It is set once at
//! startup, via [`install`] or [`register`], and never reset.

// std
use std::sync::OnceLock;
// self
use crate::{
	_prelude::*,
	adapter::RemoteConfigAdapter,
	manager::ManagerFactory,
	remote::RemoteConfig,
};

static REMOTE_CONFIG: OnceLock<Arc<dyn RemoteConfig>> = OnceLock::new();

/// Registration failures.
#[derive(Debug, ThisError)]
pub enum RegistryError {
	/// A remote configuration implementation is already installed.
	#[error("A remote configuration provider is already registered.")]
	AlreadyRegistered,
}

/// Registers `config` as the process-wide remote configuration implementation.
pub fn register(config: Arc<dyn RemoteConfig>) -> Result<(), RegistryError> {
	REMOTE_CONFIG.set(config).map_err(|_| RegistryError::AlreadyRegistered)
}

/// Builds a [`RemoteConfigAdapter`] over `factory` and registers it.
pub fn install(factory: Arc<dyn ManagerFactory>) -> Result<Arc<dyn RemoteConfig>, RegistryError> {
	let adapter: Arc<dyn RemoteConfig> = Arc::new(RemoteConfigAdapter::new(factory));

	register(adapter.clone())?;

	Ok(adapter)
}

/// Returns the registered implementation, if any.
pub fn remote_config() -> Option<Arc<dyn RemoteConfig>> {
	REMOTE_CONFIG.get().cloned()
}
