//! Secret keyring handle passed to keyring-aware config-manager constructors.

// std
use std::{
	fs::File,
	io::{self, Read},
	path::{Path, PathBuf},
};
// self
use crate::_prelude::*;

/// Failure to open the secret keyring file.
#[derive(Debug, ThisError)]
#[error("Failed to open secret keyring {}.", .path.display())]
pub struct KeyringError {
	/// Keyring path supplied by the remote provider.
	pub path: PathBuf,
	/// Underlying IO failure.
	#[source]
	pub source: io::Error,
}

/// Open, read-only keyring file.
///
/// The adapter opens one per manager resolution and drops it as soon as the constructor
/// returns, so backends must read whatever key material they need inside `create`.
pub struct Keyring {
	path: PathBuf,
	file: File,
}
impl Keyring {
	/// Opens the keyring at `path`.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, KeyringError> {
		let path = path.as_ref().to_path_buf();
		let file = File::open(&path).map_err(|source| KeyringError { path: path.clone(), source })?;

		Ok(Self { path, file })
	}

	/// Path the keyring was opened from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads the remaining keyring contents into memory.
	pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
		let mut buf = Vec::new();

		self.file.read_to_end(&mut buf)?;

		Ok(buf)
	}
}
impl Read for Keyring {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.file.read(buf)
	}
}
impl Debug for Keyring {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Keyring").field("path", &self.path).finish_non_exhaustive()
	}
}
