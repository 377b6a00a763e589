//! Adapter-level error types shared across endpoint parsing, keyring loading, and backends.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// An `etcd://` endpoint could not be parsed as a URL.
	#[error(transparent)]
	Parse(#[from] EndpointParseError),
	/// The secret keyring file could not be opened.
	#[error(transparent)]
	KeyringOpen(#[from] crate::keyring::KeyringError),
	/// The config-manager constructor or one of its calls failed.
	#[error(transparent)]
	Backend(#[from] BackendError),

	/// A watch bridge was requested outside of a Tokio runtime.
	#[error("Watch channels require a running Tokio runtime.")]
	Runtime,
}

/// Malformed `etcd://` endpoint.
#[derive(Debug, ThisError)]
#[error("Endpoint `{endpoint}` is not a valid URL.")]
pub struct EndpointParseError {
	/// Endpoint string that failed to parse.
	pub endpoint: String,
	/// Underlying parsing failure.
	#[source]
	pub source: EndpointSyntaxError,
}

/// Reason an `etcd://` endpoint was rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum EndpointSyntaxError {
	/// ASCII control character somewhere in the endpoint.
	#[error("Endpoint contains an ASCII control character.")]
	ControlCharacter,
	/// `%` not followed by two hex digits, or an ASCII escape inside the host.
	#[error("Invalid percent-escape `{0}`.")]
	InvalidEscape(String),
	/// Userinfo contains a character that must be escaped.
	#[error("Userinfo contains an invalid character.")]
	InvalidUserinfo,
	/// Host contains a character that must be escaped.
	#[error("Host contains invalid character `{0}`.")]
	InvalidHost(char),
	/// `[` without a matching `]`.
	#[error("Missing `]` in host.")]
	UnclosedBracket,
	/// Bracketed host is not an IPv6 literal.
	#[error("Bracketed host is not an IPv6 literal.")]
	Ipv6(#[from] url::ParseError),
	/// Text after the host is not a numeric port.
	#[error("Invalid port `{0}` after host.")]
	InvalidPort(String),
}

/// Failure reported by a config-manager backend, surfaced without extra context.
#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct BackendError(BoxError);
impl BackendError {
	/// Wraps a backend-specific error.
	pub fn new(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self(Box::new(src))
	}

	/// Builds a backend error from a plain message.
	pub fn msg(message: impl Into<String>) -> Self {
		Self::new(BackendMessage(message.into()))
	}

	/// Returns the wrapped backend error.
	pub fn into_inner(self) -> BoxError {
		self.0
	}
}

#[derive(Debug, ThisError)]
#[error("{0}")]
struct BackendMessage(String);
