//! TLS settings: trust policy, trusted certificates, and client identity.
//!
//! Only PEM material is supported because the outbound client runs on rustls. Material can be
//! inlined (`content`) or referenced by path; inline content wins when both are present.

// std
use std::path::{Path, PathBuf};
// crates.io
use serde::Deserializer;
// self
use crate::{_prelude::*, config::Secret, error::ConfigError};

/// Key/trust store encodings accepted by the configuration surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreType {
	#[default]
	/// PEM certificates (and key, for key stores).
	Pem,
	/// PKCS#12 archive.
	Pkcs12,
	/// Java key store.
	Jks,
	/// Store disabled.
	None,
}
impl StoreType {
	/// Returns a stable label matching the configuration surface.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreType::Pem => "PEM",
			StoreType::Pkcs12 => "PKCS12",
			StoreType::Jks => "JKS",
			StoreType::None => "NONE",
		}
	}

	fn ensure_supported(self, store: &'static str) -> Result<(), ConfigError> {
		match self {
			StoreType::Pem | StoreType::None => Ok(()),
			StoreType::Pkcs12 | StoreType::Jks =>
				Err(ConfigError::UnsupportedStore { store, kind: self.as_str() }),
		}
	}
}

/// TLS options for the outbound client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SslOptions {
	/// Accepts any server certificate.
	pub trust_all: bool,
	/// Verifies that the server certificate matches the host name.
	pub hostname_verifier: bool,
	/// Additional trusted certificates.
	pub trust_store: Option<TrustStore>,
	/// Client certificate presented for mutual TLS.
	pub key_store: Option<KeyStore>,
}
impl SslOptions {
	/// Options applied when a configuration predates the `ssl` block.
	///
	/// Older plugin versions trusted every certificate and skipped host name checks for HTTPS
	/// targets, so a missing block keeps that behavior.
	pub fn legacy() -> Self {
		Self { trust_all: true, hostname_verifier: false, ..Default::default() }
	}

	/// Rejects store encodings the transport cannot load.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if let Some(store) = &self.trust_store {
			store.kind.ensure_supported("trust")?;
		}
		if let Some(store) = &self.key_store {
			store.kind.ensure_supported("key")?;
		}

		Ok(())
	}
}
impl Default for SslOptions {
	fn default() -> Self {
		Self { trust_all: false, hostname_verifier: true, trust_store: None, key_store: None }
	}
}

/// Trusted certificate bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrustStore {
	/// Store encoding.
	#[serde(rename = "type")]
	pub kind: StoreType,
	/// Path to a PEM bundle.
	pub path: Option<PathBuf>,
	/// Inline PEM bundle.
	pub content: Option<String>,
	/// Store password; unused for PEM.
	pub password: Option<Secret>,
}
impl TrustStore {
	/// Loads the PEM bundle, or `None` when the store is disabled.
	pub fn pem(&self) -> Result<Option<Vec<u8>>, ConfigError> {
		self.kind.ensure_supported("trust")?;

		if self.kind == StoreType::None {
			return Ok(None);
		}

		load_material("trust", "certificate", self.path.as_deref(), self.content.as_deref())
			.map(Some)
	}
}

/// Client identity for mutual TLS.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyStore {
	/// Store encoding.
	#[serde(rename = "type")]
	pub kind: StoreType,
	/// Path to the PEM certificate chain.
	pub cert_path: Option<PathBuf>,
	/// Inline PEM certificate chain.
	pub cert_content: Option<String>,
	/// Path to the PEM private key.
	pub key_path: Option<PathBuf>,
	/// Inline PEM private key.
	pub key_content: Option<String>,
	/// Store password; unused for PEM.
	pub password: Option<Secret>,
}
impl KeyStore {
	/// Loads the certificate chain followed by the private key as one PEM document, or `None`
	/// when the store is disabled.
	pub fn pem(&self) -> Result<Option<Vec<u8>>, ConfigError> {
		self.kind.ensure_supported("key")?;

		if self.kind == StoreType::None {
			return Ok(None);
		}

		let mut pem = load_material(
			"key",
			"certificate",
			self.cert_path.as_deref(),
			self.cert_content.as_deref(),
		)?;
		let key =
			load_material("key", "key", self.key_path.as_deref(), self.key_content.as_deref())?;

		if !pem.ends_with(b"\n") {
			pem.push(b'\n');
		}

		pem.extend_from_slice(&key);

		Ok(Some(pem))
	}
}

pub(crate) fn deserialize_or_legacy<'de, D>(deserializer: D) -> Result<SslOptions, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<SslOptions>::deserialize(deserializer)?.unwrap_or_else(SslOptions::legacy))
}

fn load_material(
	store: &'static str,
	material: &'static str,
	path: Option<&Path>,
	content: Option<&str>,
) -> Result<Vec<u8>, ConfigError> {
	if let Some(content) = content.filter(|content| !content.trim().is_empty()) {
		return Ok(content.as_bytes().to_vec());
	}

	let path = path.ok_or(ConfigError::MissingStoreMaterial { store, material })?;

	std::fs::read(path).map_err(|source| ConfigError::StoreRead {
		store,
		path: path.to_path_buf(),
		source,
	})
}
