// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keyed JSON config behind a storage port.
//!
//! [`ConfigStore`] moves raw blobs; [`ConfigService`] owns the JSON encoding
//! and, for types implementing [`Validate`], refuses values the controller
//! would reject. Files are written pretty-printed since users edit them.

use glide_core::{InvalidConfig, ViewportConfig};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw config blobs, addressed by logical key.
pub trait ConfigStore {
    /// Raw blob for `key`; [`ConfigError::NotFound`] when absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replaces the blob for `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Errors from loading or saving config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("not found")]
    NotFound,
    /// Store I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored JSON does not match the expected shape.
    #[error("malformed config `{key}`: {source}")]
    Parse {
        /// Key that failed to parse.
        key: String,
        /// Decoder error.
        source: serde_json::Error,
    },
    /// Value could not be encoded.
    #[error("could not encode config: {0}")]
    Encode(#[from] serde_json::Error),
    /// Values violate controller invariants.
    #[error("invalid viewport config: {0}")]
    Invalid(#[from] InvalidConfig),
    /// Store-specific failure.
    #[error("other: {0}")]
    Other(String),
}

/// Config values with invariants beyond their serde shape.
pub trait Validate {
    /// Checks the value; the first violation wins.
    fn validate(&self) -> Result<(), InvalidConfig>;
}

impl Validate for ViewportConfig {
    fn validate(&self) -> Result<(), InvalidConfig> {
        Self::validate(self)
    }
}

/// JSON encoding and validation over a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Decodes `key`; `Ok(None)` when absent or stored empty.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                key: key.to_owned(),
                source,
            })
    }

    /// Decodes `key`, or `T::default()` when absent.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, ConfigError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Like [`ConfigService::load_or_default`], then validates the result.
    pub fn load_valid<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default + Validate,
    {
        let value: T = self.load_or_default(key)?;
        value.validate()?;
        Ok(value)
    }

    /// Encodes `value` as pretty JSON with a trailing newline and stores it.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let mut data = serde_json::to_vec_pretty(value)?;
        data.push(b'\n');
        self.store.save_raw(key, &data)
    }

    /// Validates `value` before saving; nothing is written when it fails.
    pub fn save_valid<T: Serialize + Validate>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), ConfigError> {
        value.validate()?;
        self.save(key, value)
    }
}
