//! Store configuration for roomlog.
//!
//! A [`StoreConfig`] fixes the bounds of a [`crate::LogBook`] at construction
//! time. The same capacity bounds the room registry, the entry store, and
//! every room's index, so a store never grows past what was configured.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default maximum number of rooms, entries, and entries per room.
pub const DEFAULT_CAPACITY: usize = 64;

/// Default maximum room name length in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 31;

/// Upper bound on `capacity`. Entry and room ids are `u32`, and every
/// operation is linear in the store size.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Bounds for a log store.
///
/// # Example
///
/// ```rust
/// use roomlog::StoreConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoreConfig::new(128, 31)?;
/// assert_eq!(config.capacity, 128);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of rooms, of entries in the store, and of entries
    /// referenced by any single room.
    pub capacity: usize,

    /// Maximum room name length in bytes.
    pub max_name_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl StoreConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either bound is zero or the capacity
    /// exceeds [`MAX_CAPACITY`].
    pub fn new(capacity: usize, max_name_len: usize) -> Result<Self> {
        let config = Self {
            capacity,
            max_name_len,
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy of this configuration with a different capacity.
    #[must_use]
    pub fn with_capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            }
            .into());
        }

        if self.max_name_len == 0 {
            return Err(ConfigError::InvalidNameLength {
                len: self.max_name_len,
            }
            .into());
        }

        Ok(())
    }

    /// Reads and validates a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] if the file
    /// cannot be loaded, or a validation error if the values are out of range.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }
}
