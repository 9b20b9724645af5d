//! Room registration and per-room entry indexes.
//!
//! Rooms are registered once by name and never removed. Each [`Room`] owns a
//! sorted index of [`EntryId`]s pointing into the shared
//! [`crate::entry::EntryStore`]. The ids are stable, so entries moving inside
//! the store never invalidate a room's index.
//!
//! # Example
//!
//! ```rust
//! use roomlog::room::RoomRegistry;
//! use roomlog::StoreConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = RoomRegistry::new(StoreConfig::default());
//! let kitchen = registry.register("Kitchen")?;
//!
//! assert_eq!(registry.find("Kitchen"), Some(kitchen));
//! assert_eq!(registry.find("kitchen"), None);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{MAX_CAPACITY, StoreConfig};
use crate::entry::EntryId;
use crate::error::{Result, RoomError};

/// Opaque, `Copy` handle for a registered room.
///
/// Handles stay valid for the lifetime of the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Returns the raw handle value.
    pub fn get(self) -> u32 {
        self.0
    }

    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named room and its sorted index of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    name: String,
    entries: Vec<EntryId>,
}

impl Room {
    fn new(name: String) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Returns the room name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this room's entry ids in composite-key order.
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    /// Returns the number of entries that belong to this room.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries belong to this room.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry id at `position`, shifting later ids toward the tail.
    pub(crate) fn insert_entry(&mut self, position: usize, id: EntryId) {
        self.entries.insert(position, id);
    }

    /// Direct access to the index, bypassing every ordering rule.
    #[cfg(test)]
    pub(crate) fn entries_mut(&mut self) -> &mut Vec<EntryId> {
        &mut self.entries
    }
}

/// Bounded, append-only registry of rooms.
///
/// # Thread Safety
///
/// The registry is designed for single-threaded access patterns. External
/// synchronization must be provided if used across multiple threads.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    config: StoreConfig,
    rooms: Vec<Room>,
}

impl RoomRegistry {
    /// Creates an empty registry with the bounds from `config`.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            rooms: Vec::with_capacity(config.capacity.min(MAX_CAPACITY)),
        }
    }

    /// Registers a new room and returns its handle.
    ///
    /// # Errors
    ///
    /// - [`RoomError::InvalidName`] if the name is empty or longer than
    ///   `max_name_len` bytes
    /// - [`RoomError::Full`] if the registry is at capacity
    /// - [`RoomError::Duplicate`] if a room with this exact name exists
    pub fn register(&mut self, name: &str) -> Result<RoomId> {
        self.validate_name(name)?;

        if self.rooms.len() >= self.config.capacity {
            return Err(RoomError::Full {
                capacity: self.config.capacity,
            }
            .into());
        }

        if self.find(name).is_some() {
            return Err(RoomError::Duplicate {
                name: name.to_string(),
            }
            .into());
        }

        let Some(id) = RoomId::from_index(self.rooms.len()) else {
            return Err(RoomError::Full {
                capacity: self.config.capacity,
            }
            .into());
        };
        self.rooms.push(Room::new(name.to_string()));

        tracing::debug!(room = name, id = id.get(), "registered room");
        Ok(id)
    }

    /// Looks up a room by exact (byte-wise) name.
    pub fn find(&self, name: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|room| room.name == name)
            .and_then(RoomId::from_index)
    }

    /// Returns the room for a handle, or `None` if the handle is unknown.
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.index())
    }

    /// Returns the name of a room, or an empty string for an unknown handle.
    pub fn name(&self, id: RoomId) -> &str {
        self.get(id).map_or("", Room::name)
    }

    /// Iterates over all rooms in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms
            .iter()
            .enumerate()
            .filter_map(|(index, room)| RoomId::from_index(index).map(|id| (id, room)))
    }

    /// Returns the number of registered rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no rooms are registered.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Returns the maximum number of rooms.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(RoomError::InvalidName {
                name: name.to_string(),
                reason: "name cannot be empty".to_string(),
            }
            .into());
        }

        if name.len() > self.config.max_name_len {
            return Err(RoomError::InvalidName {
                name: name.to_string(),
                reason: format!(
                    "name is {} bytes (max {})",
                    name.len(),
                    self.config.max_name_len
                ),
            }
            .into());
        }

        Ok(())
    }
}
