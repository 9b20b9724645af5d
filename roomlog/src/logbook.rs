//! The log book: room registry, entry store, and the insertion coordinator.
//!
//! [`LogBook`] is the top-level handle. It owns the [`RoomRegistry`] and the
//! [`EntryStore`] and is the only way to create entries, which lets it keep
//! the global sequence and every room index consistent.
//!
//! # Ordering
//!
//! Entries are ordered by the composite [`EntryKey`]: room name (byte-wise),
//! then reading kind rank, then timestamp, all ascending. A new entry is
//! placed before the first existing entry that is strictly greater, so
//! entries with identical keys stay in insertion order.
//!
//! # Example
//!
//! ```rust
//! use roomlog::{LogBook, ReadingValue, StoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut book = LogBook::new(StoreConfig::default())?;
//! let kitchen = book.register_room("Kitchen")?;
//! let den = book.register_room("Den")?;
//!
//! book.create_entry(kitchen, 1, ReadingValue::Temperature(21.5), 100)?;
//! book.create_entry(den, 2, ReadingValue::Decibels(40), 50)?;
//! book.create_entry(kitchen, 1, ReadingValue::Temperature(19.0), 10)?;
//!
//! let order: Vec<_> = book
//!     .entries()
//!     .map(|(_, entry)| (book.room_name(entry.room), entry.timestamp))
//!     .collect();
//! assert_eq!(order, vec![("Den", 50), ("Kitchen", 10), ("Kitchen", 100)]);
//! # Ok(())
//! # }
//! ```

use std::cmp::Ordering;

use crate::config::StoreConfig;
use crate::entry::{EntryId, EntryStore, LogEntry};
use crate::error::{EntryError, Result};
use crate::reading::{Reading, ReadingKind, ReadingValue};
use crate::room::{Room, RoomId, RoomRegistry};

/// The composite sort key of an entry.
///
/// Field order matches the comparison order, so the derived `Ord` is the
/// store's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey<'a> {
    /// Owning room's name, compared byte-wise.
    pub room: &'a str,
    /// Reading kind, compared by rank.
    pub kind: ReadingKind,
    /// Timestamp.
    pub timestamp: i64,
}

/// Bounded in-memory log store for per-room sensor readings.
///
/// # Thread Safety
///
/// All mutation goes through `&mut self`, so an insertion always completes
/// before anything can observe the store. Sharing a `LogBook` across threads
/// requires wrapping the whole value in a single lock.
#[derive(Debug, Clone)]
pub struct LogBook {
    config: StoreConfig,
    rooms: RoomRegistry,
    store: EntryStore,
}

impl Default for LogBook {
    fn default() -> Self {
        let config = StoreConfig::default();
        Self {
            config,
            rooms: RoomRegistry::new(config),
            store: EntryStore::new(config.capacity),
        }
    }
}

impl LogBook {
    /// Creates an empty log book with the given bounds.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` fails validation.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rooms: RoomRegistry::new(config),
            store: EntryStore::new(config.capacity),
        })
    }

    /// Returns the configuration this log book was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registers a room.
    ///
    /// # Errors
    ///
    /// See [`RoomRegistry::register`].
    pub fn register_room(&mut self, name: &str) -> Result<RoomId> {
        self.rooms.register(name)
    }

    /// Looks up a room by exact name.
    pub fn find_room(&self, name: &str) -> Option<RoomId> {
        self.rooms.find(name)
    }

    /// Returns a room by handle.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Returns the name of a room, or an empty string for an unknown handle.
    pub fn room_name(&self, id: RoomId) -> &str {
        self.rooms.name(id)
    }

    /// Returns the room registry.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Returns the entry store.
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&LogEntry> {
        self.store.get(id)
    }

    /// Iterates over all entries in global sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &LogEntry)> {
        self.store.iter()
    }

    /// Iterates over one room's entries in sorted order.
    ///
    /// Returns `None` if the handle does not refer to a registered room.
    pub fn room_entries(
        &self,
        room: RoomId,
    ) -> Option<impl Iterator<Item = (EntryId, &LogEntry)>> {
        let room = self.rooms.get(room)?;
        Some(
            room.entries()
                .iter()
                .filter_map(|&id| self.store.get(id).map(|entry| (id, entry))),
        )
    }

    /// Returns the composite sort key of an entry.
    pub fn key_of<'a>(&'a self, entry: &LogEntry) -> EntryKey<'a> {
        EntryKey {
            room: self.rooms.name(entry.room),
            kind: entry.reading.kind(),
            timestamp: entry.timestamp,
        }
    }

    /// Compares two entries under the composite key.
    pub fn compare(&self, a: &LogEntry, b: &LogEntry) -> Ordering {
        self.key_of(a).cmp(&self.key_of(b))
    }

    /// Creates an entry from a raw kind selector and payload.
    ///
    /// This is the write path used by input collaborators. The reading is
    /// validated and then placed with [`LogBook::insert`].
    ///
    /// # Errors
    ///
    /// Checked in this order, before anything is modified:
    ///
    /// - [`EntryError::NullReference`] if `room` is not a registered room
    /// - [`EntryError::InvalidKind`], [`EntryError::PayloadMismatch`] or
    ///   [`EntryError::InvalidMotionFlag`] if the reading is malformed
    /// - [`EntryError::StoreFull`] or [`EntryError::RoomFull`] at capacity
    pub fn create_entry(
        &mut self,
        room: RoomId,
        selector: i32,
        value: ReadingValue,
        timestamp: i64,
    ) -> Result<EntryId> {
        self.resolve(room)?;
        let reading = Reading::new(selector, value)?;
        self.insert(room, reading, timestamp)
    }

    /// Inserts an already-validated reading for `room`.
    ///
    /// The entry is placed in the global sequence at its sorted slot; every
    /// entry after it shifts one slot toward the tail and has its position
    /// retargeted. The new id is then inserted into the room's own index at
    /// its sorted position.
    ///
    /// # Errors
    ///
    /// - [`EntryError::NullReference`] if `room` is not a registered room
    /// - [`EntryError::StoreFull`] if the store is at capacity
    /// - [`EntryError::RoomFull`] if the room's index is at capacity
    pub fn insert(&mut self, room: RoomId, reading: Reading, timestamp: i64) -> Result<EntryId> {
        let owner = self.resolve(room)?;

        if self.store.is_full() {
            return Err(EntryError::StoreFull {
                capacity: self.store.capacity(),
            }
            .into());
        }

        // Only reachable when a room's bound is below the store's; with one
        // shared capacity the store fills first.
        if owner.len() >= self.config.capacity {
            return Err(EntryError::RoomFull {
                room: owner.name().to_string(),
                capacity: self.config.capacity,
            }
            .into());
        }

        let entry = LogEntry::new(room, reading, timestamp);

        // Both positions are computed before either structure changes.
        let (slot, room_position) = {
            let key = self.key_of(&entry);
            let slot = self
                .store
                .insertion_slot(|existing| key < self.key_of(existing));
            let room_position = owner
                .entries()
                .iter()
                .position(|&id| {
                    self.store
                        .get(id)
                        .is_some_and(|existing| key < self.key_of(existing))
                })
                .unwrap_or(owner.len());
            (slot, room_position)
        };

        let Some(id) = self.store.next_id() else {
            return Err(EntryError::StoreFull {
                capacity: self.store.capacity(),
            }
            .into());
        };
        let Some(owner) = self.rooms.get_mut(room) else {
            return Err(EntryError::NullReference { room: room.get() }.into());
        };
        owner.insert_entry(room_position, id);

        let placement = self.store.insert_at(id, slot, entry);

        tracing::debug!(
            room = self.rooms.name(room),
            kind = %reading.kind(),
            timestamp,
            slot = placement.slot,
            relocated = placement.relocated,
            "inserted entry"
        );

        Ok(placement.id)
    }

    #[cfg(test)]
    pub(crate) fn swap_slots_for_test(&mut self, a: usize, b: usize) {
        self.store.swap_slots_unchecked(a, b);
    }

    #[cfg(test)]
    pub(crate) fn drop_slot_for_test(&mut self, slot: usize) {
        self.store.drop_slot_unchecked(slot);
    }

    /// Mutable access to a room's index for corrupting it in tests.
    #[cfg(test)]
    pub(crate) fn room_index_for_test(&mut self, room: RoomId) -> &mut Vec<EntryId> {
        self.rooms
            .get_mut(room)
            .expect("test room is registered")
            .entries_mut()
    }

    fn resolve(&self, room: RoomId) -> Result<&Room> {
        self.rooms
            .get(room)
            .ok_or_else(|| EntryError::NullReference { room: room.get() }.into())
    }
}
