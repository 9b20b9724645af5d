//! Entry storage for roomlog.
//!
//! The [`EntryStore`] owns every [`LogEntry`]. It keeps three structures in
//! lock-step:
//!
//! - an arena addressed by [`EntryId`]; entries never move once written,
//! - the sorted sequence of ids, where an id's index is its *slot*,
//! - a position table mapping each id back to its current slot.
//!
//! Inserting into the middle of the sequence shifts every later id one slot
//! toward the tail. Each relocated id has its position table entry rewritten
//! in the same step, so `position_of` never returns a stale slot. Room indexes
//! hold ids rather than slots and are unaffected by the shift.
//!
//! The store does not know the sort order itself; the caller supplies the
//! comparison when locating a slot (see [`crate::LogBook`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MAX_CAPACITY;
use crate::reading::Reading;
use crate::room::RoomId;

/// Stable identifier of a log entry.
///
/// Unlike a slot, an id never changes after the entry is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(u32);

impl EntryId {
    /// Returns the raw id value.
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

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// One sensor reading owned by a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The owning room. Fixed at creation.
    pub room: RoomId,
    /// The reading kind and payload.
    pub reading: Reading,
    /// Integer timestamp supplied by the caller.
    pub timestamp: i64,
}

impl LogEntry {
    /// Creates a new entry.
    pub fn new(room: RoomId, reading: Reading, timestamp: i64) -> Self {
        Self {
            room,
            reading,
            timestamp,
        }
    }
}

/// Outcome of a successful [`EntryStore::insert_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Id of the new entry.
    pub id: EntryId,
    /// Slot the new entry was written to.
    pub slot: usize,
    /// Number of existing entries shifted one slot toward the tail.
    pub relocated: usize,
}

/// Bounded, sorted storage for all log entries.
#[derive(Debug, Clone)]
pub struct EntryStore {
    capacity: usize,
    /// Entries by id, in creation order.
    arena: Vec<LogEntry>,
    /// Ids in sorted order; the index of an id is its slot.
    order: Vec<EntryId>,
    /// Current slot of each id, indexed by id.
    positions: Vec<usize>,
}

impl EntryStore {
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// Storage is preallocated up to [`MAX_CAPACITY`] entries.
    pub fn new(capacity: usize) -> Self {
        let reserve = capacity.min(MAX_CAPACITY);
        Self {
            capacity,
            arena: Vec::with_capacity(reserve),
            order: Vec::with_capacity(reserve),
            positions: Vec::with_capacity(reserve),
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if no further entry can be inserted.
    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the entry with the given id.
    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.arena.get(id.index())
    }

    /// Returns the current slot of an entry.
    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.positions.get(id.index()).copied()
    }

    /// Returns the id and entry stored at `slot`.
    pub fn at(&self, slot: usize) -> Option<(EntryId, &LogEntry)> {
        let id = *self.order.get(slot)?;
        Some((id, &self.arena[id.index()]))
    }

    /// Returns all ids in sorted order.
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    /// Iterates over all entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &LogEntry)> {
        self.order
            .iter()
            .map(move |&id| (id, &self.arena[id.index()]))
    }

    /// Returns the id the next inserted entry will receive, or `None` once
    /// ids are exhausted.
    pub(crate) fn next_id(&self) -> Option<EntryId> {
        EntryId::from_index(self.arena.len())
    }

    /// Finds the slot a new entry belongs at.
    ///
    /// `sorts_before` must return `true` when the new entry orders strictly
    /// before the given existing entry. The result is the first such slot,
    /// or the end of the sequence, so entries with equal keys keep their
    /// insertion order.
    pub(crate) fn insertion_slot<F>(&self, mut sorts_before: F) -> usize
    where
        F: FnMut(&LogEntry) -> bool,
    {
        self.order
            .iter()
            .position(|&id| sorts_before(&self.arena[id.index()]))
            .unwrap_or(self.order.len())
    }

    /// Writes `entry` into `slot` under `id`, shifting later entries toward
    /// the tail and retargeting their positions.
    ///
    /// The caller must have checked capacity and that `slot <= len()`, and
    /// `id` must come from [`EntryStore::next_id`].
    pub(crate) fn insert_at(&mut self, id: EntryId, slot: usize, entry: LogEntry) -> Placement {
        debug_assert!(!self.is_full(), "insert_at called on a full store");
        debug_assert!(slot <= self.order.len(), "slot {slot} past end of store");
        debug_assert_eq!(Some(id), self.next_id(), "id was not reserved from this store");

        self.arena.push(entry);
        self.positions.push(slot);
        self.order.insert(slot, id);

        let relocated = &self.order[slot + 1..];
        for (offset, moved) in relocated.iter().enumerate() {
            let new_slot = slot + 1 + offset;
            tracing::trace!(entry = moved.get(), from = new_slot - 1, to = new_slot, "retarget");
            self.positions[moved.index()] = new_slot;
        }

        Placement {
            id,
            slot,
            relocated: relocated.len(),
        }
    }

    /// Swaps two slots without touching the position table.
    #[cfg(test)]
    pub(crate) fn swap_slots_unchecked(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
    }

    /// Removes a slot from the sequence, leaving the arena and position
    /// table untouched.
    #[cfg(test)]
    pub(crate) fn drop_slot_unchecked(&mut self, slot: usize) {
        self.order.remove(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomRegistry;
    use crate::StoreConfig;

    fn room() -> RoomId {
        let mut registry = RoomRegistry::new(StoreConfig::default());
        registry.register("Lab").unwrap()
    }

    /// Inserts by timestamp only, mirroring how the log book locates slots.
    fn insert_sorted(store: &mut EntryStore, room: RoomId, timestamp: i64) -> Placement {
        let entry = LogEntry::new(room, Reading::Sound(0), timestamp);
        let slot = store.insertion_slot(|existing| timestamp < existing.timestamp);
        let id = store.next_id().unwrap();
        store.insert_at(id, slot, entry)
    }

    fn timestamps(store: &EntryStore) -> Vec<i64> {
        store.iter().map(|(_, e)| e.timestamp).collect()
    }

    #[test]
    fn test_empty_store() {
        let store = EntryStore::new(4);
        assert!(store.is_empty());
        assert!(!store.is_full());
        assert_eq!(store.capacity(), 4);
        assert!(store.at(0).is_none());
        assert!(store.get(EntryId(0)).is_none());
        assert!(store.position_of(EntryId(0)).is_none());
    }

    #[test]
    fn test_insert_keeps_sorted_order() {
        let room = room();
        let mut store = EntryStore::new(8);

        insert_sorted(&mut store, room, 30);
        insert_sorted(&mut store, room, 10);
        insert_sorted(&mut store, room, 20);
        insert_sorted(&mut store, room, 40);

        assert_eq!(timestamps(&store), vec![10, 20, 30, 40]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_shift_retargets_positions() {
        let room = room();
        let mut store = EntryStore::new(8);

        let a = insert_sorted(&mut store, room, 20);
        let b = insert_sorted(&mut store, room, 30);
        assert_eq!((a.slot, b.slot), (0, 1));

        // Goes in front of both, so both move one slot toward the tail.
        let c = insert_sorted(&mut store, room, 10);
        assert_eq!(c.slot, 0);
        assert_eq!(c.relocated, 2);

        assert_eq!(store.position_of(c.id), Some(0));
        assert_eq!(store.position_of(a.id), Some(1));
        assert_eq!(store.position_of(b.id), Some(2));

        for (slot, &id) in store.ids().iter().enumerate() {
            assert_eq!(store.position_of(id), Some(slot));
        }
    }

    #[test]
    fn test_ids_are_stable() {
        let room = room();
        let mut store = EntryStore::new(8);

        let first = insert_sorted(&mut store, room, 50);
        insert_sorted(&mut store, room, 5);
        insert_sorted(&mut store, room, 1);

        let entry = store.get(first.id).unwrap();
        assert_eq!(entry.timestamp, 50);
        assert_eq!(store.at(2).map(|(id, _)| id), Some(first.id));
    }

    #[test]
    fn test_equal_keys_keep_insertion_order() {
        let room = room();
        let mut store = EntryStore::new(8);

        let first = insert_sorted(&mut store, room, 7);
        let second = insert_sorted(&mut store, room, 7);
        let third = insert_sorted(&mut store, room, 7);

        assert_eq!(second.relocated, 0);
        assert_eq!(store.ids(), &[first.id, second.id, third.id]);
    }

    #[test]
    fn test_id_conversion_is_checked() {
        assert_eq!(EntryId::from_index(7), Some(EntryId(7)));
        assert_eq!(
            EntryId::from_index(u32::MAX as usize),
            Some(EntryId(u32::MAX))
        );
        if let Some(past_max) = (u32::MAX as usize).checked_add(1) {
            assert_eq!(EntryId::from_index(past_max), None);
        }
    }

    #[test]
    fn test_oversized_capacity_does_not_preallocate() {
        let store = EntryStore::new(usize::MAX);
        assert_eq!(store.capacity(), usize::MAX);
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_relocates_nothing() {
        let room = room();
        let mut store = EntryStore::new(2);

        insert_sorted(&mut store, room, 1);
        let last = insert_sorted(&mut store, room, 2);

        assert_eq!(last.slot, 1);
        assert_eq!(last.relocated, 0);
        assert!(store.is_full());
    }
}
