//! Property-based tests for the ordering and cross-reference invariants.
//!
//! Key invariants:
//! 1. The global sequence is always non-decreasing under the composite key
//! 2. Every entry is referenced exactly once, by its owning room
//! 3. Every room index stays sorted and resolves to live, owned entries
//! 4. A rejected insert leaves everything unchanged

use std::collections::HashMap;

use proptest::prelude::*;
use roomlog::verify::{check_order, check_room_links};
use roomlog::{ErrorCode, LogBook, ReadingValue, StoreConfig};

const ROOM_NAMES: [&str; 5] = ["Kitchen", "Den", "attic", "Bath", "Den 2"];

/// `(room index, kind selector, timestamp)`
fn op_strategy() -> impl Strategy<Value = (usize, i32, i64)> {
    (0..ROOM_NAMES.len(), 1..=3i32, -50i64..50)
}

fn payload(selector: i32, seed: i64) -> ReadingValue {
    match selector {
        1 => ReadingValue::Temperature(seed as f32 / 4.0),
        2 => ReadingValue::Decibels(i32::try_from(seed).unwrap_or(0)),
        _ => ReadingValue::Motion([u8::from(seed % 2 == 0), 0, 1]),
    }
}

fn populated(capacity: usize, ops: &[(usize, i32, i64)]) -> LogBook {
    let mut book = LogBook::new(StoreConfig::new(capacity, 31).unwrap()).unwrap();
    let rooms: Vec<_> = ROOM_NAMES
        .iter()
        .map(|name| book.register_room(name).unwrap())
        .collect();
    for &(room, selector, timestamp) in ops {
        let _ = book.create_entry(rooms[room], selector, payload(selector, timestamp), timestamp);
    }
    book
}

proptest! {
    #[test]
    fn prop_global_sequence_sorted(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let book = populated(64, &ops);

        prop_assert_eq!(book.len(), ops.len());
        prop_assert_eq!(check_order(&book), Ok(()));

        let keys: Vec<_> = book.entries().map(|(_, e)| book.key_of(e)).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_every_entry_indexed_once_by_owner(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let book = populated(64, &ops);

        let mut references = HashMap::new();
        for (room_id, room) in book.rooms().iter() {
            for &id in room.entries() {
                *references.entry(id).or_insert(0) += 1;
                prop_assert_eq!(book.entry(id).map(|e| e.room), Some(room_id));
            }
        }

        for (id, _) in book.entries() {
            prop_assert_eq!(references.get(&id).copied(), Some(1));
        }
        prop_assert_eq!(references.len(), book.len());
        prop_assert_eq!(check_room_links(&book), Ok(()));
    }

    #[test]
    fn prop_room_indexes_sound_under_churn(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let book = populated(64, &ops);

        for (room_id, room) in book.rooms().iter() {
            let view: Vec<_> = book.room_entries(room_id).unwrap().collect();
            prop_assert_eq!(view.len(), room.len());

            for window in view.windows(2) {
                prop_assert!(book.key_of(window[0].1) <= book.key_of(window[1].1));
            }

            for (id, entry) in view {
                let slot = book.store().position_of(id).unwrap();
                let (at_slot, stored) = book.store().at(slot).unwrap();
                prop_assert_eq!(at_slot, id);
                prop_assert_eq!(stored, entry);
                prop_assert_eq!(entry.room, room_id);
            }
        }
    }

    #[test]
    fn prop_room_view_matches_filtered_global(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let book = populated(64, &ops);

        for (room_id, _) in book.rooms().iter() {
            let from_index: Vec<_> = book.room_entries(room_id).unwrap().map(|(id, _)| id).collect();
            let from_global: Vec<_> = book
                .entries()
                .filter(|(_, e)| e.room == room_id)
                .map(|(id, _)| id)
                .collect();
            prop_assert_eq!(from_index, from_global);
        }
    }

    #[test]
    fn prop_full_store_rejects_without_change(
        ops in prop::collection::vec(op_strategy(), 8..30),
        extra in op_strategy(),
    ) {
        let mut book = populated(8, &ops);
        prop_assert_eq!(book.len(), 8);

        let before: Vec<_> = book.entries().map(|(id, e)| (id, *e)).collect();
        let room = book.find_room(ROOM_NAMES[extra.0]).unwrap();
        let err = book
            .create_entry(room, extra.1, payload(extra.1, extra.2), extra.2)
            .unwrap_err();

        prop_assert_eq!(err.code(), ErrorCode::Full);
        let after: Vec<_> = book.entries().map(|(id, e)| (id, *e)).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(check_room_links(&book), Ok(()));
    }
}
