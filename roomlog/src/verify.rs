//! Consistency checks over a [`LogBook`].
//!
//! These are read-only diagnostics. Each check returns the first violation it
//! finds as a [`VerifyError`]; `Ok(())` means the check passed.

use std::collections::HashSet;

use crate::error::VerifyError;
use crate::logbook::LogBook;

/// Checks that the global sequence is non-decreasing under the composite key.
///
/// # Errors
///
/// Returns [`VerifyError::OutOfOrder`] naming the first offending slot.
pub fn check_order(book: &LogBook) -> Result<(), VerifyError> {
    let store = book.store();
    for slot in 1..store.len() {
        let (Some((_, prev)), Some((_, next))) = (store.at(slot - 1), store.at(slot)) else {
            continue;
        };
        if book.key_of(prev) > book.key_of(next) {
            return Err(VerifyError::OutOfOrder { slot: slot - 1 });
        }
    }
    Ok(())
}

/// Checks that every entry is linked from exactly its owning room.
///
/// Verifies, in order:
///
/// 1. the position table agrees with the sorted sequence,
/// 2. each room index holds only live ids, owned by that room, without
///    duplicates, in composite-key order,
/// 3. every stored entry is referenced by its owner,
/// 4. the room indexes together hold exactly as many references as the
///    store holds entries.
///
/// # Errors
///
/// Returns the first [`VerifyError`] found.
pub fn check_room_links(book: &LogBook) -> Result<(), VerifyError> {
    let store = book.store();

    for (actual, &id) in store.ids().iter().enumerate() {
        let recorded = store.position_of(id);
        if recorded != Some(actual) {
            return Err(VerifyError::PositionMismatch {
                entry: id.get(),
                recorded: recorded.unwrap_or(usize::MAX),
                actual,
            });
        }
    }

    let mut indexed = 0;
    for (room_id, room) in book.rooms().iter() {
        let mut seen = HashSet::with_capacity(room.len());

        for (position, &id) in room.entries().iter().enumerate() {
            let (Some(entry), Some(slot)) = (store.get(id), store.position_of(id)) else {
                return Err(VerifyError::DanglingReference {
                    room: room.name().to_string(),
                    entry: id.get(),
                });
            };

            if entry.room != room_id {
                return Err(VerifyError::ForeignEntry {
                    room: room.name().to_string(),
                    slot,
                });
            }

            if !seen.insert(id) {
                return Err(VerifyError::DuplicateReference {
                    room: room.name().to_string(),
                    slot,
                });
            }

            if let Some(&next) = room.entries().get(position + 1)
                && let Some(next) = store.get(next)
                && book.key_of(entry) > book.key_of(next)
            {
                return Err(VerifyError::RoomOutOfOrder {
                    room: room.name().to_string(),
                    position,
                });
            }
        }

        indexed += room.len();
    }

    for (slot, (id, entry)) in store.iter().enumerate() {
        let linked = book
            .room(entry.room)
            .is_some_and(|owner| owner.entries().contains(&id));
        if !linked {
            return Err(VerifyError::MissingFromRoom {
                slot,
                room: book.room_name(entry.room).to_string(),
            });
        }
    }

    if indexed != store.len() {
        return Err(VerifyError::CountMismatch {
            indexed,
            stored: store.len(),
        });
    }

    Ok(())
}
