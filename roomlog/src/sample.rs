//! Built-in sample data.
//!
//! [`load_sample`] populates a [`LogBook`] through the ordinary
//! `register_room` / `create_entry` calls, so it exercises the same paths as
//! interactive input. Readings are listed deliberately out of order to force
//! shifts in the middle of the store.

use crate::error::{EntryError, RoomError, RoomLogError};
use crate::logbook::LogBook;
use crate::reading::ReadingValue;

/// Rooms registered by [`load_sample`].
pub const SAMPLE_ROOMS: [&str; 5] = ["Kitchen", "Living Room", "Bedroom", "Garage", "Den"];

/// `(room, kind selector, payload, timestamp)` readings inserted by [`load_sample`].
pub const SAMPLE_READINGS: [(&str, i32, ReadingValue, i64); 16] = [
    ("Kitchen", 1, ReadingValue::Temperature(21.5), 1_000),
    ("Living Room", 2, ReadingValue::Decibels(42), 1_005),
    ("Bedroom", 3, ReadingValue::Motion([0, 0, 1]), 1_010),
    ("Kitchen", 2, ReadingValue::Decibels(58), 990),
    ("Garage", 1, ReadingValue::Temperature(8.25), 1_020),
    ("Den", 3, ReadingValue::Motion([1, 1, 0]), 995),
    ("Kitchen", 1, ReadingValue::Temperature(19.0), 900),
    ("Bedroom", 1, ReadingValue::Temperature(18.5), 1_030),
    ("Living Room", 3, ReadingValue::Motion([1, 0, 0]), 1_040),
    ("Den", 2, ReadingValue::Decibels(35), 1_050),
    ("Garage", 2, ReadingValue::Decibels(71), 960),
    ("Kitchen", 3, ReadingValue::Motion([0, 1, 0]), 1_060),
    ("Bedroom", 2, ReadingValue::Decibels(28), 950),
    ("Living Room", 1, ReadingValue::Temperature(22.75), 1_070),
    ("Den", 1, ReadingValue::Temperature(20.0), 940),
    ("Kitchen", 1, ReadingValue::Temperature(23.5), 1_000),
];

/// Outcome of a bulk load.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Rooms newly registered.
    pub rooms_added: usize,
    /// Entries created.
    pub entries_added: usize,
    /// Operations that were rejected, with a description of each.
    pub rejected: Vec<(String, RoomLogError)>,
}

impl LoadSummary {
    /// Returns `true` if every operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Loads the sample rooms and readings into `book`.
///
/// Rooms that already exist are reused. Every other rejection, including a
/// reading whose room could not be registered, is recorded in the summary
/// and loading continues with the next item.
pub fn load_sample(book: &mut LogBook) -> LoadSummary {
    let mut summary = LoadSummary::default();

    for name in SAMPLE_ROOMS {
        match book.register_room(name) {
            Ok(_) => summary.rooms_added += 1,
            Err(RoomLogError::Room(RoomError::Duplicate { .. })) => {}
            Err(e) => {
                tracing::warn!(room = name, "sample room rejected: {e}");
                summary.rejected.push((format!("register {name}"), e));
            }
        }
    }

    for (name, selector, value, timestamp) in SAMPLE_READINGS {
        let Some(room) = book.find_room(name) else {
            tracing::warn!(room = name, timestamp, "sample reading rejected: room not registered");
            summary.rejected.push((
                format!("entry {name}@{timestamp}"),
                EntryError::UnknownRoom {
                    name: name.to_string(),
                }
                .into(),
            ));
            continue;
        };
        match book.create_entry(room, selector, value, timestamp) {
            Ok(_) => summary.entries_added += 1,
            Err(e) => {
                tracing::warn!(room = name, timestamp, "sample reading rejected: {e}");
                summary
                    .rejected
                    .push((format!("entry {name}@{timestamp}"), e));
            }
        }
    }

    tracing::debug!(
        rooms = summary.rooms_added,
        entries = summary.entries_added,
        rejected = summary.rejected.len(),
        "sample load finished"
    );
    summary
}
