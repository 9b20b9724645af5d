//! Human-readable and JSON renderings of a [`LogBook`].
//!
//! Text output is a fixed-width table:
//!
//! ```text
//! ROOM             TIMESTAMP  TYPE        VALUE
//! --------------- ----------  ----------  ---------------
//! Kitchen                 10  TEMP        19.00°C
//! ```
//!
//! The JSON views ([`EntryRecord`], [`RoomRecord`]) carry the same data for
//! machine consumers.

use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;
use crate::error::{EntryError, Result};
use crate::logbook::LogBook;
use crate::reading::{Reading, ReadingKind};
use crate::room::RoomId;

const TABLE_HEADER: &str = "ROOM             TIMESTAMP  TYPE        VALUE";
const TABLE_RULE: &str = "--------------- ----------  ----------  ---------------";
const NO_ENTRIES: &str = "  (No entries)";
const NO_ROOMS: &str = "  (No rooms)";

/// Renders one entry as a table row (without trailing newline).
///
/// # Errors
///
/// Returns [`EntryError::NullReference`] if the entry's room is not
/// registered in `book`.
pub fn format_entry(book: &LogBook, entry: &LogEntry) -> Result<String> {
    let room = book
        .room(entry.room)
        .ok_or(EntryError::NullReference {
            room: entry.room.get(),
        })?;
    Ok(format!(
        "{:<15} {:>10}  {:<10}  {}",
        room.name(),
        entry.timestamp,
        entry.reading.kind().label(),
        entry.reading
    ))
}

/// Renders a room header followed by its entries in index order.
///
/// # Errors
///
/// Returns [`EntryError::NullReference`] if `room` is not registered.
pub fn format_room(book: &LogBook, room: RoomId) -> Result<String> {
    let Some(entries) = book.room_entries(room) else {
        return Err(EntryError::NullReference { room: room.get() }.into());
    };
    let name = book.room_name(room);
    let count = book.room(room).map_or(0, |r| r.len());

    let mut out = format!("Room: {name} (entries={count})\n");
    write_table(book, &mut out, entries.map(|(_, entry)| entry))?;
    Ok(out)
}

/// Renders every entry in global sorted order.
///
/// # Errors
///
/// Propagates [`format_entry`] failures.
pub fn format_all_entries(book: &LogBook) -> Result<String> {
    let mut out = String::new();
    write_table(book, &mut out, book.entries().map(|(_, entry)| entry))?;
    Ok(out)
}

/// Renders every room, in registration order, separated by blank lines.
///
/// # Errors
///
/// Propagates [`format_room`] failures.
pub fn format_all_rooms(book: &LogBook) -> Result<String> {
    if book.rooms().is_empty() {
        return Ok(format!("{NO_ROOMS}\n"));
    }

    let mut blocks = Vec::with_capacity(book.rooms().len());
    for (id, _) in book.rooms().iter() {
        blocks.push(format_room(book, id)?);
    }
    Ok(blocks.join("\n"))
}

fn write_table<'a>(
    book: &LogBook,
    out: &mut String,
    entries: impl Iterator<Item = &'a LogEntry>,
) -> Result<()> {
    let mut entries = entries.peekable();
    if entries.peek().is_none() {
        out.push_str(NO_ENTRIES);
        out.push('\n');
        return Ok(());
    }

    out.push_str(TABLE_HEADER);
    out.push('\n');
    out.push_str(TABLE_RULE);
    out.push('\n');
    for entry in entries {
        out.push_str(&format_entry(book, entry)?);
        out.push('\n');
    }
    Ok(())
}

/// Serializable view of one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Owning room name.
    pub room: String,
    /// Entry timestamp.
    pub timestamp: i64,
    /// Reading kind.
    pub kind: ReadingKind,
    /// Reading payload.
    pub reading: Reading,
}

impl EntryRecord {
    /// Builds the view of `entry` as seen through `book`.
    pub fn new(book: &LogBook, entry: &LogEntry) -> Self {
        Self {
            room: book.room_name(entry.room).to_string(),
            timestamp: entry.timestamp,
            kind: entry.reading.kind(),
            reading: entry.reading,
        }
    }
}

/// Serializable view of one room and its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Room name.
    pub name: String,
    /// The room's entries in index order.
    pub entries: Vec<EntryRecord>,
}

/// Returns every entry in global sorted order as serializable records.
pub fn entry_records(book: &LogBook) -> Vec<EntryRecord> {
    book.entries()
        .map(|(_, entry)| EntryRecord::new(book, entry))
        .collect()
}

/// Returns every room, in registration order, as serializable records.
pub fn room_records(book: &LogBook) -> Vec<RoomRecord> {
    book.rooms()
        .iter()
        .map(|(id, room)| RoomRecord {
            name: room.name().to_string(),
            entries: book
                .room_entries(id)
                .into_iter()
                .flatten()
                .map(|(_, entry)| EntryRecord::new(book, entry))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::ReadingValue;

    fn sample_book() -> (LogBook, RoomId, RoomId) {
        let mut book = LogBook::default();
        let kitchen = book.register_room("Kitchen").unwrap();
        let den = book.register_room("Den").unwrap();
        book.create_entry(kitchen, 1, ReadingValue::Temperature(21.5), 100)
            .unwrap();
        book.create_entry(den, 2, ReadingValue::Decibels(40), 50)
            .unwrap();
        book.create_entry(kitchen, 3, ReadingValue::Motion([1, 0, 1]), 7)
            .unwrap();
        (book, kitchen, den)
    }

    #[test]
    fn test_format_entry_rows() {
        let (book, _, _) = sample_book();
        let rows: Vec<_> = book
            .entries()
            .map(|(_, e)| format_entry(&book, e).unwrap())
            .collect();

        assert_eq!(rows[0], "Den                     50  DB          40 dB");
        assert_eq!(rows[1], "Kitchen                100  TEMP        21.50°C");
        assert_eq!(rows[2], "Kitchen                  7  MOTION      [1,0,1]");
    }

    #[test]
    fn test_format_entry_unknown_room() {
        let (book, _, _) = sample_book();
        let mut other = LogBook::default();
        for name in ["a", "b", "c"] {
            other.register_room(name).unwrap();
        }
        let stray = other.find_room("c").unwrap();
        let entry = LogEntry::new(stray, Reading::Sound(1), 1);

        assert!(format_entry(&book, &entry).is_err());
    }

    #[test]
    fn test_format_room() {
        let (book, kitchen, _) = sample_book();
        let text = format_room(&book, kitchen).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Room: Kitchen (entries=2)");
        assert_eq!(lines[1], TABLE_HEADER);
        assert_eq!(lines[2], TABLE_RULE);
        assert!(lines[3].contains("TEMP"));
        assert!(lines[4].contains("MOTION"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_empty_renderings() {
        let mut book = LogBook::default();
        assert_eq!(format_all_entries(&book).unwrap(), "  (No entries)\n");
        assert_eq!(format_all_rooms(&book).unwrap(), "  (No rooms)\n");

        let attic = book.register_room("Attic").unwrap();
        assert_eq!(
            format_room(&book, attic).unwrap(),
            "Room: Attic (entries=0)\n  (No entries)\n"
        );
    }

    #[test]
    fn test_format_all_entries() {
        let (book, _, _) = sample_book();
        let text = format_all_entries(&book).unwrap();
        assert_eq!(text.lines().count(), 2 + book.len());
        assert!(text.starts_with(TABLE_HEADER));
    }

    #[test]
    fn test_records_serialize() {
        let (book, _, _) = sample_book();

        let entries = entry_records(&book);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].room, "Den");

        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["kind"], "sound");
        assert_eq!(json["reading"]["value"], 40);

        let rooms = room_records(&book);
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "Kitchen");
        assert_eq!(rooms[0].entries.len(), 2);
        assert_eq!(rooms[1].entries.len(), 1);
    }
}
