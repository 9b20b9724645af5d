//! # roomlog
//!
//! Bounded in-memory log store for sensor readings grouped by room.
//!
//! roomlog keeps every reading in one sequence sorted by room name, reading
//! kind, and timestamp, and gives each room its own sorted index into that
//! sequence. Inserting in the middle of the sequence shifts later entries;
//! the room indexes hold stable ids, and the store retargets its internal
//! positions on every shift, so no room ever sees a stale reference.
//!
//! ## Key Properties
//!
//! - Fixed capacity chosen at construction; exceeding it is a recoverable error
//! - Every rejected operation leaves the store untouched
//! - Entries with identical keys keep their insertion order
//! - Single-threaded, no background work, no persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use roomlog::{LogBook, ReadingValue, StoreConfig, verify};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut book = LogBook::new(StoreConfig::default())?;
//!
//! let kitchen = book.register_room("Kitchen")?;
//! book.create_entry(kitchen, 1, ReadingValue::Temperature(21.5), 100)?;
//! book.create_entry(kitchen, 3, ReadingValue::Motion([0, 1, 0]), 90)?;
//!
//! println!("{}", roomlog::report::format_room(&book, kitchen)?);
//! assert!(verify::check_room_links(&book).is_ok());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`LogBook`] - Top-level handle; owns rooms and entries, coordinates insertion
//! - [`StoreConfig`] - Capacity and name-length bounds
//! - [`RoomId`] / [`EntryId`] - Opaque, `Copy` handles
//! - [`Reading`] - Validated kind and payload
//!
//! ## Modules
//!
//! - [`logbook`] - Insertion coordinator and read paths
//! - [`room`] - Room registry and per-room indexes
//! - [`entry`] - Sorted entry storage and position table
//! - [`reading`] - Reading kinds and payloads
//! - [`report`] - Text and JSON rendering
//! - [`verify`] - Order and cross-reference checks
//! - [`sample`] - Built-in sample data loader
//! - [`config`] - Store configuration
//! - [`error`] - Error types

pub mod config;
pub mod entry;
pub mod error;
pub mod logbook;
pub mod reading;
pub mod report;
pub mod room;
pub mod sample;
pub mod verify;

// Re-export primary API types at crate root for convenience.
pub use config::StoreConfig;
pub use entry::{EntryId, LogEntry};
pub use error::{ErrorCode, Result, RoomLogError, VerifyError};
pub use logbook::{EntryKey, LogBook};
pub use reading::{Reading, ReadingKind, ReadingValue};
pub use room::{Room, RoomId};
