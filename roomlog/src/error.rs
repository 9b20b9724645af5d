//! Error types for the roomlog sensor log store.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for all roomlog operations.
///
/// Every variant is a rejected operation: the store is left exactly as it
/// was before the call.
#[derive(Error, Debug)]
pub enum RoomLogError {
    /// Error during room registration.
    #[error("room error: {0}")]
    Room(#[from] RoomError),

    /// Error during entry creation (write path).
    #[error("entry error: {0}")]
    Entry(#[from] EntryError),

    /// Error loading or validating store configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification of a [`RoomLogError`].
///
/// Callers that only need to pick a user-facing message match on this
/// instead of the detailed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A required room or entry reference did not resolve.
    NullReference,
    /// A room with the same name already exists.
    Duplicate,
    /// The registry, the entry store, or a room index is at capacity.
    Full,
    /// The reading kind is outside the closed set, or the payload is malformed.
    InvalidKind,
    /// A name or configuration value was rejected.
    InvalidInput,
}

impl RoomLogError {
    /// Returns the coarse classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Room(RoomError::Duplicate { .. }) => ErrorCode::Duplicate,
            Self::Room(RoomError::Full { .. }) => ErrorCode::Full,
            Self::Room(RoomError::InvalidName { .. }) => ErrorCode::InvalidInput,
            Self::Entry(EntryError::NullReference { .. } | EntryError::UnknownRoom { .. }) => {
                ErrorCode::NullReference
            }
            Self::Entry(
                EntryError::InvalidKind { .. }
                | EntryError::PayloadMismatch { .. }
                | EntryError::InvalidMotionFlag { .. },
            ) => ErrorCode::InvalidKind,
            Self::Entry(EntryError::StoreFull { .. } | EntryError::RoomFull { .. }) => {
                ErrorCode::Full
            }
            Self::Config(_) => ErrorCode::InvalidInput,
        }
    }
}

/// Errors that can occur during room registration.
#[derive(Error, Debug)]
pub enum RoomError {
    /// A room with this exact name is already registered.
    #[error("room '{name}' already exists")]
    Duplicate {
        /// The conflicting name.
        name: String,
    },

    /// The registry already holds the maximum number of rooms.
    #[error("cannot add more rooms (maximum {capacity} reached)")]
    Full {
        /// The registry capacity.
        capacity: usize,
    },

    /// The room name is empty or too long.
    #[error("invalid room name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why the name is invalid.
        reason: String,
    },
}

/// Errors that can occur when creating a log entry.
#[derive(Error, Debug)]
pub enum EntryError {
    /// The room handle does not refer to a registered room.
    #[error("room handle {room} does not refer to a registered room")]
    NullReference {
        /// The raw handle value.
        room: u32,
    },

    /// No room with this name is registered.
    #[error("room '{name}' not found")]
    UnknownRoom {
        /// The name that was looked up.
        name: String,
    },

    /// The reading kind selector is outside {1, 2, 3}.
    #[error("invalid reading kind selector {selector} (expected 1=TEMP, 2=DB, 3=MOTION)")]
    InvalidKind {
        /// The rejected selector.
        selector: i32,
    },

    /// The payload shape does not match the selected kind.
    #[error("payload of kind {payload} does not match reading kind {kind}")]
    PayloadMismatch {
        /// Label of the selected kind.
        kind: &'static str,
        /// Label of the kind the payload belongs to.
        payload: &'static str,
    },

    /// A motion flag is neither 0 nor 1.
    #[error("motion flag {index} must be 0 or 1, got {value}")]
    InvalidMotionFlag {
        /// Which of the three flags was rejected.
        index: usize,
        /// The rejected value.
        value: u8,
    },

    /// The global entry store is at capacity.
    #[error("cannot add more entries (maximum {capacity} reached)")]
    StoreFull {
        /// The store capacity.
        capacity: usize,
    },

    /// The owning room's index is at capacity.
    #[error("room '{room}' cannot hold more entries (maximum {capacity} reached)")]
    RoomFull {
        /// Name of the full room.
        room: String,
        /// The per-room capacity.
        capacity: usize,
    },
}

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Capacity must be between one and the maximum.
    #[error("invalid capacity: {capacity} (must be between 1 and {max})")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
        /// The largest accepted capacity.
        max: usize,
    },

    /// Maximum room name length must be at least one byte.
    #[error("invalid max_name_len: {len} (must be > 0)")]
    InvalidNameLength {
        /// The rejected length.
        len: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::StoreConfig`].
    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        /// The file path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// A violation found by the verification checks in [`crate::verify`].
///
/// Verification is a read-only diagnostic, so these are reported separately
/// from [`RoomLogError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Two adjacent slots in the global sequence are out of order.
    #[error("entries at slots {slot} and {} are out of order", slot + 1)]
    OutOfOrder {
        /// The first of the two offending slots.
        slot: usize,
    },

    /// A room's index is not sorted.
    #[error("room '{room}' index positions {position} and {} are out of order", position + 1)]
    RoomOutOfOrder {
        /// The room name.
        room: String,
        /// The first of the two offending index positions.
        position: usize,
    },

    /// An entry is not referenced by its owning room.
    #[error("entry at slot {slot} is missing from room '{room}'")]
    MissingFromRoom {
        /// The entry's slot.
        slot: usize,
        /// The owning room.
        room: String,
    },

    /// A room references an entry owned by a different room.
    #[error("room '{room}' references entry at slot {slot} owned by another room")]
    ForeignEntry {
        /// The room holding the bad reference.
        room: String,
        /// The referenced slot.
        slot: usize,
    },

    /// A room references the same entry more than once.
    #[error("room '{room}' references entry at slot {slot} more than once")]
    DuplicateReference {
        /// The room holding the duplicate.
        room: String,
        /// The referenced slot.
        slot: usize,
    },

    /// A room references an entry id the store does not hold.
    #[error("room '{room}' references unknown entry {entry}")]
    DanglingReference {
        /// The room holding the bad reference.
        room: String,
        /// The raw entry id.
        entry: u32,
    },

    /// The store's position table disagrees with the sorted sequence.
    #[error("position table maps entry {entry} to slot {recorded}, but it is at slot {actual}")]
    PositionMismatch {
        /// The raw entry id.
        entry: u32,
        /// Slot recorded in the position table.
        recorded: usize,
        /// Slot where the id actually sits.
        actual: usize,
    },

    /// Room index sizes do not add up to the store size.
    #[error("room indexes hold {indexed} references but the store holds {stored} entries")]
    CountMismatch {
        /// Total references across all room indexes.
        indexed: usize,
        /// Entries in the store.
        stored: usize,
    },
}

/// Type alias for `Result<T, RoomLogError>`.
pub type Result<T> = std::result::Result<T, RoomLogError>;
