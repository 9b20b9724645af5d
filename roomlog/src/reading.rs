//! Sensor reading kinds and payloads.
//!
//! A reading is one of a closed set of kinds, each with its own payload
//! shape. The kind also carries a fixed rank that is part of the composite
//! sort key: temperature sorts before sound level, which sorts before motion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EntryError, Result};

/// The closed set of sensor reading kinds.
///
/// The discriminant is both the input selector and the sort rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    /// Temperature in degrees Celsius.
    Temperature = 1,
    /// Sound level in decibels.
    Sound = 2,
    /// Three binary motion sensor flags.
    Motion = 3,
}

impl ReadingKind {
    /// All kinds in rank order.
    pub const ALL: [Self; 3] = [Self::Temperature, Self::Sound, Self::Motion];

    /// Resolves an input selector (1, 2 or 3) to a kind.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::InvalidKind`] for any other selector.
    pub fn from_selector(selector: i32) -> Result<Self> {
        match selector {
            1 => Ok(Self::Temperature),
            2 => Ok(Self::Sound),
            3 => Ok(Self::Motion),
            _ => Err(EntryError::InvalidKind { selector }.into()),
        }
    }

    /// Returns the sort rank of this kind.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Returns the short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "TEMP",
            Self::Sound => "DB",
            Self::Motion => "MOTION",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw reading payload as supplied by an input collaborator.
///
/// The payload is paired with a separate kind selector when creating an
/// entry; [`Reading::new`] checks that the two agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingValue {
    /// Degrees Celsius.
    Temperature(f32),
    /// Decibels.
    Decibels(i32),
    /// Motion flags, each 0 or 1.
    Motion([u8; 3]),
}

impl ReadingValue {
    /// Returns the kind this payload shape belongs to.
    pub fn kind(&self) -> ReadingKind {
        match self {
            Self::Temperature(_) => ReadingKind::Temperature,
            Self::Decibels(_) => ReadingKind::Sound,
            Self::Motion(_) => ReadingKind::Motion,
        }
    }
}

/// A validated reading: a kind with a payload of the matching shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Reading {
    /// Temperature in degrees Celsius.
    Temperature(f32),
    /// Sound level in decibels.
    Sound(i32),
    /// Motion sensor flags.
    Motion([bool; 3]),
}

impl Reading {
    /// Validates a kind selector and payload into a reading.
    ///
    /// # Errors
    ///
    /// - [`EntryError::InvalidKind`] if `selector` is outside {1, 2, 3}
    /// - [`EntryError::PayloadMismatch`] if `value` belongs to another kind
    /// - [`EntryError::InvalidMotionFlag`] if a motion flag is not 0 or 1
    ///
    /// # Examples
    ///
    /// ```rust
    /// use roomlog::{Reading, ReadingValue};
    ///
    /// let reading = Reading::new(3, ReadingValue::Motion([1, 0, 1])).unwrap();
    /// assert_eq!(reading, Reading::Motion([true, false, true]));
    ///
    /// assert!(Reading::new(9, ReadingValue::Decibels(40)).is_err());
    /// ```
    pub fn new(selector: i32, value: ReadingValue) -> Result<Self> {
        let kind = ReadingKind::from_selector(selector)?;

        if value.kind() != kind {
            return Err(EntryError::PayloadMismatch {
                kind: kind.label(),
                payload: value.kind().label(),
            }
            .into());
        }

        match value {
            ReadingValue::Temperature(celsius) => Ok(Self::Temperature(celsius)),
            ReadingValue::Decibels(db) => Ok(Self::Sound(db)),
            ReadingValue::Motion(raw) => {
                let mut flags = [false; 3];
                for (index, (&value, flag)) in raw.iter().zip(flags.iter_mut()).enumerate() {
                    *flag = match value {
                        0 => false,
                        1 => true,
                        _ => return Err(EntryError::InvalidMotionFlag { index, value }.into()),
                    };
                }
                Ok(Self::Motion(flags))
            }
        }
    }

    /// Returns the kind of this reading.
    pub fn kind(&self) -> ReadingKind {
        match self {
            Self::Temperature(_) => ReadingKind::Temperature,
            Self::Sound(_) => ReadingKind::Sound,
            Self::Motion(_) => ReadingKind::Motion,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature(celsius) => write!(f, "{celsius:.2}°C"),
            Self::Sound(db) => write!(f, "{db} dB"),
            Self::Motion([a, b, c]) => {
                write!(f, "[{},{},{}]", u8::from(*a), u8::from(*b), u8::from(*c))
            }
        }
    }
}
