//! Core types for the turnover library
//!
//! This module defines the error taxonomy shared by every stage of the
//! pipeline, the track identifier used for ordering, and the loosely typed
//! field values that output adapters project events into.

use crate::timecode::{FrameRate, Timecode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Result type for turnover operations
pub type Result<T> = std::result::Result<T, TurnoverError>;

/// Errors that can occur while building, reconciling or writing events
#[derive(Debug, thiserror::Error)]
pub enum TurnoverError {
    #[error("Malformed timecode '{input}': {reason}")]
    MalformedTimecode { input: String, reason: String },

    #[error("Framerate mismatch: {left} vs {right}")]
    FramerateMismatch { left: FrameRate, right: FrameRate },

    #[error("Ambiguous framerate: conflicting values {0:?} on one timecode range")]
    AmbiguousFramerate(Vec<String>),

    #[error("Unknown framerate: '{0}'")]
    UnknownFramerate(String),

    #[error("No framerate available for {0}")]
    MissingFramerate(&'static str),

    #[error("Timecode underflow: {frames} frames before 00:00:00:00")]
    TimecodeUnderflow { frames: i64 },

    #[error("Conflicting reel identity: tape '{tape}' and source file '{source_file}'")]
    ConflictingReelIdentity { tape: String, source_file: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("VFX locator without an id: '{0}'")]
    MissingVfxId(String),

    #[error("Cannot infer track from filename '{0}' (expected <name>_V<number>)")]
    TrackNameConvention(String),

    #[error("Failed to parse edit list {file} line {line}: {message}")]
    EditListParse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TurnoverError {
    /// Create a malformed timecode error
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTimecode {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// True if the error concerns a single record rather than the whole call.
    ///
    /// Record-level errors are skipped and reported by the reconciler;
    /// everything else aborts the reconciliation.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            TurnoverError::MalformedTimecode { .. }
                | TurnoverError::FramerateMismatch { .. }
                | TurnoverError::AmbiguousFramerate(_)
                | TurnoverError::UnknownFramerate(_)
                | TurnoverError::MissingFramerate(_)
                | TurnoverError::TimecodeUnderflow { .. }
                | TurnoverError::ConflictingReelIdentity { .. }
                | TurnoverError::MissingField(_)
                | TurnoverError::MissingVfxId(_)
        )
    }
}

/// Record track of an event
///
/// Tracks inferred from `_V<n>` filenames are numeric. Anything else is kept
/// as a label. Numbers sort before labels, numbers numerically and labels
/// lexically, which gives a total order across mixed inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Track {
    Number(u32),
    Label(String),
}

impl Track {
    /// Parse a track designation such as `3`, `V3` or `A1`
    ///
    /// A leading `V` (video) is dropped before the numeric check. Other
    /// designations stay labels.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('V')
            .or_else(|| trimmed.strip_prefix('v'))
            .unwrap_or(trimmed);
        match digits.parse::<u32>() {
            Ok(n) => Track::Number(n),
            Err(_) => Track::Label(trimmed.to_string()),
        }
    }
}

impl Ord for Track {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Track::Number(a), Track::Number(b)) => a.cmp(b),
            (Track::Number(_), Track::Label(_)) => Ordering::Less,
            (Track::Label(_), Track::Number(_)) => Ordering::Greater,
            (Track::Label(a), Track::Label(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Track {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Number(n) => write!(f, "{}", n),
            Track::Label(label) => write!(f, "{}", label),
        }
    }
}

impl From<u32> for Track {
    fn from(n: u32) -> Self {
        Track::Number(n)
    }
}

/// A single projected field value, as returned by `Event::get_field`
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text (names, reels, codes, custom fields)
    Text(String),
    /// Whole number (frame offsets, frame count start)
    Integer(i64),
    /// Floating-point value (speed)
    Float(f64),
    /// A timecode, rendered as HH:MM:SS:FF
    Timecode(Timecode),
    /// A framerate, rendered in its canonical spelling
    FrameRate(FrameRate),
    /// A track designation
    Track(Track),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{:.3}", v),
            FieldValue::Timecode(v) => write!(f, "{}", v),
            FieldValue::FrameRate(v) => write!(f, "{}", v),
            FieldValue::Track(v) => write!(f, "{}", v),
        }
    }
}

impl FieldValue {
    /// Borrow the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Get the timecode if this is a timecode value
    pub fn as_timecode(&self) -> Option<&Timecode> {
        match self {
            FieldValue::Timecode(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Float(v) => Some(*v as i64),
            FieldValue::Timecode(v) => i64::try_from(v.frames()).ok(),
            FieldValue::Track(Track::Number(n)) => Some(i64::from(*n)),
            _ => None,
        }
    }
}
