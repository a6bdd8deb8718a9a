//! Edit list readers
//!
//! A reader turns an edit-list file into an [`EditList`]: the list's title,
//! filename and framerate plus an ordered list of raw per-event records.
//! Records stay string-level ([`EventFields`]) so that the reconciler owns
//! every event construction decision.

use crate::event::EventFields;
use crate::timecode::FrameRate;
use crate::types::Result;
use serde::Serialize;
use std::path::Path;

pub mod cmx3600;

pub use cmx3600::Cmx3600Reader;

/// One raw record as read from an edit list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEventRecord {
    pub fields: EventFields,
    /// True if this record is the transition portion of a dissolve or wipe
    pub has_transition: bool,
    /// Transition length in frames
    pub incoming_transition_duration: u64,
}

impl RawEventRecord {
    /// A plain record with no transition
    pub fn new(fields: EventFields) -> Self {
        Self {
            fields,
            has_transition: false,
            incoming_transition_duration: 0,
        }
    }

    /// A transition record of `duration` frames
    pub fn transition(fields: EventFields, duration: u64) -> Self {
        Self {
            fields,
            has_transition: true,
            incoming_transition_duration: duration,
        }
    }
}

/// All records of one edit list file
#[derive(Debug, Clone, PartialEq)]
pub struct EditList {
    pub title: String,
    /// File name without directory, used for track inference
    pub filename: String,
    pub framerate: FrameRate,
    pub records: Vec<RawEventRecord>,
}

/// Summary of an edit list, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct EditListSummary {
    pub title: String,
    pub filename: String,
    pub framerate: FrameRate,
    pub records: usize,
    pub transitions: usize,
}

impl EditList {
    /// Summarize the list for reporting
    pub fn summary(&self) -> EditListSummary {
        EditListSummary {
            title: self.title.clone(),
            filename: self.filename.clone(),
            framerate: self.framerate,
            records: self.records.len(),
            transitions: self.records.iter().filter(|r| r.has_transition).count(),
        }
    }
}

/// Common trait for edit list readers
pub trait EditListReader {
    /// Read an edit list file
    fn read_path(&self, path: &Path) -> Result<EditList>;
}
