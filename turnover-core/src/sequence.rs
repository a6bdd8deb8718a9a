//! Reconciled event lists
//!
//! A [`Sequence`] holds the events of one turnover across all tracks, with
//! filler removed, sorted by record position then track, and each event's
//! offset from the sequence start filled in.

use crate::event::Event;
use crate::timecode::Timecode;
use crate::types::Result;
use serde::Serialize;

/// Ordered events across tracks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sequence {
    sequence_start: Option<Timecode>,
    events: Vec<Event>,
}

impl Sequence {
    /// Build a sequence from merged events
    ///
    /// Drops filler, sorts with [`sort_events`] and sets
    /// `record_start_frame` relative to `sequence_start`.
    ///
    /// # Returns
    /// * `Err(FramerateMismatch)` if an event is not at the sequence rate
    /// * `Err(TimecodeUnderflow)` if an event starts before `sequence_start`
    pub fn build(events: Vec<Event>, sequence_start: Option<Timecode>) -> Result<Sequence> {
        let total = events.len();
        let mut events: Vec<Event> = events.into_iter().filter(|e| !e.is_filler()).collect();
        if events.len() < total {
            log::debug!("Dropped {} filler events", total - events.len());
        }

        sort_events(&mut events);

        if let Some(start) = &sequence_start {
            for event in &mut events {
                event.record_start_frame = Some(event.record_start.checked_sub(start)?.frames());
            }
        }

        Ok(Sequence {
            sequence_start,
            events,
        })
    }

    /// Events in sequence order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Earliest record start across all contributing lists
    pub fn sequence_start(&self) -> Option<&Timecode> {
        self.sequence_start.as_ref()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events carrying VFX metadata
    pub fn vfx_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.vfx.is_some())
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// Stable sort by record start frame, then track
///
/// Tracks compare with the [`Track`](crate::types::Track) total order; events
/// without a track sort first among equal record starts.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.record_start
            .frames()
            .cmp(&b.record_start.frames())
            .then_with(|| a.track.cmp(&b.track))
    });
}
