//! Sequence reconciliation
//!
//! The [`Reconciler`] merges one edit list per video track into a single
//! [`Sequence`]:
//! 1. Build events from raw records, rejecting bad records individually
//! 2. Check that every list shares one record framerate
//! 3. Absorb dissolve transitions into the neighbouring clips
//! 4. Tag events with the track and sequence name of their list
//! 5. Drop filler, sort by record position then track, compute offsets
//!
//! Per-record problems are collected as [`RecordIssue`]s and never abort
//! the call. A filename that breaks the `_V<n>` convention or lists at
//! different framerates abort it.

use crate::config::ReconcileConfig;
use crate::event::Event;
use crate::locator::extract_vfx_metadata;
use crate::reader::{EditList, RawEventRecord};
use crate::sequence::Sequence;
use crate::timecode::{FrameRate, Timecode};
use crate::types::{Result, Track, TurnoverError};
use serde::Serialize;
use std::path::Path;

/// Why a record or locator was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The record could not be turned into an event
    Rejected,
    /// The event was kept but its VFX locator could not be applied
    LocatorSkipped,
}

/// A record-level problem found during reconciliation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordIssue {
    pub file: String,
    pub event_number: String,
    pub kind: IssueKind,
    pub message: String,
}

/// Result of one reconciliation call
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub sequence: Sequence,
    pub issues: Vec<RecordIssue>,
}

impl Reconciliation {
    /// True if no record was skipped
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Infer the track from an edit list filename ending in `_V<n>`
///
/// `reel1_V2.edl` is track 2. Anything else is a configuration error; a
/// silently guessed track would corrupt the sort order.
pub fn track_from_filename(filename: &str) -> Result<Track> {
    let convention = || TurnoverError::TrackNameConvention(filename.to_string());

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(convention)?;
    let (_, suffix) = stem.rsplit_once('_').ok_or_else(convention)?;
    let digits = suffix
        .strip_prefix(['V', 'v'])
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(convention)?;

    digits.parse::<u32>().map(Track::Number).map_err(|_| convention())
}

/// Merges per-track edit lists into one sequence
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    /// Create a reconciler with the given configuration
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile edit lists into one sorted sequence
    ///
    /// # Arguments
    /// * `lists` - One edit list per track, in any order
    ///
    /// # Returns
    /// * `Err(TrackNameConvention)` if a filename has no `_V<n>` suffix
    /// * `Err(FramerateMismatch)` if lists use different record framerates
    /// * `Ok(Reconciliation)` otherwise, with every skipped record listed
    ///
    /// # Example
    /// ```no_run
    /// use turnover_core::{Cmx3600Reader, EditListReader, FrameRate, ReconcileConfig, Reconciler};
    /// use std::path::Path;
    ///
    /// let reader = Cmx3600Reader::new(FrameRate::Fps23_98);
    /// let lists = vec![
    ///     reader.read_path(Path::new("reel1_V1.edl")).unwrap(),
    ///     reader.read_path(Path::new("reel1_V2.edl")).unwrap(),
    /// ];
    /// let result = Reconciler::new(ReconcileConfig::new()).reconcile(&lists).unwrap();
    /// for event in result.sequence.events() {
    ///     println!("{} {}", event.record_start, event.event_number);
    /// }
    /// ```
    pub fn reconcile(&self, lists: &[EditList]) -> Result<Reconciliation> {
        log::info!("Reconciling {} edit lists", lists.len());
        let mut issues = Vec::new();

        let mut staged = Vec::with_capacity(lists.len());
        for list in lists {
            let track = track_from_filename(&list.filename)?;
            let built = self.build_list(list, &mut issues)?;
            staged.push((list, track, built));
        }

        let mut sequence_rate: Option<FrameRate> = None;
        let mut sequence_start: Option<Timecode> = None;
        for (list, _, built) in &staged {
            let Some(local_start) = local_start(built) else {
                log::debug!("{}: no usable records", list.filename);
                continue;
            };
            match sequence_rate {
                Some(rate) if rate != local_start.rate() => {
                    return Err(TurnoverError::FramerateMismatch {
                        left: rate,
                        right: local_start.rate(),
                    });
                }
                _ => sequence_rate = Some(local_start.rate()),
            }
            if sequence_start.map_or(true, |s| local_start.frames() < s.frames()) {
                sequence_start = Some(local_start);
            }
        }

        let mut merged = Vec::new();
        for (list, track, built) in staged {
            let kept = self.merge_list(list, &track, built, &mut issues);
            merged.extend(kept);
        }

        let sequence = Sequence::build(merged, sequence_start)?;
        log::info!(
            "Reconciled {} events ({} with VFX), {} issues",
            sequence.len(),
            sequence.vfx_events().count(),
            issues.len()
        );

        Ok(Reconciliation { sequence, issues })
    }

    /// Build one event per record, `None` where the record was rejected
    fn build_list(&self, list: &EditList, issues: &mut Vec<RecordIssue>) -> Result<Vec<Option<Event>>> {
        let mut list_rate: Option<FrameRate> = None;
        let mut built = Vec::with_capacity(list.records.len());

        for record in &list.records {
            let result = Event::create(record.fields.clone(), self.config.reel_preference)
                .and_then(|event| match list_rate {
                    Some(rate) if rate != event.record_rate() => Err(TurnoverError::FramerateMismatch {
                        left: rate,
                        right: event.record_rate(),
                    }),
                    _ => Ok(event),
                });

            match result {
                Ok(event) => {
                    list_rate.get_or_insert(event.record_rate());
                    built.push(Some(event));
                }
                Err(e) if e.is_record_level() => {
                    log::warn!("{}: skipping event {}: {}", list.filename, event_number(record), e);
                    issues.push(RecordIssue {
                        file: list.filename.clone(),
                        event_number: event_number(record),
                        kind: IssueKind::Rejected,
                        message: e.to_string(),
                    });
                    built.push(None);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(built)
    }

    /// Walk one list, absorbing transitions and tagging the surviving events
    fn merge_list(
        &self,
        list: &EditList,
        track: &Track,
        mut built: Vec<Option<Event>>,
        issues: &mut Vec<RecordIssue>,
    ) -> Vec<Event> {
        let mut kept: Vec<Event> = Vec::new();
        // Record index that produced `kept.last()`
        let mut last_kept_record: Option<usize> = None;
        let mut absorbed = 0usize;

        for index in 0..built.len() {
            let record = &list.records[index];
            let Some(mut event) = built[index].take() else {
                continue;
            };

            if record.has_transition {
                let duration = record.incoming_transition_duration;

                let placeholder = index
                    .checked_sub(1)
                    .is_some_and(|prev| last_kept_record == Some(prev))
                    && kept.last().is_some_and(|e| e.record_duration() == 0);
                if placeholder {
                    log::debug!("{}: dropping placeholder before transition {}", list.filename, event.event_number);
                    kept.pop();
                    last_kept_record = None;
                }

                if let Some(previous) = kept.last_mut() {
                    extend_out(previous, &event, duration, &list.filename);
                }
                let follower = list
                    .records
                    .get(index + 1)
                    .filter(|next| !next.has_transition)
                    .and(built.get_mut(index + 1))
                    .and_then(Option::as_mut);
                if let Some(next) = follower {
                    extend_in(next, &event, duration, &list.filename);
                }

                absorbed += 1;
                continue;
            }

            event.track = Some(track.clone());
            event.sequence_name = Some(list.title.clone());
            kept.push(event);
            last_kept_record = Some(index);
        }

        if self.config.extract_vfx {
            for event in kept.iter_mut().filter(|e| !e.is_filler()) {
                if let Err(e) = extract_vfx_metadata(event, self.config.frame_count_start) {
                    log::warn!("{}: VFX locator on event {} skipped: {}", list.filename, event.event_number, e);
                    issues.push(RecordIssue {
                        file: list.filename.clone(),
                        event_number: event.event_number.clone(),
                        kind: IssueKind::LocatorSkipped,
                        message: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "{} (track {}): {} events, {} transitions absorbed",
            list.filename,
            track,
            kept.len(),
            absorbed
        );
        kept
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}

fn event_number(record: &RawEventRecord) -> String {
    record.fields.num.clone().unwrap_or_default()
}

fn local_start(built: &[Option<Event>]) -> Option<Timecode> {
    built
        .iter()
        .flatten()
        .map(|e| e.record_start)
        .min_by_key(|tc| tc.frames())
}

fn transition_frames(speed: f64, duration: u64) -> i64 {
    (speed * duration as f64).round() as i64
}

/// Extend the outgoing clip through the transition
fn extend_out(previous: &mut Event, transition: &Event, duration: u64, file: &str) {
    if previous.record_end != transition.record_start {
        log::debug!(
            "{}: event {} does not end at transition {}, no out-extension",
            file,
            previous.event_number,
            transition.event_number
        );
        return;
    }

    let frames = transition_frames(previous.speed(), duration);
    match previous.source_end.offset(frames) {
        Ok(source_end) => {
            previous.source_end = source_end;
            previous.record_end = transition.record_end;
        }
        Err(e) => log::warn!("{}: cannot extend event {}: {}", file, previous.event_number, e),
    }
}

/// Extend the incoming clip back to the start of the transition
fn extend_in(next: &mut Event, transition: &Event, duration: u64, file: &str) {
    if next.record_start != transition.record_end {
        log::debug!(
            "{}: event {} does not start at transition {}, no in-extension",
            file,
            next.event_number,
            transition.event_number
        );
        return;
    }

    let frames = transition_frames(next.speed(), duration);
    match next.source_start.offset(-frames) {
        Ok(source_start) => {
            next.source_start = source_start;
            next.record_start = transition.record_start;
        }
        Err(e) => log::warn!("{}: cannot extend event {}: {}", file, next.event_number, e),
    }
}
