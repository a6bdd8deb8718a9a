//! Event model
//!
//! An [`Event`] is one clip instance on one track: source and record in/out
//! points, the authoritative reel identity, locators and any custom fields
//! a reader attached. Events are built from the flat string-level
//! [`EventFields`] record by [`Event::create`], which resolves reel identity
//! and framerates and rejects anything ambiguous.

use crate::timecode::{FrameRate, Timecode};
use crate::types::{FieldValue, Result, Track, TurnoverError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Speed of an event whose record range has zero length
pub const UNIT_SPEED: f64 = 1.0;

/// The single authoritative identity of an event's source media
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reel {
    /// Camera or tape name, as logged in the NLE
    Tape(String),
    /// Source media filename
    SourceFile(String),
}

impl Reel {
    /// The reel name regardless of which identity it is
    pub fn name(&self) -> &str {
        match self {
            Reel::Tape(name) | Reel::SourceFile(name) => name,
        }
    }
}

impl fmt::Display for Reel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which identity wins when both a tape and a source file are supplied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelPreference {
    /// Prefer the tape name (default)
    #[default]
    Tape,
    /// Prefer the source file name
    SourceFile,
}

impl ReelPreference {
    fn wrap(self, name: String) -> Reel {
        match self {
            ReelPreference::Tape => Reel::Tape(name),
            ReelPreference::SourceFile => Reel::SourceFile(name),
        }
    }
}

/// A timecode supplied either as text or already built
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeInput {
    Text(String),
    Built(Timecode),
}

impl From<&str> for TimecodeInput {
    fn from(text: &str) -> Self {
        TimecodeInput::Text(text.to_string())
    }
}

impl From<String> for TimecodeInput {
    fn from(text: String) -> Self {
        TimecodeInput::Text(text)
    }
}

impl From<Timecode> for TimecodeInput {
    fn from(tc: Timecode) -> Self {
        TimecodeInput::Built(tc)
    }
}

/// Flat string-level record that readers produce and [`Event::create`] consumes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFields {
    pub num: Option<String>,
    pub tape: Option<String>,
    pub source_file: Option<String>,
    pub reel: Option<String>,
    pub tr_code: Option<String>,
    pub aux: Option<String>,
    pub src_framerate: Option<String>,
    pub src_start_tc: Option<TimecodeInput>,
    pub src_end_tc: Option<TimecodeInput>,
    pub rec_framerate: Option<String>,
    pub rec_start_tc: Option<TimecodeInput>,
    pub rec_end_tc: Option<TimecodeInput>,
    pub clip_name: Option<String>,
    pub track: Option<String>,
    pub locators: Vec<String>,
    pub custom: BTreeMap<String, String>,
}

impl EventFields {
    /// Fill every unset field of `self` from `base`
    ///
    /// Locators and custom fields are taken from `base` only when `self`
    /// has none.
    pub fn or(self, base: EventFields) -> EventFields {
        EventFields {
            num: self.num.or(base.num),
            tape: self.tape.or(base.tape),
            source_file: self.source_file.or(base.source_file),
            reel: self.reel.or(base.reel),
            tr_code: self.tr_code.or(base.tr_code),
            aux: self.aux.or(base.aux),
            src_framerate: self.src_framerate.or(base.src_framerate),
            src_start_tc: self.src_start_tc.or(base.src_start_tc),
            src_end_tc: self.src_end_tc.or(base.src_end_tc),
            rec_framerate: self.rec_framerate.or(base.rec_framerate),
            rec_start_tc: self.rec_start_tc.or(base.rec_start_tc),
            rec_end_tc: self.rec_end_tc.or(base.rec_end_tc),
            clip_name: self.clip_name.or(base.clip_name),
            track: self.track.or(base.track),
            locators: if self.locators.is_empty() {
                base.locators
            } else {
                self.locators
            },
            custom: if self.custom.is_empty() {
                base.custom
            } else {
                self.custom
            },
        }
    }
}

/// VFX metadata extracted from a `VFX=` locator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VfxMetadata {
    pub id: String,
    pub element: String,
    pub brief: String,
    /// Locator position mapped onto the source range
    pub locator_tc: Timecode,
    pub locator_color: String,
    pub frame_count_start: u32,
}

impl VfxMetadata {
    /// Id and element joined with `_`, skipping empty parts
    pub fn id_element(&self) -> String {
        [self.id.as_str(), self.element.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// One clip instance on one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_number: String,
    pub reel: Option<Reel>,
    pub transition_code: String,
    pub aux_code: String,
    pub source_start: Timecode,
    pub source_end: Timecode,
    pub record_start: Timecode,
    pub record_end: Timecode,
    pub clip_name: Option<String>,
    pub track: Option<Track>,
    pub sequence_name: Option<String>,
    pub locators: Vec<String>,
    pub custom_fields: BTreeMap<String, String>,
    /// Frames from the sequence start, set by reconciliation
    pub record_start_frame: Option<u64>,
    /// Set by locator extraction
    pub vfx: Option<VfxMetadata>,
}

/// Fixed schema of named fields answered by [`Event::get_field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Num,
    Tape,
    SourceFile,
    Reel,
    TrCode,
    Aux,
    SrcFramerate,
    SrcStartTc,
    SrcEndTc,
    SrcDuration,
    RecFramerate,
    RecStartTc,
    RecEndTc,
    RecDuration,
    RecStartFrame,
    Speed,
    ClipName,
    Track,
    SequenceName,
    VfxId,
    VfxElement,
    VfxIdElement,
    VfxBrief,
    VfxLocTc,
    VfxLocColor,
    FrameCountStart,
}

impl EventField {
    pub const ALL: [EventField; 26] = [
        EventField::Num,
        EventField::Tape,
        EventField::SourceFile,
        EventField::Reel,
        EventField::TrCode,
        EventField::Aux,
        EventField::SrcFramerate,
        EventField::SrcStartTc,
        EventField::SrcEndTc,
        EventField::SrcDuration,
        EventField::RecFramerate,
        EventField::RecStartTc,
        EventField::RecEndTc,
        EventField::RecDuration,
        EventField::RecStartFrame,
        EventField::Speed,
        EventField::ClipName,
        EventField::Track,
        EventField::SequenceName,
        EventField::VfxId,
        EventField::VfxElement,
        EventField::VfxIdElement,
        EventField::VfxBrief,
        EventField::VfxLocTc,
        EventField::VfxLocColor,
        EventField::FrameCountStart,
    ];

    /// Column name of the field
    pub fn name(&self) -> &'static str {
        match self {
            EventField::Num => "num",
            EventField::Tape => "tape",
            EventField::SourceFile => "source_file",
            EventField::Reel => "reel",
            EventField::TrCode => "tr_code",
            EventField::Aux => "aux",
            EventField::SrcFramerate => "src_framerate",
            EventField::SrcStartTc => "src_start_tc",
            EventField::SrcEndTc => "src_end_tc",
            EventField::SrcDuration => "src_duration",
            EventField::RecFramerate => "rec_framerate",
            EventField::RecStartTc => "rec_start_tc",
            EventField::RecEndTc => "rec_end_tc",
            EventField::RecDuration => "rec_duration",
            EventField::RecStartFrame => "rec_start_frame",
            EventField::Speed => "speed",
            EventField::ClipName => "clip_name",
            EventField::Track => "track",
            EventField::SequenceName => "sequence_name",
            EventField::VfxId => "vfx_id",
            EventField::VfxElement => "vfx_element",
            EventField::VfxIdElement => "vfx_id_element",
            EventField::VfxBrief => "vfx_brief",
            EventField::VfxLocTc => "vfx_loc_tc",
            EventField::VfxLocColor => "vfx_loc_color",
            EventField::FrameCountStart => "frame_count_start",
        }
    }

    /// Case-insensitive lookup by column name
    pub fn from_name(name: &str) -> Option<EventField> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
    }
}

impl Event {
    /// Build an event from a flat record
    ///
    /// # Arguments
    /// * `fields` - String-level record produced by a reader
    /// * `preference` - Identity kept when tape and source file agree
    ///
    /// # Returns
    /// * `Err(ConflictingReelIdentity)` if tape and source file name different reels
    /// * `Err(AmbiguousFramerate | MissingFramerate | UnknownFramerate)` if a
    ///   range has no single framerate
    /// * `Err(MissingField)` if a required field is absent
    pub fn create(fields: EventFields, preference: ReelPreference) -> Result<Event> {
        let event_number = non_empty(fields.num).ok_or(TurnoverError::MissingField("num"))?;
        let reel = resolve_reel(fields.tape, fields.source_file, fields.reel, preference)?;

        let src_rate = resolve_rate(
            fields.src_framerate.as_deref(),
            [fields.src_start_tc.as_ref(), fields.src_end_tc.as_ref()],
            "source range",
        )?;
        let rec_rate = resolve_rate(
            fields.rec_framerate.as_deref(),
            [fields.rec_start_tc.as_ref(), fields.rec_end_tc.as_ref()],
            "record range",
        )?;

        let source_start = build_timecode(src_rate, fields.src_start_tc, "src_start_tc")?;
        let source_end = build_timecode(src_rate, fields.src_end_tc, "src_end_tc")?;
        let record_start = build_timecode(rec_rate, fields.rec_start_tc, "rec_start_tc")?;
        let record_end = build_timecode(rec_rate, fields.rec_end_tc, "rec_end_tc")?;
        source_end.checked_sub(&source_start)?;
        record_end.checked_sub(&record_start)?;

        if reel.is_none() {
            debug!("Event {} has no reel, treating as filler", event_number);
        }

        Ok(Event {
            event_number,
            reel,
            transition_code: fields.tr_code.unwrap_or_default(),
            aux_code: fields.aux.unwrap_or_default(),
            source_start,
            source_end,
            record_start,
            record_end,
            clip_name: non_empty(fields.clip_name),
            track: non_empty(fields.track).map(|t| Track::parse(&t)),
            sequence_name: None,
            locators: fields.locators,
            custom_fields: fields.custom,
            record_start_frame: None,
            vfx: None,
        })
    }

    /// Canonical test fixture with `overrides` applied on top
    ///
    /// Defaults: event 1, tape `SLUG`, cut on `V`, 24 fps, source
    /// 00:01:00:00-00:01:10:00, record 01:00:00:00-01:00:10:00, clip `Slug`,
    /// track 1.
    pub fn dummy(overrides: EventFields) -> Result<Event> {
        let base = EventFields {
            num: Some("1".to_string()),
            tape: Some("SLUG".to_string()),
            tr_code: Some("C".to_string()),
            aux: Some("V".to_string()),
            src_framerate: Some("24".to_string()),
            src_start_tc: Some("00:01:00:00".into()),
            src_end_tc: Some("00:01:10:00".into()),
            rec_framerate: Some("24".to_string()),
            rec_start_tc: Some("01:00:00:00".into()),
            rec_end_tc: Some("01:00:10:00".into()),
            clip_name: Some("Slug".to_string()),
            track: Some("1".to_string()),
            ..EventFields::default()
        };
        Event::create(overrides.or(base), ReelPreference::Tape)
    }

    /// True if the event has no source material
    pub fn is_filler(&self) -> bool {
        self.reel.is_none()
    }

    /// Source framerate
    pub fn source_rate(&self) -> FrameRate {
        self.source_start.rate()
    }

    /// Record framerate
    pub fn record_rate(&self) -> FrameRate {
        self.record_start.rate()
    }

    /// Source length in frames
    pub fn source_duration(&self) -> u64 {
        self.source_end.frames().saturating_sub(self.source_start.frames())
    }

    /// Record length in frames
    pub fn record_duration(&self) -> u64 {
        self.record_end.frames().saturating_sub(self.record_start.frames())
    }

    /// Source frames per record frame
    pub fn speed(&self) -> f64 {
        match self.record_duration() {
            0 => UNIT_SPEED,
            rec => self.source_duration() as f64 / rec as f64,
        }
    }

    /// Map a record-side timecode onto the source range using the event's speed
    pub fn source_tc_at(&self, record_tc: &Timecode) -> Result<Timecode> {
        let delta = record_tc.frames_since(&self.record_start)?;
        let shift = (self.speed() * delta as f64).round() as i64;
        self.source_start.offset(shift)
    }

    /// Look up a named field
    ///
    /// Fixed schema names match case-insensitively; anything else is looked
    /// up in the custom fields by exact name. Unset values are `None`.
    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match EventField::from_name(name) {
            Some(field) => self.schema_field(field),
            None => self
                .custom_fields
                .get(name)
                .map(|v| FieldValue::Text(v.clone())),
        }
    }

    fn schema_field(&self, field: EventField) -> Option<FieldValue> {
        let text = |s: &str| Some(FieldValue::Text(s.to_string()));
        let vfx = self.vfx.as_ref();
        match field {
            EventField::Num => text(&self.event_number),
            EventField::Tape => match &self.reel {
                Some(Reel::Tape(name)) => text(name),
                _ => None,
            },
            EventField::SourceFile => match &self.reel {
                Some(Reel::SourceFile(name)) => text(name),
                _ => None,
            },
            EventField::Reel => self.reel.as_ref().and_then(|r| text(r.name())),
            EventField::TrCode => text(&self.transition_code),
            EventField::Aux => text(&self.aux_code),
            EventField::SrcFramerate => Some(FieldValue::FrameRate(self.source_rate())),
            EventField::SrcStartTc => Some(FieldValue::Timecode(self.source_start)),
            EventField::SrcEndTc => Some(FieldValue::Timecode(self.source_end)),
            EventField::SrcDuration => Some(FieldValue::Integer(self.source_duration() as i64)),
            EventField::RecFramerate => Some(FieldValue::FrameRate(self.record_rate())),
            EventField::RecStartTc => Some(FieldValue::Timecode(self.record_start)),
            EventField::RecEndTc => Some(FieldValue::Timecode(self.record_end)),
            EventField::RecDuration => Some(FieldValue::Integer(self.record_duration() as i64)),
            EventField::RecStartFrame => self
                .record_start_frame
                .map(|f| FieldValue::Integer(f as i64)),
            EventField::Speed => Some(FieldValue::Float(self.speed())),
            EventField::ClipName => self.clip_name.as_deref().and_then(text),
            EventField::Track => self.track.clone().map(FieldValue::Track),
            EventField::SequenceName => self.sequence_name.as_deref().and_then(text),
            EventField::VfxId => vfx.and_then(|v| text(&v.id)),
            EventField::VfxElement => vfx.and_then(|v| text(&v.element)),
            EventField::VfxIdElement => vfx.and_then(|v| text(&v.id_element())),
            EventField::VfxBrief => vfx.and_then(|v| text(&v.brief)),
            EventField::VfxLocTc => vfx.map(|v| FieldValue::Timecode(v.locator_tc)),
            EventField::VfxLocColor => vfx.and_then(|v| text(&v.locator_color)),
            EventField::FrameCountStart => {
                vfx.map(|v| FieldValue::Integer(i64::from(v.frame_count_start)))
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Basename up to the first `.`, uppercased
fn reel_key(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = base.split('.').next().unwrap_or(base);
    stem.to_ascii_uppercase()
}

fn resolve_reel(
    tape: Option<String>,
    source_file: Option<String>,
    reel: Option<String>,
    preference: ReelPreference,
) -> Result<Option<Reel>> {
    match (non_empty(tape), non_empty(source_file)) {
        (Some(tape), Some(source_file)) => {
            if reel_key(&tape) != reel_key(&source_file) {
                return Err(TurnoverError::ConflictingReelIdentity { tape, source_file });
            }
            warn!(
                "Tape '{}' and source file '{}' both given, keeping {:?}",
                tape, source_file, preference
            );
            Ok(Some(match preference {
                ReelPreference::Tape => Reel::Tape(tape),
                ReelPreference::SourceFile => Reel::SourceFile(source_file),
            }))
        }
        (Some(tape), None) => Ok(Some(Reel::Tape(tape))),
        (None, Some(source_file)) => Ok(Some(Reel::SourceFile(source_file))),
        (None, None) => Ok(non_empty(reel).map(|name| preference.wrap(name))),
    }
}

fn resolve_rate(
    explicit: Option<&str>,
    inputs: [Option<&TimecodeInput>; 2],
    range: &'static str,
) -> Result<FrameRate> {
    let mut rates: Vec<FrameRate> = Vec::new();
    if let Some(raw) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        rates.push(FrameRate::normalize(raw)?);
    }
    for input in inputs.into_iter().flatten() {
        if let TimecodeInput::Built(tc) = input {
            if !rates.contains(&tc.rate()) {
                rates.push(tc.rate());
            }
        }
    }

    match rates.as_slice() {
        [] => Err(TurnoverError::MissingFramerate(range)),
        [rate] => Ok(*rate),
        _ => Err(TurnoverError::AmbiguousFramerate(
            rates.iter().map(|r| r.to_string()).collect(),
        )),
    }
}

fn build_timecode(
    rate: FrameRate,
    input: Option<TimecodeInput>,
    field: &'static str,
) -> Result<Timecode> {
    match input {
        Some(TimecodeInput::Text(text)) => Timecode::parse(rate, &text),
        Some(TimecodeInput::Built(tc)) => Ok(tc),
        None => Err(TurnoverError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> EventFields {
        EventFields::default()
    }

    #[test]
    fn test_dummy_fixture() {
        let event = Event::dummy(fields()).unwrap();
        assert_eq!(event.event_number, "1");
        assert_eq!(event.reel, Some(Reel::Tape("SLUG".to_string())));
        assert_eq!(event.source_rate(), FrameRate::Fps24);
        assert_eq!(event.record_duration(), 240);
        assert_eq!(event.speed(), 1.0);
        assert_eq!(event.track, Some(Track::Number(1)));
    }

    #[test]
    fn test_tape_only_and_source_only() {
        let tape = Event::dummy(fields()).unwrap();
        assert_eq!(tape.get_field("tape").unwrap().to_string(), "SLUG");
        assert!(tape.get_field("source_file").is_none());

        let mut base = Event::dummy(fields()).unwrap();
        base.reel = None;
        assert!(base.is_filler());
    }

    #[test]
    fn test_equivalent_reels_follow_preference() {
        let both = EventFields {
            tape: Some("A001C003".to_string()),
            source_file: Some("a001c003.mov".to_string()),
            ..fields()
        };
        let base = Event::dummy(fields()).unwrap();
        let merged = both.or(EventFields {
            num: Some(base.event_number.clone()),
            src_start_tc: Some(base.source_start.into()),
            src_end_tc: Some(base.source_end.into()),
            rec_start_tc: Some(base.record_start.into()),
            rec_end_tc: Some(base.record_end.into()),
            ..fields()
        });

        let tape = Event::create(merged.clone(), ReelPreference::Tape).unwrap();
        assert_eq!(tape.reel, Some(Reel::Tape("A001C003".to_string())));
        let file = Event::create(merged, ReelPreference::SourceFile).unwrap();
        assert_eq!(file.reel, Some(Reel::SourceFile("a001c003.mov".to_string())));
    }

    #[test]
    fn test_conflicting_reels_rejected() {
        let result = Event::dummy(EventFields {
            tape: Some("A001".to_string()),
            source_file: Some("B002.mov".to_string()),
            ..fields()
        });
        assert!(matches!(result, Err(TurnoverError::ConflictingReelIdentity { .. })));
    }

    #[test]
    fn test_bare_reel_uses_preference() {
        let fields = EventFields {
            reel: Some("C005".to_string()),
            tape: Some(String::new()),
            ..fields()
        };
        let base = Event::dummy(EventFields::default()).unwrap();
        let fields = EventFields {
            num: Some("7".to_string()),
            src_start_tc: Some(base.source_start.into()),
            src_end_tc: Some(base.source_end.into()),
            rec_start_tc: Some(base.record_start.into()),
            rec_end_tc: Some(base.record_end.into()),
            ..fields
        };
        let event = Event::create(fields, ReelPreference::SourceFile).unwrap();
        assert_eq!(event.reel, Some(Reel::SourceFile("C005".to_string())));
    }

    #[test]
    fn test_rate_from_built_timecodes() {
        let start = Timecode::parse(FrameRate::Fps25, "10:00:00:00").unwrap();
        let event = Event::create(
            EventFields {
                num: Some("1".to_string()),
                tape: Some("A".to_string()),
                src_start_tc: Some(start.into()),
                src_end_tc: Some("10:00:01:00".into()),
                rec_framerate: Some("25".to_string()),
                rec_start_tc: Some("01:00:00:00".into()),
                rec_end_tc: Some("01:00:01:00".into()),
                ..fields()
            },
            ReelPreference::Tape,
        )
        .unwrap();
        assert_eq!(event.source_rate(), FrameRate::Fps25);
        assert_eq!(event.source_duration(), 25);
    }

    #[test]
    fn test_ambiguous_and_missing_rates() {
        let built = Timecode::parse(FrameRate::Fps25, "00:01:00:00").unwrap();
        let ambiguous = Event::dummy(EventFields {
            src_start_tc: Some(built.into()),
            ..fields()
        });
        assert!(matches!(ambiguous, Err(TurnoverError::AmbiguousFramerate(_))));

        let missing = Event::create(
            EventFields {
                num: Some("1".to_string()),
                src_start_tc: Some("00:00:00:00".into()),
                src_end_tc: Some("00:00:01:00".into()),
                ..fields()
            },
            ReelPreference::Tape,
        );
        assert!(matches!(missing, Err(TurnoverError::MissingFramerate("source range"))));

        let unknown = Event::dummy(EventFields {
            rec_framerate: Some("48".to_string()),
            ..fields()
        });
        assert!(matches!(unknown, Err(TurnoverError::UnknownFramerate(_))));
    }

    #[test]
    fn test_missing_timecode() {
        let result = Event::create(
            EventFields {
                num: Some("1".to_string()),
                src_framerate: Some("24".to_string()),
                src_start_tc: Some("00:00:00:00".into()),
                ..fields()
            },
            ReelPreference::Tape,
        );
        assert!(matches!(result, Err(TurnoverError::MissingField("src_end_tc"))));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let result = Event::dummy(EventFields {
            rec_end_tc: Some("00:59:00:00".into()),
            ..fields()
        });
        assert!(matches!(result, Err(TurnoverError::TimecodeUnderflow { .. })));
    }

    #[test]
    fn test_speed() {
        let event = Event::dummy(EventFields {
            src_end_tc: Some("00:01:20:00".into()),
            ..fields()
        })
        .unwrap();
        assert_eq!(event.speed(), 2.0);

        let zero = Event::dummy(EventFields {
            rec_end_tc: Some("01:00:00:00".into()),
            ..fields()
        })
        .unwrap();
        assert_eq!(zero.speed(), UNIT_SPEED);
    }

    #[test]
    fn test_source_tc_at() {
        let event = Event::dummy(fields()).unwrap();
        let rec = Timecode::parse(FrameRate::Fps24, "01:00:05:00").unwrap();
        assert_eq!(event.source_tc_at(&rec).unwrap().to_string(), "00:01:05:00");
    }

    #[test]
    fn test_get_field_schema_and_custom() {
        let mut custom = BTreeMap::new();
        custom.insert("asc_sop".to_string(), "(1 1 1)(0 0 0)(1 1 1)".to_string());
        let event = Event::dummy(EventFields {
            custom,
            ..fields()
        })
        .unwrap();

        assert_eq!(event.get_field("CLIP_NAME").unwrap().to_string(), "Slug");
        assert_eq!(event.get_field("rec_start_tc").unwrap().to_string(), "01:00:00:00");
        assert_eq!(event.get_field("src_framerate").unwrap().to_string(), "24");
        assert_eq!(event.get_field("speed").unwrap().to_string(), "1.000");
        assert_eq!(event.get_field("rec_duration").unwrap().as_i64(), Some(240));
        assert_eq!(
            event.get_field("asc_sop").unwrap().as_text(),
            Some("(1 1 1)(0 0 0)(1 1 1)")
        );
        assert!(event.get_field("ASC_SOP").is_none());
        assert!(event.get_field("vfx_id").is_none());
        assert!(event.get_field("rec_start_frame").is_none());
        assert!(event.get_field("no_such_field").is_none());
    }

    #[test]
    fn test_id_element() {
        let tc = Timecode::parse(FrameRate::Fps24, "00:00:00:00").unwrap();
        let mut vfx = VfxMetadata {
            id: "SHOT_010".to_string(),
            element: "EL01".to_string(),
            brief: String::new(),
            locator_tc: tc,
            locator_color: "Yellow".to_string(),
            frame_count_start: 1009,
        };
        assert_eq!(vfx.id_element(), "SHOT_010_EL01");
        vfx.element.clear();
        assert_eq!(vfx.id_element(), "SHOT_010");
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in EventField::ALL {
            assert_eq!(EventField::from_name(field.name()), Some(field));
        }
    }
}
