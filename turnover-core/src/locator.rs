//! Locator parsing and VFX metadata extraction
//!
//! Editors mark VFX shots with locators whose comment follows the vendor
//! convention `VFX=<id>=<element>=<brief>`. Vendors often leave out the
//! middle fields, so the id is taken from the front and the brief, then the
//! element, from the back.

use crate::event::{Event, VfxMetadata};
use crate::timecode::Timecode;
use crate::types::{Result, TurnoverError};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// First frame number of a VFX plate (studio convention)
pub const DEFAULT_FRAME_COUNT_START: u32 = 1009;

const VFX_MARKER: &str = "VFX=";

/// A parsed locator line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Record-side timecode text
    pub timecode: String,
    /// Colour or user token
    pub color: String,
    /// Free-text comment
    pub comment: String,
}

impl Locator {
    /// True if the comment carries VFX metadata
    pub fn is_vfx(&self) -> bool {
        self.comment
            .get(..VFX_MARKER.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(VFX_MARKER))
    }
}

fn locator_regex() -> &'static Regex {
    static LOCATOR: OnceLock<Regex> = OnceLock::new();
    LOCATOR.get_or_init(|| {
        Regex::new(r"^(?:\*\s*LOC:\s*)?(\d+:\d{2}:\d{2}:\d{2})\s+(\S+)\s*(.*)$")
            .expect("locator pattern is valid")
    })
}

fn vfx_token_regex() -> &'static Regex {
    static VFX_TOKEN: OnceLock<Regex> = OnceLock::new();
    VFX_TOKEN.get_or_init(|| {
        Regex::new(r"(?i)\sVFX=").expect("VFX token pattern is valid")
    })
}

/// Parse a locator of the form `[* LOC:] HH:MM:SS:FF <colour> <comment>`
///
/// Returns `None` if the text does not look like a locator. When extra
/// tokens sit between the colour and a `VFX=` comment, the comment starts at
/// the `VFX=` token.
pub fn parse_locator(text: &str) -> Option<Locator> {
    let caps = locator_regex().captures(text.trim())?;
    let mut comment = caps.get(3).map_or("", |m| m.as_str()).trim();

    let starts_with_marker = comment
        .get(..VFX_MARKER.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(VFX_MARKER));
    if !starts_with_marker {
        if let Some(m) = vfx_token_regex().find(comment) {
            comment = comment[m.start()..].trim_start();
        }
    }

    Some(Locator {
        timecode: caps[1].to_string(),
        color: caps[2].to_string(),
        comment: comment.to_string(),
    })
}

/// Lower-case the text, then capitalize its first character and the first
/// character after each `.`, `?` or `!`
pub fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize = true;
    for c in text.to_lowercase().chars() {
        if capitalize && !c.is_whitespace() {
            out.extend(c.to_uppercase());
            capitalize = false;
        } else {
            out.push(c);
        }
        if matches!(c, '.' | '?' | '!') {
            capitalize = true;
        }
    }
    out
}

/// Split a `VFX=` comment into (id, element, brief)
fn split_vfx_comment(comment: &str) -> Result<(String, String, String)> {
    let mut fields: Vec<&str> = comment.split('=').collect();
    fields.remove(0);

    let id = if fields.is_empty() {
        ""
    } else {
        fields.remove(0).trim()
    };
    if id.is_empty() {
        return Err(TurnoverError::MissingVfxId(comment.to_string()));
    }
    let brief = fields.pop().map(|b| sentence_case(b.trim())).unwrap_or_default();
    let element = fields.pop().map(|e| e.trim().to_string()).unwrap_or_default();

    Ok((id.to_string(), element, brief))
}

/// Populate `event.vfx` from its `VFX=` locators
///
/// Later VFX locators replace earlier ones. Locators that do not parse or
/// carry no `VFX=` comment are left alone. On error the event is not
/// modified. Repeated calls give the same result.
pub fn extract_vfx_metadata(event: &mut Event, frame_count_start: u32) -> Result<()> {
    let mut latest = None;

    for text in &event.locators {
        let Some(locator) = parse_locator(text) else {
            debug!("Event {}: ignoring unparseable locator '{}'", event.event_number, text);
            continue;
        };
        if !locator.is_vfx() {
            continue;
        }

        let (id, element, brief) = split_vfx_comment(&locator.comment)?;
        let record_tc = Timecode::parse(event.record_rate(), &locator.timecode)?;
        let locator_tc = event.source_tc_at(&record_tc)?;

        latest = Some(VfxMetadata {
            id,
            element,
            brief,
            locator_tc,
            locator_color: locator.color.trim().to_string(),
            frame_count_start,
        });
    }

    if let Some(vfx) = latest {
        debug!("Event {}: VFX {}", event.event_number, vfx.id_element());
        event.vfx = Some(vfx);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventFields;

    fn event_with(locators: &[&str]) -> Event {
        Event::dummy(EventFields {
            locators: locators.iter().map(|l| l.to_string()).collect(),
            ..EventFields::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_locator() {
        let loc = parse_locator("01:00:05:00 Yellow VFX=SHOT_010=EL01=Fix screen").unwrap();
        assert_eq!(loc.timecode, "01:00:05:00");
        assert_eq!(loc.color, "Yellow");
        assert_eq!(loc.comment, "VFX=SHOT_010=EL01=Fix screen");
        assert!(loc.is_vfx());
    }

    #[test]
    fn test_parse_locator_with_prefix_and_extra_tokens() {
        let loc = parse_locator("* LOC: 01:00:05:00 YELLOW   V1 VFX=SHOT_010").unwrap();
        assert_eq!(loc.color, "YELLOW");
        assert_eq!(loc.comment, "VFX=SHOT_010");

        let plain = parse_locator("* LOC: 01:00:05:00 RED    check focus").unwrap();
        assert_eq!(plain.comment, "check focus");
        assert!(!plain.is_vfx());

        assert!(parse_locator("no timecode here").is_none());
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("Fix screen"), "Fix screen");
        assert_eq!(sentence_case("REMOVE BOOM. paint out rig! ok?"), "Remove boom. Paint out rig! Ok?");
        assert_eq!(sentence_case(""), "");
    }

    #[test]
    fn test_full_vfx_locator() {
        let mut event = event_with(&["01:00:05:00 Yellow VFX=SHOT_010=EL01=Fix screen"]);
        extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap();
        let vfx = event.vfx.as_ref().unwrap();
        assert_eq!(vfx.id, "SHOT_010");
        assert_eq!(vfx.element, "EL01");
        assert_eq!(vfx.brief, "Fix screen");
        assert_eq!(vfx.locator_color, "Yellow");
        assert_eq!(vfx.frame_count_start, 1009);
        // Locator is 5s into the record range, so 5s into the source range
        assert_eq!(
            vfx.locator_tc.frames_since(&event.source_start).unwrap(),
            120
        );
    }

    #[test]
    fn test_id_only_locator() {
        let mut event = event_with(&["01:00:05:00 Yellow VFX=SHOT_020"]);
        extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap();
        let vfx = event.vfx.as_ref().unwrap();
        assert_eq!(vfx.id, "SHOT_020");
        assert_eq!(vfx.element, "");
        assert_eq!(vfx.brief, "");
    }

    #[test]
    fn test_brief_popped_before_element() {
        let mut event = event_with(&["01:00:05:00 Yellow VFX=SHOT_030=add muzzle flash"]);
        extract_vfx_metadata(&mut event, 1001).unwrap();
        let vfx = event.vfx.as_ref().unwrap();
        assert_eq!(vfx.element, "");
        assert_eq!(vfx.brief, "Add muzzle flash");
        assert_eq!(vfx.frame_count_start, 1001);

        let mut event = event_with(&["01:00:05:00 Yellow VFX=SHOT_040=EL01=extra=Brief"]);
        extract_vfx_metadata(&mut event, 1001).unwrap();
        let vfx = event.vfx.as_ref().unwrap();
        assert_eq!(vfx.element, "extra");
        assert_eq!(vfx.brief, "Brief");
    }

    #[test]
    fn test_missing_id_leaves_event_untouched() {
        let mut event = event_with(&["01:00:05:00 Yellow VFX==EL01=brief"]);
        let err = extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap_err();
        assert!(matches!(err, TurnoverError::MissingVfxId(_)));
        assert!(event.vfx.is_none());
    }

    #[test]
    fn test_last_vfx_locator_wins_and_plain_ignored() {
        let mut event = event_with(&[
            "01:00:01:00 Red VFX=SHOT_010",
            "01:00:02:00 Blue just a note",
            "01:00:03:00 Green VFX=SHOT_011=EL02=Later",
        ]);
        extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap();
        assert_eq!(event.vfx.as_ref().unwrap().id, "SHOT_011");
        assert_eq!(event.locators.len(), 3);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let mut event = event_with(&["01:00:05:00 Yellow VFX=SHOT_010=EL01=Fix screen"]);
        extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap();
        let first = event.clone();
        extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap();
        assert_eq!(event, first);
    }

    #[test]
    fn test_speed_scales_locator_offset() {
        let mut event = Event::dummy(EventFields {
            src_end_tc: Some("00:01:20:00".into()),
            locators: vec!["01:00:05:00 Yellow VFX=SHOT_050".to_string()],
            ..EventFields::default()
        })
        .unwrap();
        extract_vfx_metadata(&mut event, DEFAULT_FRAME_COUNT_START).unwrap();
        assert_eq!(event.vfx.unwrap().locator_tc.to_string(), "00:01:10:00");
    }
}
