//! Avid SubCap caption files
//!
//! Captions are burned over the cut in the NLE to label VFX shots. The
//! format is a `@` comment header followed by `IN OUT` / text blocks
//! between `<begin subtitles>` and `<end subtitles>`.

use crate::event::Event;
use crate::timecode::Timecode;
use crate::types::Result;
use std::io::Write;

/// One caption over a record range
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub start: Timecode,
    pub end: Timecode,
    pub text: String,
}

/// `{vfx_id}: {vfx_brief}` over every VFX event
pub fn captions_for_vfx(events: &[Event]) -> Vec<Caption> {
    events
        .iter()
        .filter_map(|event| {
            let vfx = event.vfx.as_ref()?;
            Some(Caption {
                start: event.record_start,
                end: event.record_end,
                text: format!("{}: {}", vfx.id, vfx.brief),
            })
        })
        .collect()
}

/// Clip name over every named event
pub fn captions_for_clips(events: &[Event]) -> Vec<Caption> {
    events
        .iter()
        .filter_map(|event| {
            Some(Caption {
                start: event.record_start,
                end: event.record_end,
                text: event.clip_name.clone()?,
            })
        })
        .collect()
}

/// Write captions in SubCap format
pub fn write_subcap<W: Write>(writer: &mut W, captions: &[Caption]) -> Result<()> {
    writeln!(writer, "@ This file written by turnover {}", crate::VERSION)?;
    writeln!(writer)?;
    writeln!(writer, "<begin subtitles>")?;
    for caption in captions {
        // Line breaks inside a caption would end the block early
        let text = caption.text.replace(['\r', '\n'], " ");
        write!(writer, "{} {}\n{}\n\n", caption.start, caption.end, text)?;
    }
    writeln!(writer, "<end subtitles>")?;
    writer.flush()?;
    Ok(())
}
