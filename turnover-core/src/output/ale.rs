//! Avid Log Exchange writer
//!
//! Writes a `Heading`, `Column` and `Data` section with tab-separated
//! values. Column names are translated to the names Media Composer expects
//! (`clip_name` becomes `Name`, `src_start_tc` becomes `Start` and so on);
//! names without a translation are written as given.

use super::project;
use crate::event::Event;
use crate::timecode::FrameRate;
use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Longer cells make Media Composer reject the whole import
pub const MAX_CELL_LENGTH: usize = 250;

const ALE_NAMES: [(&str, &str); 12] = [
    ("clip_name", "Name"),
    ("tape", "Tape"),
    ("reel", "Tape"),
    ("source_file", "Source File"),
    ("src_start_tc", "Start"),
    ("src_end_tc", "End"),
    ("src_duration", "Duration"),
    ("track", "Tracks"),
    ("frame_count_start", "Frame Count Start"),
    ("vfx_id", "VFX_ID"),
    ("vfx_brief", "Notes for Edit"),
    ("asc_sop", "ASC_SOP"),
];

/// Values of the `Heading` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AleHeader {
    #[serde(default = "default_video_format")]
    pub video_format: String,
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    #[serde(default = "default_fps")]
    pub fps: FrameRate,
}

fn default_video_format() -> String {
    "1080".to_string()
}

fn default_audio_format() -> String {
    "48khz".to_string()
}

fn default_fps() -> FrameRate {
    FrameRate::Fps23_98
}

impl Default for AleHeader {
    fn default() -> Self {
        Self {
            video_format: default_video_format(),
            audio_format: default_audio_format(),
            fps: default_fps(),
        }
    }
}

/// ALE spelling of a framerate
fn ale_fps(rate: FrameRate) -> &'static str {
    match rate {
        FrameRate::Fps23_98 => "23.976",
        other => other.as_str(),
    }
}

/// Translate a column name to its ALE spelling
pub fn ale_column_name(name: &str) -> &str {
    ALE_NAMES
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(name))
        .map_or(name, |(_, ale)| *ale)
}

fn clean_cell(value: &str) -> String {
    let flat = value.replace(['\t', '\r', '\n'], " ");
    if flat.chars().count() <= MAX_CELL_LENGTH {
        return flat;
    }
    let mut truncated: String = flat.chars().take(MAX_CELL_LENGTH - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Drop columns whose ALE name repeats an earlier column's
///
/// `tape` and `reel` both become `Tape`; Media Composer rejects a heading
/// that names a column twice.
fn unique_columns<S: AsRef<str>>(columns: &[S]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    let mut kept = Vec::with_capacity(columns.len());
    for column in columns.iter().map(|c| c.as_ref()) {
        let name = ale_column_name(column);
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            log::warn!("ALE column '{}' from '{}' already written, skipping", name, column);
            continue;
        }
        seen.push(name);
        kept.push(column);
    }
    kept
}

/// Write events as an ALE
///
/// Columns that map to an ALE name already in use are left out.
pub fn write_ale<W: Write, S: AsRef<str>>(
    writer: &mut W,
    events: &[Event],
    columns: &[S],
    header: &AleHeader,
) -> Result<()> {
    writeln!(writer, "Heading")?;
    writeln!(writer, "FIELD_DELIM\tTABS")?;
    writeln!(writer, "VIDEO_FORMAT\t{}", header.video_format)?;
    writeln!(writer, "AUDIO_FORMAT\t{}", header.audio_format)?;
    writeln!(writer, "FPS\t{}", ale_fps(header.fps))?;
    writeln!(writer)?;

    let columns = unique_columns(columns);
    let names: Vec<&str> = columns.iter().map(|c| ale_column_name(c)).collect();
    writeln!(writer, "Column")?;
    writeln!(writer, "{}", names.join("\t"))?;
    writeln!(writer)?;

    writeln!(writer, "Data")?;
    for event in events {
        let row: Vec<String> = project(event, &columns).iter().map(|v| clean_cell(v)).collect();
        writeln!(writer, "{}", row.join("\t"))?;
    }
    writer.flush()?;
    log::debug!("Wrote {} ALE rows", events.len());
    Ok(())
}
