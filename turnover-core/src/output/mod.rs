//! Output adapters
//!
//! Every adapter projects events through [`Event::get_field`], so schema
//! fields and custom fields are addressed the same way. Values that are not
//! set become empty cells.

use crate::event::Event;

pub mod ale;
pub mod csv;
pub mod subcap;

/// Columns written when the caller does not choose any
pub const DEFAULT_COLUMNS: [&str; 17] = [
    "clip_name",
    "reel",
    "rec_start_tc",
    "rec_end_tc",
    "src_start_tc",
    "src_end_tc",
    "src_framerate",
    "track",
    "sequence_name",
    "vfx_id",
    "vfx_element",
    "vfx_brief",
    "vfx_loc_tc",
    "vfx_loc_color",
    "frame_count_start",
    "asc_sop",
    "asc_sat",
];

/// Project an event onto named columns
pub fn project<S: AsRef<str>>(event: &Event, columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            event
                .get_field(column.as_ref())
                .map(|value| value.to_string())
                .unwrap_or_default()
        })
        .collect()
}
