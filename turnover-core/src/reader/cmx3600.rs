//! CMX3600 EDL reader
//!
//! Reads the event lines and the comment conventions Avid and Resolve emit:
//! `FROM CLIP NAME`, `TO CLIP NAME`, `SOURCE FILE`, `LOC` and the ASC CDL
//! comments.
//!
//! ## Dissolves
//! A dissolve or wipe line `NNN REEL V D 024 ...` is split into a transition
//! record covering the first `024` frames and a clip record covering the
//! rest. The outgoing side is the zero-length cut line that precedes it with
//! the same event number.
//!
//! ## Known Limitations
//! - Drop-frame counting is not supported; `FCM: DROP FRAME` lists are read
//!   as non-drop.
//! - `M2` motion lines are ignored. Speed is derived from the source and
//!   record ranges.

use super::{EditList, EditListReader, RawEventRecord};
use crate::event::EventFields;
use crate::timecode::{FrameRate, Timecode};
use crate::types::{Result, TurnoverError};
use std::fs;
use std::path::Path;

/// Reel names that mark black or gap events
const FILLER_REELS: [&str; 3] = ["BL", "BLK", "BLACK"];

/// CMX3600 EDL reader
#[derive(Debug, Clone, Copy)]
pub struct Cmx3600Reader {
    framerate: FrameRate,
}

impl Cmx3600Reader {
    /// Create a reader for lists recorded at `framerate`
    pub fn new(framerate: FrameRate) -> Self {
        Self { framerate }
    }

    /// Record framerate assumed for every list
    pub fn framerate(&self) -> FrameRate {
        self.framerate
    }

    /// Parse EDL text
    ///
    /// # Arguments
    /// * `filename` - Name reported in errors and used for track inference
    /// * `text` - Full EDL contents
    pub fn parse_str(&self, filename: &str, text: &str) -> Result<EditList> {
        let mut state = ParseState::new(filename, self.framerate);
        for (index, line) in text.lines().enumerate() {
            state.line(index + 1, line.trim_start_matches('\u{feff}'))?;
        }
        Ok(state.finish())
    }
}

impl EditListReader for Cmx3600Reader {
    fn read_path(&self, path: &Path) -> Result<EditList> {
        log::info!("Reading CMX3600 edit list: {:?}", path);

        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let list = self.parse_str(&filename, &text)?;
        log::info!(
            "{}: '{}', {} records at {}",
            list.filename,
            list.title,
            list.records.len(),
            list.framerate
        );
        Ok(list)
    }
}

/// Case-insensitive `strip_prefix`
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

fn is_transition_code(code: &str) -> bool {
    code.eq_ignore_ascii_case("D") || code.starts_with(['W', 'w'])
}

fn frame_field(text: &str) -> Option<u64> {
    text.rsplit(':').next()?.parse().ok()
}

struct ParseState<'a> {
    filename: &'a str,
    framerate: FrameRate,
    title: Option<String>,
    records: Vec<RawEventRecord>,
    /// Record that comments attach to
    current: Option<usize>,
    /// Record that `FROM CLIP NAME` attaches to
    outgoing: Option<usize>,
}

impl<'a> ParseState<'a> {
    fn new(filename: &'a str, framerate: FrameRate) -> Self {
        Self {
            filename,
            framerate,
            title: None,
            records: Vec::new(),
            current: None,
            outgoing: None,
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> TurnoverError {
        TurnoverError::EditListParse {
            file: self.filename.to_string(),
            line,
            message: message.into(),
        }
    }

    fn line(&mut self, line_no: usize, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        if let Some(title) = strip_prefix_ci(line, "TITLE:") {
            self.title = Some(title.trim().to_string());
        } else if let Some(mode) = strip_prefix_ci(line, "FCM:") {
            let mode = mode.trim();
            if strip_prefix_ci(mode, "DROP").is_some() {
                log::warn!(
                    "{}:{}: drop-frame counting is not supported, reading '{}' timecode as non-drop",
                    self.filename,
                    line_no,
                    mode
                );
            }
        } else if let Some(body) = line.strip_prefix('*') {
            self.comment(line_no, line, body.trim());
        } else if line
            .split_whitespace()
            .next()
            .is_some_and(|t| t.bytes().all(|b| b.is_ascii_digit()))
        {
            self.event_line(line_no, line)?;
        } else {
            log::trace!("{}:{}: ignoring '{}'", self.filename, line_no, line);
        }
        Ok(())
    }

    fn comment(&mut self, line_no: usize, line: &str, body: &str) {
        let Some(current) = self.current else {
            log::trace!("{}:{}: comment before first event", self.filename, line_no);
            return;
        };

        if let Some(name) = strip_prefix_ci(body, "FROM CLIP NAME:") {
            match self.outgoing {
                Some(index) => self.records[index].fields.clip_name = Some(name.trim().to_string()),
                None => log::trace!("{}:{}: FROM CLIP NAME without outgoing event", self.filename, line_no),
            }
        } else if let Some(name) = strip_prefix_ci(body, "TO CLIP NAME:") {
            self.records[current].fields.clip_name = Some(name.trim().to_string());
        } else if let Some(file) = strip_prefix_ci(body, "SOURCE FILE:") {
            self.records[current].fields.source_file = Some(file.trim().to_string());
        } else if strip_prefix_ci(body, "LOC:").is_some() {
            self.records[current].fields.locators.push(line.to_string());
        } else if let Some(sop) = strip_prefix_ci(body, "ASC_SOP") {
            self.records[current]
                .fields
                .custom
                .insert("asc_sop".to_string(), sop.trim().to_string());
        } else if let Some(sat) = strip_prefix_ci(body, "ASC_SAT") {
            self.records[current]
                .fields
                .custom
                .insert("asc_sat".to_string(), sat.trim().to_string());
        } else {
            log::trace!("{}:{}: ignoring comment '{}'", self.filename, line_no, body);
        }
    }

    /// Rate of the source timecodes on one line
    ///
    /// Sources shot at a different rate than the list show up as frame fields
    /// that do not fit the list's fps. The slowest rate of the same family
    /// that fits is used instead.
    fn source_rate(&self, line_no: usize, texts: &[&str]) -> Result<FrameRate> {
        let widest = texts.iter().filter_map(|t| frame_field(t)).max().unwrap_or(0);
        if widest < self.framerate.nominal_fps() {
            return Ok(self.framerate);
        }

        match FrameRate::smallest_fitting(widest, self.framerate.is_pulldown()) {
            Some(rate) => {
                log::warn!(
                    "{}:{}: source frame {} does not fit {} fps, reading source as {}",
                    self.filename,
                    line_no,
                    widest,
                    self.framerate,
                    rate
                );
                Ok(rate)
            }
            None => Err(self.error(line_no, format!("no framerate fits source frame {}", widest))),
        }
    }

    fn timecode(&self, line_no: usize, rate: FrameRate, text: &str) -> Result<Timecode> {
        Timecode::parse(rate, text).map_err(|e| self.error(line_no, e.to_string()))
    }

    fn event_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 8 && tokens.len() != 9 {
            return Err(self.error(
                line_no,
                format!("expected 8 or 9 fields in event line, found {}", tokens.len()),
            ));
        }
        let (head, tcs) = tokens.split_at(tokens.len() - 4);
        let (num, reel, aux, tr_code) = (head[0], head[1], head[2], head[3]);

        let duration = match head.get(4) {
            Some(d) => Some(
                d.parse::<u64>()
                    .map_err(|_| self.error(line_no, format!("invalid transition duration '{}'", d)))?,
            ),
            None => None,
        };

        let src_rate = self.source_rate(line_no, &tcs[..2])?;
        let src_in = self.timecode(line_no, src_rate, tcs[0])?;
        let src_out = self.timecode(line_no, src_rate, tcs[1])?;
        let rec_in = self.timecode(line_no, self.framerate, tcs[2])?;
        let rec_out = self.timecode(line_no, self.framerate, tcs[3])?;

        let rec_rate = self.framerate;
        let tape = if FILLER_REELS.iter().any(|f| reel.eq_ignore_ascii_case(f)) {
            None
        } else {
            Some(reel.to_string())
        };
        let fields = |src: (Timecode, Timecode), rec: (Timecode, Timecode)| EventFields {
            num: Some(num.to_string()),
            tape: tape.clone(),
            tr_code: Some(tr_code.to_string()),
            aux: Some(aux.to_string()),
            src_framerate: Some(src_rate.to_string()),
            src_start_tc: Some(src.0.into()),
            src_end_tc: Some(src.1.into()),
            rec_framerate: Some(rec_rate.to_string()),
            rec_start_tc: Some(rec.0.into()),
            rec_end_tc: Some(rec.1.into()),
            ..EventFields::default()
        };

        if !is_transition_code(tr_code) {
            if duration.is_some() {
                log::trace!("{}:{}: ignoring duration on '{}' event", self.filename, line_no, tr_code);
            }
            let record = RawEventRecord::new(fields((src_in, src_out), (rec_in, rec_out)));
            self.records.push(record);
            self.current = Some(self.records.len() - 1);
            self.outgoing = self.current;
            return Ok(());
        }

        let duration = duration
            .ok_or_else(|| self.error(line_no, format!("transition '{}' without duration", tr_code)))?;
        let record_length = rec_out.frames().saturating_sub(rec_in.frames());
        if duration > record_length {
            return Err(self.error(
                line_no,
                format!("transition of {} frames exceeds event length {}", duration, record_length),
            ));
        }

        let rec_mid = Timecode::from_frames(rec_rate, rec_in.frames() + duration);
        let src_length = src_out.frames().saturating_sub(src_in.frames());
        let src_split = scaled_split(src_length, record_length, duration);
        let src_mid = Timecode::from_frames(src_rate, (src_in.frames() + src_split).min(src_out.frames()));

        self.outgoing = match self.records.last() {
            Some(prev) if prev.fields.num.as_deref() == Some(num) => Some(self.records.len() - 1),
            _ => None,
        };
        self.records.push(RawEventRecord::transition(
            fields((src_in, src_mid), (rec_in, rec_mid)),
            duration,
        ));
        self.records
            .push(RawEventRecord::new(fields((src_mid, src_out), (rec_mid, rec_out))));
        self.current = Some(self.records.len() - 1);
        Ok(())
    }

    fn finish(self) -> EditList {
        let title = self.title.unwrap_or_else(|| {
            Path::new(self.filename)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        EditList {
            title,
            filename: self.filename.to_string(),
            framerate: self.framerate,
            records: self.records,
        }
    }
}

/// Source frames covered by the first `duration` record frames of a line
///
/// The source range is split in proportion to the record split, so a
/// speed-changed or mixed-rate line keeps the same speed on both sides.
fn scaled_split(src_length: u64, record_length: u64, duration: u64) -> u64 {
    if record_length == 0 {
        return duration.min(src_length);
    }
    let speed = src_length as f64 / record_length as f64;
    ((speed * duration as f64).round() as u64).min(src_length)
}
