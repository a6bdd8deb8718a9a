//! Turnover Core Library
//!
//! Reconciles per-track edit lists into a single sorted event list for VFX
//! and footage-clearance turnovers, on top of a timecode type that keeps
//! pulldown framerates (23.98, 29.97) apart from their integer neighbours.
//!
//! # Architecture
//!
//! - [`timecode`]: frame-exact timecode algebra; frame counting uses the
//!   integer fps, elapsed time uses the fractional rate
//! - [`event`]: the flat event record and its field schema
//! - [`reader`]: CMX3600 EDL reader producing raw per-event records
//! - [`reconcile`]: transition absorption, filler removal, sorting
//! - [`locator`]: `VFX=` locator parsing
//! - [`output`]: CSV, ALE and SubCap writers
//!
//! The library does NOT:
//! - Extract frames, thumbnails or burn-ins
//! - Read ALE or XML sequences
//! - Talk to any database
//!
//! Directory traversal, parallel reading and configuration files live in
//! the application layer (turnover-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use turnover_core::{Cmx3600Reader, EditListReader, FrameRate, ReconcileConfig, Reconciler};
//! use turnover_core::output::{csv::write_csv, DEFAULT_COLUMNS};
//! use std::path::Path;
//!
//! let config = ReconcileConfig::new().with_frame_count_start(1001);
//! let reader = Cmx3600Reader::new(config.default_framerate);
//!
//! let lists = vec![
//!     reader.read_path(Path::new("reel1_V1.edl")).unwrap(),
//!     reader.read_path(Path::new("reel1_V2.edl")).unwrap(),
//! ];
//!
//! let result = Reconciler::new(config).reconcile(&lists).unwrap();
//! for issue in &result.issues {
//!     eprintln!("{} event {}: {}", issue.file, issue.event_number, issue.message);
//! }
//!
//! let mut out = std::io::stdout();
//! write_csv(&mut out, result.sequence.events(), &DEFAULT_COLUMNS).unwrap();
//! ```

// Public modules
pub mod config;
pub mod event;
pub mod locator;
pub mod output;
pub mod reader;
pub mod reconcile;
pub mod sequence;
pub mod timecode;
pub mod types;

// Re-export main types for convenience
pub use config::ReconcileConfig;
pub use event::{Event, EventField, EventFields, Reel, ReelPreference, TimecodeInput, VfxMetadata, UNIT_SPEED};
pub use locator::{extract_vfx_metadata, parse_locator, sentence_case, Locator, DEFAULT_FRAME_COUNT_START};
pub use reader::{Cmx3600Reader, EditList, EditListReader, RawEventRecord};
pub use reconcile::{track_from_filename, IssueKind, Reconciler, Reconciliation, RecordIssue};
pub use sequence::{sort_events, Sequence};
pub use timecode::{FrameRate, Timecode};
pub use types::{FieldValue, Result, Track, TurnoverError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
