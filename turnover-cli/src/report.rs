//! Run summary
//!
//! Counts what was read and reconciled and lists every skipped record.

use std::io::{self, Write};
use turnover_core::reader::{EditList, EditListSummary};
use turnover_core::Reconciliation;

/// Totals for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub records: usize,
    pub transitions: usize,
    pub events: usize,
    pub vfx_events: usize,
    pub issues: usize,
}

impl Summary {
    pub fn new(lists: &[EditList], result: &Reconciliation) -> Self {
        let per_list: Vec<EditListSummary> = lists.iter().map(EditList::summary).collect();
        Self {
            files: lists.len(),
            records: per_list.iter().map(|s| s.records).sum(),
            transitions: per_list.iter().map(|s| s.transitions).sum(),
            events: result.sequence.len(),
            vfx_events: result.sequence.vfx_events().count(),
            issues: result.issues.len(),
        }
    }
}

/// Write the summary and the issue list
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary, result: &Reconciliation) -> io::Result<()> {
    writeln!(out, "Files:       {}", summary.files)?;
    writeln!(out, "Records:     {} ({} transitions)", summary.records, summary.transitions)?;
    writeln!(out, "Events:      {}", summary.events)?;
    writeln!(out, "VFX events:  {}", summary.vfx_events)?;
    writeln!(out, "Issues:      {}", summary.issues)?;
    for issue in &result.issues {
        writeln!(
            out,
            "  {} event {} ({:?}): {}",
            issue.file, issue.event_number, issue.kind, issue.message
        )?;
    }
    Ok(())
}
