//! CSV writer
//!
//! Header row plus one row per event, quoted per RFC 4180.

use super::project;
use crate::event::Event;
use crate::types::Result;
use std::borrow::Cow;
use std::io::Write;

fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, cells: &[S]) -> Result<()> {
    let line = cells
        .iter()
        .map(|cell| quote(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\r\n")?;
    Ok(())
}

/// Write events as CSV with the given columns
pub fn write_csv<W: Write, S: AsRef<str>>(writer: &mut W, events: &[Event], columns: &[S]) -> Result<()> {
    write_row(writer, columns)?;
    for event in events {
        write_row(writer, &project(event, columns))?;
    }
    writer.flush()?;
    log::debug!("Wrote {} CSV rows", events.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventFields;

    #[test]
    fn test_quoting() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_write_csv() {
        let event = Event::dummy(EventFields {
            clip_name: Some("Slug, take 2".to_string()),
            ..EventFields::default()
        })
        .unwrap();

        let mut out = Vec::new();
        write_csv(&mut out, &[event], &["clip_name", "rec_start_tc", "missing"]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "clip_name,rec_start_tc,missing\r\n\"Slug, take 2\",01:00:00:00,\r\n"
        );
    }

    #[test]
    fn test_empty_event_list_writes_header() {
        let mut out = Vec::new();
        write_csv::<_, &str>(&mut out, &[], &["clip_name"]).unwrap();
        assert_eq!(out, b"clip_name\r\n");
    }
}
