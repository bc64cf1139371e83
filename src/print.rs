//! Debug printing of cues back to `HH:MM:SS.mmm --> HH:MM:SS.mmm` form.
//!
//! Grounded on `original_source/webvtt.c`'s `webvtt_print_cue`, which
//! formats with `%02d:%02d:%02d.%03d` — hours get at least two digits but
//! grow past that for long-running captions, exactly like this crate's
//! `{:02}` formatting below.

use std::io::{self, Write};

use crate::parse::Cue;

fn write_timestamp(out: &mut impl Write, ms: i64) -> io::Result<()> {
    let millis = ms % 1000;
    let total_seconds = ms / 1000;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;

    write!(out, "{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Writes a cue in WebVTT cue-block form: optional id line, the raw
/// settings line if one was read, the timings line, then the cue text,
/// terminated with a blank line.
pub fn write_cue(out: &mut impl Write, cue: &Cue) -> io::Result<()> {
    if let Some(id) = &cue.id {
        writeln!(out, "{id}")?;
    }

    if let Some(settings_raw) = &cue.settings_raw {
        writeln!(out, "{settings_raw}")?;
    }

    write_timestamp(out, cue.start_ms)?;
    write!(out, " --> ")?;
    write_timestamp(out, cue.end_ms)?;
    writeln!(out)?;

    writeln!(out, "{}", cue.text)?;
    writeln!(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::CueSettings;

    #[test]
    fn formats_hours_minutes_seconds_millis() {
        let cue = Cue {
            id: Some("1".into()),
            start_ms: 3_723_004,
            end_ms: 3_725_500,
            settings_raw: None,
            settings: CueSettings::default(),
            text: "hello".into(),
            nodes: vec![],
        };

        let mut out = Vec::new();
        write_cue(&mut out, &cue).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1\n01:02:03.004 --> 01:02:05.500\nhello\n\n"
        );
    }

    #[test]
    fn hours_grow_past_two_digits() {
        let mut out = Vec::new();
        write_timestamp(&mut out, 100 * 3_600_000).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "100:00:00.000");
    }

    #[test]
    fn no_id_line_when_absent() {
        let cue = Cue {
            id: None,
            start_ms: 0,
            end_ms: 1000,
            settings_raw: None,
            settings: CueSettings::default(),
            text: "hi".into(),
            nodes: vec![],
        };
        let mut out = Vec::new();
        write_cue(&mut out, &cue).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "00:00:00.000 --> 00:00:01.000\nhi\n\n"
        );
    }

    #[test]
    fn settings_line_is_printed_between_id_and_timings() {
        let cue = Cue {
            id: Some("1".into()),
            start_ms: 0,
            end_ms: 1000,
            settings_raw: Some("align:left line:10%".into()),
            settings: CueSettings::default(),
            text: "hi".into(),
            nodes: vec![],
        };
        let mut out = Vec::new();
        write_cue(&mut out, &cue).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1\nalign:left line:10%\n00:00:00.000 --> 00:00:01.000\nhi\n\n"
        );
    }
}
