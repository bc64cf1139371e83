//! The timestamp scanner (C2): `HH:MM:SS.mmm` or `MM:SS.mmm` to milliseconds.

use crate::cursor::ByteCursor;

/// Parses a single timestamp expression at the cursor.
///
/// Grounded on the host crate's `collect_timestamp` (`src/vtt/parse.rs`),
/// adapted to return `i64` milliseconds over a byte cursor instead of `u32`
/// over a `&str`-backed buffer, and to enforce the exact digit-count rules
/// from the grammar in spec §4.2 rather than the WHATWG cue-timings-and-
/// settings algorithm the teacher implements.
pub(crate) fn parse_timestamp(cursor: &mut ByteCursor) -> Option<i64> {
    cursor.skip_spaces();

    let first = cursor.collect_digits();
    if first.is_empty() {
        return None;
    }
    let first_value: i64 = first.parse().ok()?;
    let hours_form = first.len() != 2 || first_value > 59;

    if !cursor.take_byte(b':') {
        return None;
    }

    let second = cursor.collect_digits();
    if second.len() != 2 {
        return None;
    }
    let second_value: i64 = second.parse().ok()?;

    let (hours, minutes, seconds) = if hours_form || cursor.peek() == Some(b':') {
        if !cursor.take_byte(b':') {
            return None;
        }
        let third = cursor.collect_digits();
        if third.len() != 2 {
            return None;
        }
        (first_value, second_value, third.parse::<i64>().ok()?)
    } else {
        (0, first_value, second_value)
    };

    if !cursor.take_byte(b'.') {
        return None;
    }

    let millis = cursor.collect_digits();
    if millis.len() != 3 {
        return None;
    }
    let millis_value: i64 = millis.parse().ok()?;

    if minutes > 59 || seconds > 59 {
        return None;
    }

    Some(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis_value)
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(text: &str) -> Option<i64> {
        let mut cursor = ByteCursor::new(text.as_bytes());
        parse_timestamp(&mut cursor)
    }

    #[test]
    fn minutes_form() {
        assert_eq!(parse("00:00.000"), Some(0));
        assert_eq!(parse("59:59.999"), Some(59 * 60_000 + 59 * 1000 + 999));
    }

    #[test]
    fn hours_form() {
        assert_eq!(parse("01:02:03.004"), Some(3_723_004));
        assert_eq!(parse("100:00:00.000"), Some(100 * 3_600_000));
    }

    #[test]
    fn rejects_out_of_range_minutes_or_seconds() {
        assert_eq!(parse("60:00.000"), None);
        assert_eq!(parse("00:60.000"), None);
        assert_eq!(parse("01:60:00.000"), None);
    }

    #[test]
    fn rejects_malformed_digit_counts() {
        assert_eq!(parse("0:00.000"), None); // minutes form needs 2-digit minutes
        assert_eq!(parse("00:00.00"), None); // millis must be exactly 3 digits
        assert_eq!(parse("00:0.000"), None);
    }

    #[test]
    fn short_first_run_forces_hours_form() {
        // A single leading digit can't be the 2-digit minutes field, so this
        // must be parsed as H:MM:SS.mmm.
        assert_eq!(parse("1:02:03.004"), Some(3_723_004));
    }

    #[test]
    fn rejects_missing_fields() {
        assert_eq!(parse("00:00"), None);
        assert_eq!(parse(""), None);
    }
}
