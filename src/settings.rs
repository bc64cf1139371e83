//! The settings parser (C3): `name:value` pairs on a cue's timing line.
//!
//! Grounded on the host crate's `parse_cue_settings` (`src/vtt/parse.rs`),
//! trimmed to the five setting names spec.md names (no `region`, no
//! comma-separated line/position alignment suffixes — those are WHATWG
//! additions the distilled spec and its C original don't have).

use crate::log::{self, AsLogger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritingDirection {
    Horizontal,
    RightToLeft,
    LeftToRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineValue {
    Number(i64),
    Percentage(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Start,
    Middle,
    End,
    Left,
    Right,
}

/// Rendering hints parsed from a cue's settings string.
///
/// `snapToLine` has no textual setter in this grammar (spec.md §4.3 only
/// dispatches `vertical, line, position, size, align`); it is derived from
/// `line` instead, becoming `false` exactly when `line` is a percentage —
/// see SPEC_FULL.md §3.1. `pauseOnExit` is always `false`: nothing in the
/// settings grammar sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueSettings {
    pub vertical: WritingDirection,
    pub line: LineValue,
    pub position: u8,
    pub size: u8,
    pub align: TextAlignment,
    pub snap_to_line: bool,
    pub pause_on_exit: bool,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            vertical: WritingDirection::Horizontal,
            line: LineValue::Number(0),
            position: 50,
            size: 100,
            align: TextAlignment::Middle,
            snap_to_line: true,
            pause_on_exit: false,
        }
    }
}

fn parse_percentage(value: &str) -> Option<u8> {
    let digits = value.strip_suffix('%')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    (number <= 100).then_some(number as u8)
}

fn parse_line_value(value: &str) -> Option<LineValue> {
    if let Some(percentage) = parse_percentage(value) {
        return Some(LineValue::Percentage(percentage));
    }

    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: i64 = digits.parse().ok()?;
    Some(LineValue::Number(sign * number))
}

pub(crate) fn parse_settings(raw: &str, logger: &impl AsLogger, cue_id: &str) -> CueSettings {
    let mut settings = CueSettings::default();

    for word in raw.split_ascii_whitespace() {
        let Some((name, value)) = word.split_once(':') else {
            log::warning!(
                logger,
                "cue {cue_id:?}: malformed setting {word:?}, expected name:value"
            );
            continue;
        };

        if value.trim().is_empty() {
            log::warning!(logger, "cue {cue_id:?}: empty value for setting {name:?}");
            continue;
        }

        match name {
            "vertical" => match value {
                "rl" => settings.vertical = WritingDirection::RightToLeft,
                "lr" => settings.vertical = WritingDirection::LeftToRight,
                _ => log::warning!(logger, "cue {cue_id:?}: invalid vertical value {value:?}"),
            },
            "line" => match parse_line_value(value) {
                Some(line) => {
                    settings.snap_to_line = !matches!(line, LineValue::Percentage(_));
                    settings.line = line;
                }
                None => log::warning!(logger, "cue {cue_id:?}: invalid line value {value:?}"),
            },
            "position" => match parse_percentage(value) {
                Some(position) => settings.position = position,
                None => log::warning!(logger, "cue {cue_id:?}: invalid position value {value:?}"),
            },
            "size" => match parse_percentage(value) {
                Some(size) => settings.size = size,
                None => log::warning!(logger, "cue {cue_id:?}: invalid size value {value:?}"),
            },
            "align" => match value {
                "start" => settings.align = TextAlignment::Start,
                "middle" => settings.align = TextAlignment::Middle,
                "end" => settings.align = TextAlignment::End,
                "left" => settings.align = TextAlignment::Left,
                "right" => settings.align = TextAlignment::Right,
                _ => log::warning!(logger, "cue {cue_id:?}: invalid align value {value:?}"),
            },
            other => log::warning!(logger, "cue {cue_id:?}: unknown setting name {other:?}"),
        }
    }

    settings
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::log::Logger;

    fn parse(raw: &str) -> CueSettings {
        parse_settings(raw, &Logger, "test")
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(""), CueSettings::default());
    }

    #[test]
    fn align_and_line_percentage() {
        let settings = parse("align:start line:90%");
        assert_eq!(settings.align, TextAlignment::Start);
        assert_eq!(settings.line, LineValue::Percentage(90));
        assert!(!settings.snap_to_line);
    }

    #[test]
    fn negative_line_number() {
        let settings = parse("line:-3");
        assert_eq!(settings.line, LineValue::Number(-3));
        assert!(settings.snap_to_line);
    }

    #[test]
    fn unknown_setting_is_skipped_not_fatal() {
        let settings = parse("bogus:1 align:end");
        assert_eq!(settings.align, TextAlignment::End);
    }

    #[test]
    fn malformed_value_is_skipped_not_fatal() {
        let settings = parse("position:abc% align:left");
        assert_eq!(settings.position, 50);
        assert_eq!(settings.align, TextAlignment::Left);
    }

    #[test]
    fn later_assignment_wins() {
        let settings = parse("align:left align:right");
        assert_eq!(settings.align, TextAlignment::Right);
    }

    #[test]
    fn position_and_size_require_percent_suffix() {
        assert_eq!(parse("position:50").position, 50); // missing '%', rejected -> default
        assert_eq!(parse("position:50%").position, 50);
        assert_eq!(parse("size:150%").size, 100); // out of range -> default
        assert_eq!(parse("size:75%").size, 75);
    }

    #[test]
    fn idempotent() {
        let raw = "align:start line:-10 position:25% size:50% vertical:rl";
        assert_eq!(parse(raw), parse(raw));
    }
}
