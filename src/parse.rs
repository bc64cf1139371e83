//! The cue-stream parser (C4): the Initial/Header/Id/TimingsAndSettings/
//! CueText/NextCue/BadCue state machine that turns a whole file buffer
//! into a sequence of [`Cue`]s.
//!
//! Grounded on the host crate's `collect_block`/`parse` (`src/vtt/parse.rs`)
//! for the line-at-a-time dispatch shape, and on `original_source/webvtt.c`
//! (`ParseState`, `webvtt_parse_buffer`) for the exact state names and the
//! buffer-growth/truncation behavior spec.md asks for in place of the
//! original's fixed 4096-byte cap.

pub mod text;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::log::{self, AsLogger, Logger};
use crate::settings::{self, CueSettings};
use crate::timestamp::parse_timestamp;
use text::Node;

/// Default ceiling on how large an input buffer a [`Parser`] will retain
/// (spec.md §6, resolving the original's hardcoded 4096-byte truncation
/// bug with a configurable, much larger default).
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// A single parsed caption cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub id: Option<String>,
    pub start_ms: i64,
    pub end_ms: i64,
    /// The settings text as it appeared after the timing arrow, kept
    /// verbatim for diagnostics and round-tripping (spec.md §3); `None`
    /// when the timing line carried no settings at all.
    pub settings_raw: Option<String>,
    pub settings: CueSettings,
    pub text: String,
    pub nodes: Vec<Node>,
}

enum ParseState {
    Header,
    Id,
    TimingsAndSettings,
    CueText,
    NextCue,
    BadCue,
}

/// Parses WebVTT input into cues.
///
/// Holds no state across calls to [`Parser::parse_buffer`] beyond
/// configuration; there is no explicit `free`/`close` method to call when
/// done with a `Parser` or its output `Vec<Cue>` — both are released
/// through `Drop` like any other owned Rust value.
pub struct Parser {
    logger: Logger,
    max_buffer_size: usize,
}

impl AsLogger for Parser {
    fn as_logger(&self) -> &Logger {
        &self.logger
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            logger: Logger,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }

    pub fn with_max_buffer_size(max_buffer_size: usize) -> Self {
        Self {
            logger: Logger,
            max_buffer_size,
        }
    }

    pub fn parse_buffer(&mut self, input: &[u8]) -> Result<Vec<Cue>> {
        let input = if input.len() > self.max_buffer_size {
            log::warning!(
                &*self,
                "input of {} bytes exceeds max_buffer_size of {}, truncating",
                input.len(),
                self.max_buffer_size
            );
            &input[..self.max_buffer_size]
        } else {
            input
        };

        let text = std::str::from_utf8(input).map_err(|_| Error::InvalidUtf8)?;
        let mut cursor = ByteCursor::new(text.as_bytes());

        consume_signature(&mut cursor)?;

        let mut cues = Vec::new();
        let mut state = ParseState::Header;

        let mut pending_id: Option<String> = None;
        let mut pending_start: i64 = 0;
        let mut pending_end: i64 = 0;
        let mut pending_settings = CueSettings::default();
        let mut pending_settings_raw: Option<String> = None;
        let mut pending_text = String::new();

        loop {
            match state {
                ParseState::Header => {
                    if cursor.is_at_end() {
                        state = ParseState::NextCue;
                        continue;
                    }
                    // Header block is everything up to the first blank line.
                    if cursor.skip_blank_line() {
                        state = ParseState::Id;
                    } else {
                        cursor.take_line();
                        if cursor.is_at_end() {
                            state = ParseState::NextCue;
                        }
                    }
                }
                ParseState::Id => {
                    if cursor.is_at_end() {
                        state = ParseState::NextCue;
                        continue;
                    }
                    if cursor.skip_blank_line() {
                        // Stray blank lines between cues are skipped.
                        continue;
                    }

                    let line = cursor.take_line();
                    if line.contains("-->") {
                        // This line is actually the timings line; the cue
                        // has no identifier.
                        pending_id = None;
                        match parse_timings_and_settings(&line, &*self, "<no id>") {
                            Some((start, end, settings_raw, settings)) => {
                                pending_start = start;
                                pending_end = end;
                                pending_settings_raw = settings_raw;
                                pending_settings = settings;
                                pending_text.clear();
                                state = ParseState::CueText;
                            }
                            None => state = ParseState::BadCue,
                        }
                    } else {
                        pending_id = Some(line);
                        state = ParseState::TimingsAndSettings;
                    }
                }
                ParseState::TimingsAndSettings => {
                    if cursor.is_at_end() {
                        log::warning!(
                            &*self,
                            "cue {:?}: missing timings line",
                            pending_id.as_deref().unwrap_or("<no id>")
                        );
                        state = ParseState::NextCue;
                        continue;
                    }

                    let line = cursor.take_line();
                    let cue_id = pending_id.as_deref().unwrap_or("<no id>");
                    match parse_timings_and_settings(&line, &*self, cue_id) {
                        Some((start, end, settings_raw, settings)) => {
                            pending_start = start;
                            pending_end = end;
                            pending_settings_raw = settings_raw;
                            pending_settings = settings;
                            pending_text.clear();
                            state = ParseState::CueText;
                        }
                        None => state = ParseState::BadCue,
                    }
                }
                ParseState::CueText => {
                    if cursor.is_at_end() {
                        finish_cue(
                            &mut cues,
                            &mut pending_id,
                            pending_start,
                            pending_end,
                            &pending_settings_raw,
                            &pending_settings,
                            &pending_text,
                            &*self,
                        );
                        state = ParseState::NextCue;
                        continue;
                    }
                    if cursor.skip_blank_line() {
                        finish_cue(
                            &mut cues,
                            &mut pending_id,
                            pending_start,
                            pending_end,
                            &pending_settings_raw,
                            &pending_settings,
                            &pending_text,
                            &*self,
                        );
                        state = ParseState::Id;
                        continue;
                    }

                    let line = cursor.take_line();
                    if !pending_text.is_empty() {
                        pending_text.push('\n');
                    }
                    pending_text.push_str(&line);
                }
                ParseState::BadCue => {
                    // Skip lines until a blank line or end-of-input.
                    loop {
                        if cursor.is_at_end() || cursor.skip_blank_line() {
                            break;
                        }
                        cursor.take_line();
                    }
                    pending_id = None;
                    state = ParseState::NextCue;
                }
                ParseState::NextCue => {
                    if cursor.is_at_end() {
                        break;
                    }
                    state = ParseState::Id;
                }
            }
        }

        Ok(cues)
    }

    pub fn parse_file(&mut self, file: &mut impl std::io::Read) -> Result<Vec<Cue>> {
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        self.parse_buffer(&buffer)
    }

    pub fn parse_filename(&mut self, path: impl AsRef<std::path::Path>) -> Result<Vec<Cue>> {
        let mut file = std::fs::File::open(path)?;
        self.parse_file(&mut file)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn consume_signature(cursor: &mut ByteCursor) -> Result<()> {
    cursor.take_str("\u{FEFF}");

    if !cursor.take_str("WEBVTT") {
        return Err(Error::NotWebVtt);
    }

    match cursor.peek() {
        None => {}
        Some(b' ' | b'\t') => {
            cursor.take_line();
            return Ok(());
        }
        Some(b'\n' | b'\r' | b'\x0C') => {
            cursor.take_line();
            return Ok(());
        }
        _ => return Err(Error::NotWebVtt),
    }

    Ok(())
}

/// Consumes a mandatory run of one or more spaces/tabs. Fails (returning
/// `false`, leaving the cursor unmoved) if there isn't at least one.
fn require_spaces(cursor: &mut ByteCursor) -> bool {
    if !cursor.at_space() {
        return false;
    }
    cursor.skip_spaces();
    true
}

fn parse_timings_and_settings(
    line: &str,
    logger: &impl AsLogger,
    cue_id: &str,
) -> Option<(i64, i64, Option<String>, CueSettings)> {
    let mut cursor = ByteCursor::new(line.as_bytes());
    let start = parse_timestamp(&mut cursor)?;

    if !require_spaces(&mut cursor) {
        log::warning!(
            logger,
            "cue {cue_id:?}: expected whitespace before --> in timings line"
        );
        return None;
    }
    if !cursor.take_str("-->") {
        log::warning!(logger, "cue {cue_id:?}: expected --> in timings line");
        return None;
    }
    if !require_spaces(&mut cursor) {
        log::warning!(
            logger,
            "cue {cue_id:?}: expected whitespace after --> in timings line"
        );
        return None;
    }

    let end = parse_timestamp(&mut cursor)?;

    if start > end {
        log::warning!(
            logger,
            "cue {cue_id:?}: start timestamp {start} is after end timestamp {end}"
        );
        return None;
    }

    cursor.skip_spaces();
    let rest = &line[cursor.offset()..];
    let settings_raw = (!rest.trim().is_empty()).then(|| rest.to_owned());
    let settings = settings::parse_settings(rest, logger, cue_id);

    Some((start, end, settings_raw, settings))
}

#[allow(clippy::too_many_arguments)]
fn finish_cue(
    cues: &mut Vec<Cue>,
    pending_id: &mut Option<String>,
    start_ms: i64,
    end_ms: i64,
    settings_raw: &Option<String>,
    settings: &CueSettings,
    text: &str,
    logger: &impl AsLogger,
) {
    let nodes = text::parse_cue_text(text, logger, pending_id.as_deref().unwrap_or("<no id>"));
    cues.push(Cue {
        id: pending_id.take(),
        start_ms,
        end_ms,
        settings_raw: settings_raw.clone(),
        settings: *settings,
        text: text.to_owned(),
        nodes,
    });
}
