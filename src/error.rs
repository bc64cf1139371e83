use thiserror::Error;

/// Failures that abort an entire parse.
///
/// Everything else (bad timestamps, bad settings, unknown tags, unmatched
/// end tags, input truncation) is cue-local or setting-local and never
/// surfaces here; it is logged through the diagnostic sink instead (see
/// [`crate::log`]) and handled in place by dropping the cue or skipping the
/// offending piece.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input is not a WebVTT file")]
    NotWebVtt,
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
