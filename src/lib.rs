//! A parser for the WebVTT caption/subtitle text format.
//!
//! ```
//! let mut parser = webvtt::Parser::new();
//! let cues = parser.parse_buffer(b"WEBVTT\n\n00:00.000 --> 00:01.000\nhi\n").unwrap();
//! assert_eq!(cues[0].text, "hi");
//! ```

mod cursor;
mod error;
pub(crate) mod log;
pub mod parse;
pub mod print;
pub mod settings;
mod timestamp;

pub use error::{Error, Result};
pub use parse::{Cue, Parser, DEFAULT_MAX_BUFFER_SIZE};
pub use parse::text::{InternalNode, Node, NodeKind};
pub use print::write_cue;
pub use settings::{CueSettings, LineValue, TextAlignment, WritingDirection};
