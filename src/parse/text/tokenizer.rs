//! The cue-text tokenizer (C5): an eight-state lexer that turns a cue's
//! text payload into a sequence of tokens.
//!
//! Grounded on the host crate's `CueTextTokenizer` (`src/vtt/parse/text/
//! tokenizer.rs`) for the state shape, and on `original_source/tokenizer.c`
//! for the owned-string buffer-per-state design (the teacher tokenizes
//! zero-copy over a long-lived `&'a str`; this crate's buffer is released
//! per cue, so tokens own their contents instead, matching the original's
//! `new_string_token`/`new_start_token` allocations more closely than the
//! teacher's borrowed slices).

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    String(String),
    StartTag {
        name: String,
        classes: Vec<String>,
        annotation: Option<String>,
    },
    EndTag(String),
    TimestampTag(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Escape,
    Tag,
    StartTag,
    StartTagClass,
    StartTagAnnotation,
    EndTag,
    TimestampTag,
}

fn is_tag_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\x0C' | ' ')
}

fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// Resolves a stashed `&name` (without the trailing `;`) against the six
/// entities spec.md's Escape state names. Returns `None` for anything else,
/// in which case the caller emits the buffer literally (spec.md §9.1).
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "&amp" => Some('&'),
        "&lt" => Some('<'),
        "&gt" => Some('>'),
        "&nbsp" => Some(' '),
        "&lrm" => Some('\u{200E}'),
        "&rlm" => Some('\u{200F}'),
        _ => None,
    }
}

pub(crate) struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    pub(crate) fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.chars.len() {
            return None;
        }

        let mut state = State::Data;
        let mut text = String::new();
        let mut escape_buf = String::new();
        let mut name = String::new();
        let mut class_buf = String::new();
        let mut classes: Vec<String> = Vec::new();
        let mut annotation = String::new();

        let mut commit_class = |classes: &mut Vec<String>, buf: &mut String| {
            if !buf.is_empty() {
                classes.push(std::mem::take(buf));
            }
        };

        loop {
            let c = self.peek();

            match state {
                State::Data => match c {
                    Some('&') => {
                        escape_buf.clear();
                        escape_buf.push('&');
                        state = State::Escape;
                        self.advance();
                    }
                    Some('<') => {
                        if text.is_empty() {
                            state = State::Tag;
                            self.advance();
                        } else {
                            return Some(Token::String(text));
                        }
                    }
                    None => return Some(Token::String(text)),
                    Some(other) => {
                        text.push(other);
                        self.advance();
                    }
                },
                State::Escape => match c {
                    Some(';') => {
                        match resolve_entity(&escape_buf) {
                            Some(resolved) => text.push(resolved),
                            None => {
                                text.push_str(&escape_buf);
                                text.push(';');
                            }
                        }
                        state = State::Data;
                        self.advance();
                    }
                    Some('&') => {
                        text.push_str(&escape_buf);
                        escape_buf.clear();
                        escape_buf.push('&');
                        self.advance();
                    }
                    Some('<') | None => {
                        text.push_str(&escape_buf);
                        return Some(Token::String(text));
                    }
                    Some(other) if other.is_ascii_alphanumeric() => {
                        escape_buf.push(other);
                        self.advance();
                    }
                    Some(other) => {
                        text.push_str(&escape_buf);
                        text.push(other);
                        state = State::Data;
                        self.advance();
                    }
                },
                State::Tag => match c {
                    Some(w) if is_tag_whitespace(w) || is_newline(w) => {
                        state = State::StartTagAnnotation;
                        self.advance();
                    }
                    Some('.') => {
                        state = State::StartTagClass;
                        self.advance();
                    }
                    Some('/') => {
                        state = State::EndTag;
                        self.advance();
                    }
                    Some(d) if d.is_ascii_digit() => {
                        name.push(d);
                        state = State::TimestampTag;
                        self.advance();
                    }
                    Some('>') => {
                        self.advance();
                        return Some(Token::StartTag {
                            name: String::new(),
                            classes: Vec::new(),
                            annotation: None,
                        });
                    }
                    None => {
                        return Some(Token::StartTag {
                            name: String::new(),
                            classes: Vec::new(),
                            annotation: None,
                        });
                    }
                    Some(other) => {
                        name.push(other);
                        state = State::StartTag;
                        self.advance();
                    }
                },
                State::StartTag => match c {
                    Some(w) if is_tag_whitespace(w) => {
                        state = State::StartTagAnnotation;
                        self.advance();
                    }
                    Some(nl) if is_newline(nl) => {
                        annotation.push(nl);
                        state = State::StartTagAnnotation;
                        self.advance();
                    }
                    Some('.') => {
                        state = State::StartTagClass;
                        self.advance();
                    }
                    Some('>') | None => {
                        if c == Some('>') {
                            self.advance();
                        }
                        return Some(Token::StartTag {
                            name,
                            classes: Vec::new(),
                            annotation: None,
                        });
                    }
                    Some(other) => {
                        name.push(other);
                        self.advance();
                    }
                },
                State::StartTagClass => match c {
                    Some(w) if is_tag_whitespace(w) => {
                        commit_class(&mut classes, &mut class_buf);
                        state = State::StartTagAnnotation;
                        self.advance();
                    }
                    Some(nl) if is_newline(nl) => {
                        commit_class(&mut classes, &mut class_buf);
                        annotation.push(nl);
                        state = State::StartTagAnnotation;
                        self.advance();
                    }
                    Some('.') => {
                        commit_class(&mut classes, &mut class_buf);
                        self.advance();
                    }
                    Some('>') | None => {
                        commit_class(&mut classes, &mut class_buf);
                        if c == Some('>') {
                            self.advance();
                        }
                        return Some(Token::StartTag {
                            name,
                            classes,
                            annotation: None,
                        });
                    }
                    Some(other) => {
                        class_buf.push(other);
                        self.advance();
                    }
                },
                State::StartTagAnnotation => match c {
                    Some('>') | None => {
                        if c == Some('>') {
                            self.advance();
                        }
                        let trimmed = annotation.trim_ascii();
                        return Some(Token::StartTag {
                            name,
                            classes,
                            annotation: (!trimmed.is_empty()).then(|| trimmed.to_owned()),
                        });
                    }
                    Some(other) => {
                        annotation.push(other);
                        self.advance();
                    }
                },
                State::EndTag => match c {
                    Some('>') | None => {
                        if c == Some('>') {
                            self.advance();
                        }
                        return Some(Token::EndTag(name));
                    }
                    Some(other) => {
                        name.push(other);
                        self.advance();
                    }
                },
                State::TimestampTag => match c {
                    Some('>') | None => {
                        if c == Some('>') {
                            self.advance();
                        }
                        return Some(Token::TimestampTag(name));
                    }
                    Some(other) => {
                        name.push(other);
                        self.advance();
                    }
                },
            }
        }
    }
}
