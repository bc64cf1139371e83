//! The cue-text tree builder (C6): turns the tokenizer's flat token stream
//! into the nested `Node` tree a cue exposes.
//!
//! Grounded on the host crate's `parse_cue_text` (`src/vtt/parse/text.rs`),
//! which drives an `InternalNode`/`node_info_stack` pair the same way; this
//! version drops the `language_stack` propagation (the teacher threads the
//! current `<lang>` down into text runs for shaping, which is rendering
//! machinery out of scope here) and owns every string instead of slicing
//! the input buffer.

mod tokenizer;

use tokenizer::{Token, Tokenizer};

/// A single cue-text markup tag, mirroring the five internal node kinds
/// the grammar recognizes plus the two annotated ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Class,
    Italic,
    Bold,
    Underline,
    Ruby,
    RubyText,
    Voice(String),
    Language(String),
}

/// A markup node: one matched start/end tag pair and everything between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    pub kind: NodeKind,
    pub classes: Vec<String>,
    pub children: Vec<Node>,
}

/// A node of the cue-text tree (spec.md §2 C7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Internal(InternalNode),
    Text(String),
    Timestamp(i64),
}

/// Maps a start tag's name to a node kind. `parent_is_ruby` gates `rt`:
/// spec.md §3 requires every `RubyText` to have a `Ruby` parent, so `<rt>`
/// outside a `<ruby>` is treated as unknown rather than producing a node.
fn tag_name_to_kind(
    name: &str,
    annotation: Option<String>,
    parent_is_ruby: bool,
) -> Option<NodeKind> {
    Some(match name {
        "c" => NodeKind::Class,
        "i" => NodeKind::Italic,
        "b" => NodeKind::Bold,
        "u" => NodeKind::Underline,
        "ruby" => NodeKind::Ruby,
        "rt" if parent_is_ruby => NodeKind::RubyText,
        "v" => NodeKind::Voice(annotation.unwrap_or_default()),
        "lang" => NodeKind::Language(annotation.unwrap_or_default()),
        _ => return None,
    })
}

fn tag_name_for_kind(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Class => "c",
        NodeKind::Italic => "i",
        NodeKind::Bold => "b",
        NodeKind::Underline => "u",
        NodeKind::Ruby => "ruby",
        NodeKind::RubyText => "rt",
        NodeKind::Voice(_) => "v",
        NodeKind::Language(_) => "lang",
    }
}

struct OpenNode {
    kind: NodeKind,
    classes: Vec<String>,
    children: Vec<Node>,
}

/// Builds the node tree for a cue's text payload.
///
/// Unknown tag names are logged and ignored: neither a node nor a stack
/// frame is created for them, so their content folds into the enclosing
/// node (spec.md §4.6 "unknown start tags"). End tags that don't match the
/// innermost open node are logged and ignored rather than closing the
/// wrong frame or being treated as fatal.
pub(crate) fn parse_cue_text(text: &str, logger: &impl crate::log::AsLogger, cue_id: &str) -> Vec<Node> {
    let mut tokenizer = Tokenizer::new(text);
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<OpenNode> = Vec::new();

    let push_node = |stack: &mut Vec<OpenNode>, root: &mut Vec<Node>, node: Node| {
        if let Some(top) = stack.last_mut() {
            top.children.push(node);
        } else {
            root.push(node);
        }
    };

    while let Some(token) = tokenizer.next_token() {
        match token {
            Token::String(content) => {
                push_node(&mut stack, &mut root, Node::Text(content));
            }
            Token::TimestampTag(raw) => {
                let mut cursor = crate::cursor::ByteCursor::new(raw.as_bytes());
                match crate::timestamp::parse_timestamp(&mut cursor) {
                    Some(ms) => push_node(&mut stack, &mut root, Node::Timestamp(ms)),
                    None => {
                        crate::log::warning!(
                            logger,
                            "cue {cue_id:?}: malformed timestamp tag {raw:?}"
                        );
                    }
                }
            }
            Token::StartTag {
                name,
                classes,
                annotation,
            } => {
                let parent_is_ruby = stack
                    .last()
                    .is_some_and(|top| matches!(top.kind, NodeKind::Ruby));
                match tag_name_to_kind(&name, annotation, parent_is_ruby) {
                    Some(kind) => stack.push(OpenNode {
                        kind,
                        classes,
                        children: Vec::new(),
                    }),
                    None => {
                        crate::log::warning!(logger, "cue {cue_id:?}: unknown start tag {name:?}");
                    }
                }
            }
            Token::EndTag(name) => {
                // `</ruby>` while an unclosed `<rt>` is on top closes both,
                // `rt` first (spec.md §4.6); every other tag name only
                // closes a node of its own kind.
                let pop_count = match name.as_str() {
                    "ruby" => match stack.last().map(|top| &top.kind) {
                        Some(NodeKind::Ruby) => 1,
                        Some(NodeKind::RubyText) => 2,
                        _ => 0,
                    },
                    "rt" => match stack.last().map(|top| &top.kind) {
                        Some(NodeKind::RubyText) => 1,
                        _ => 0,
                    },
                    _ => usize::from(
                        stack
                            .last()
                            .is_some_and(|top| tag_name_for_kind(&top.kind) == name),
                    ),
                };

                if pop_count == 0 {
                    crate::log::warning!(logger, "cue {cue_id:?}: unmatched end tag {name:?}");
                } else {
                    for _ in 0..pop_count {
                        let open = stack.pop().unwrap();
                        push_node(
                            &mut stack,
                            &mut root,
                            Node::Internal(InternalNode {
                                kind: open.kind,
                                classes: open.classes,
                                children: open.children,
                            }),
                        );
                    }
                }
            }
        }
    }

    // Anything still open at end-of-input closes implicitly.
    while let Some(open) = stack.pop() {
        let node = Node::Internal(InternalNode {
            kind: open.kind,
            classes: open.classes,
            children: open.children,
        });
        push_node(&mut stack, &mut root, node);
    }

    root
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::log::Logger;

    fn tree(text: &str) -> Vec<Node> {
        parse_cue_text(text, &Logger, "test")
    }

    #[test]
    fn plain_text() {
        assert_eq!(tree("hello"), vec![Node::Text("hello".into())]);
    }

    #[test]
    fn class_in_cue() {
        assert_eq!(
            tree("<c.magenta>uh, I don't think that's accurate</c>"),
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Class,
                classes: vec!["magenta".into()],
                children: vec![Node::Text("uh, I don't think that's accurate".into())],
            })]
        );
    }

    #[test]
    fn ruby_after_class() {
        let nodes = tree("<ruby>shuushimatsu<rt>終止末</rt></ruby>");
        assert_eq!(
            nodes,
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Ruby,
                classes: vec![],
                children: vec![
                    Node::Text("shuushimatsu".into()),
                    Node::Internal(InternalNode {
                        kind: NodeKind::RubyText,
                        classes: vec![],
                        children: vec![Node::Text("終止末".into())],
                    }),
                ],
            })]
        );
    }

    #[test]
    fn ruby_end_tag_closes_unclosed_rt_too() {
        // No closing </rt> before </ruby>: spec.md §4.6 says the ruby end
        // tag pops both the open rt and the ruby node.
        assert_eq!(
            tree("<ruby>shuushimatsu<rt>終止末</ruby>"),
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Ruby,
                classes: vec![],
                children: vec![
                    Node::Text("shuushimatsu".into()),
                    Node::Internal(InternalNode {
                        kind: NodeKind::RubyText,
                        classes: vec![],
                        children: vec![Node::Text("終止末".into())],
                    }),
                ],
            })]
        );
    }

    #[test]
    fn bare_rt_without_ruby_parent_is_unknown() {
        // spec.md §3: every RubyText node must have a Ruby parent, so a
        // standalone <rt> (no enclosing <ruby>) is treated like any other
        // unknown tag rather than producing a parentless RubyText node.
        assert_eq!(tree("<rt>x</rt>"), vec![Node::Text("x".into())]);
    }

    #[test]
    fn voice_with_annotation() {
        assert_eq!(
            tree("<v Roger Bingham>I'm the man</v>"),
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Voice("Roger Bingham".into()),
                classes: vec![],
                children: vec![Node::Text("I'm the man".into())],
            })]
        );
    }

    #[test]
    fn nested_markup() {
        assert_eq!(
            tree("<i><b>bold italic</b></i>"),
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Italic,
                classes: vec![],
                children: vec![Node::Internal(InternalNode {
                    kind: NodeKind::Bold,
                    classes: vec![],
                    children: vec![Node::Text("bold italic".into())],
                })],
            })]
        );
    }

    #[test]
    fn unknown_tag_is_transparent() {
        assert_eq!(
            tree("a<bogus>b</bogus>c"),
            vec![
                Node::Text("a".into()),
                Node::Text("b".into()),
                Node::Text("c".into()),
            ]
        );
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        assert_eq!(
            tree("<b>bold</i></b>"),
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Bold,
                classes: vec![],
                children: vec![Node::Text("bold".into())],
            })]
        );
    }

    #[test]
    fn unclosed_tag_closes_at_end_of_input() {
        assert_eq!(
            tree("<b>bold"),
            vec![Node::Internal(InternalNode {
                kind: NodeKind::Bold,
                classes: vec![],
                children: vec![Node::Text("bold".into())],
            })]
        );
    }

    #[test]
    fn timestamp_node() {
        assert_eq!(
            tree("<00:00:16.000>text"),
            vec![Node::Timestamp(16_000), Node::Text("text".into())]
        );
    }

    #[test]
    fn malformed_timestamp_is_dropped() {
        assert_eq!(tree("<1:2:3>text"), vec![Node::Text("text".into())]);
    }
}
