use std::sync::OnceLock;

use regex::Regex;

use super::kinds::{CodeFence, FenceOpen, Indent};
use crate::parsing::attributes::Annotation;

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of segmentation: each line is classified independently
/// without reference to surrounding context. The builder decides what the
/// facts mean given its current state.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// The line as received, line terminator removed.
    pub text: String,
    /// Whether the line is blank (whitespace only).
    pub is_blank: bool,
    /// Leading indentation in columns, tabs expanded.
    pub indent: usize,
    /// The whole line is an attribute annotation.
    pub annotation: Option<Annotation>,
    /// An annotation glued to the start of the line, stripped from `content`.
    pub leading_annotation: Option<Annotation>,
    /// The line content used for block recognition.
    pub content: String,
    /// If the content opens a code fence.
    pub fence: Option<FenceOpen>,
    pub is_header: bool,
    /// Ends with two or more spaces: the next line joins with a hard break.
    pub hard_break: bool,
    /// Starts with a list or quote marker and so always begins its own line.
    pub starts_item: bool,
}

fn item_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s{0,3}(?:[-*+]\s|\d{1,9}[.)]\s|>)").expect("Invalid item marker regex")
    })
}

/// Classifies individual lines for the segmentation phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// Classifies a line into a [`LineClass`] containing local facts.
    pub fn classify(&self, line: &str) -> LineClass {
        let text = line.trim_end_matches(['\r', '\n']);
        let is_blank = text.trim().is_empty();
        let indent = Indent::columns(text);
        let annotation = Annotation::from_line(text);

        let (leading_annotation, content) = match Annotation::split_leading(text) {
            Some((a, rest)) if annotation.is_none() => (Some(a), rest),
            _ => (None, text),
        };

        // Block markers only count when not indented into code territory.
        let shallow = leading_annotation.is_some() || indent < Indent::CODE_BLOCK;
        let fence = if shallow { CodeFence::open(content) } else { None };
        let is_header = shallow && fence.is_none() && content.trim_start().starts_with('#');

        LineClass {
            text: text.to_string(),
            is_blank,
            indent,
            annotation,
            leading_annotation,
            content: content.to_string(),
            fence,
            is_header,
            hard_break: text.ends_with("  "),
            starts_item: item_marker_re().is_match(content),
        }
    }
}
