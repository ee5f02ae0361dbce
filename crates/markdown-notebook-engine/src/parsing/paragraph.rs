use super::attributes::Annotation;
use super::blocks::kinds::{CodeFence, FenceOpen};

/// The unit produced by the segmenter: a run of text, a single header line, or a
/// fenced code block including its fence lines.
///
/// `text` is the paragraph as one string with embedded newlines. Any attribute
/// annotation that decorated the paragraph is kept apart in `annotation` so that
/// header and fence recognition only ever look at the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub annotation: Option<Annotation>,
}

/// A borrowed view of a fenced code paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub fence: FenceOpen,
    pub open_line: &'a str,
    /// Lines between the fences.
    pub body: Vec<&'a str>,
    pub close_line: &'a str,
}

impl CodeBlock<'_> {
    pub fn lang(&self) -> &str {
        self.fence.lang()
    }

    pub fn source(&self) -> String {
        self.body.join("\n")
    }
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph {
            text: text.into(),
            annotation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Option<Annotation>) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn is_header(&self) -> bool {
        self.text.starts_with('#')
    }

    /// Header text with the `#` markers and surrounding whitespace removed.
    pub fn header_text(&self) -> Option<&str> {
        if !self.is_header() {
            return None;
        }
        let first = self.text.lines().next().unwrap_or("");
        Some(first.trim_start_matches('#').trim())
    }

    /// Recognizes a paragraph that opens with a fence line and closes with a matching one.
    pub fn code_block(&self) -> Option<CodeBlock<'_>> {
        let lines: Vec<&str> = self.text.lines().collect();
        if lines.len() < 2 {
            return None;
        }
        let open_line = lines[0];
        let close_line = lines[lines.len() - 1];
        let fence = CodeFence::open(open_line)?;
        if !CodeFence::closes(&fence, close_line) {
            return None;
        }
        Some(CodeBlock {
            fence,
            open_line,
            body: lines[1..lines.len() - 1].to_vec(),
            close_line,
        })
    }

    pub fn is_code_block(&self) -> bool {
        self.code_block().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Paragraph {
    fn from(text: &str) -> Self {
        Paragraph::new(text)
    }
}

impl From<String> for Paragraph {
    fn from(text: String) -> Self {
        Paragraph::new(text)
    }
}
