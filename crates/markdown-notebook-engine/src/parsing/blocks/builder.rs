use std::collections::VecDeque;

use super::{
    classify::{LineClass, MarkdownLineClassifier},
    kinds::{CodeFence, FenceOpen, Indent},
};
use crate::parsing::{attributes::Annotation, paragraph::Paragraph};

#[derive(Debug)]
enum LeafState {
    None,
    Paragraph {
        text: String,
        /// The last line pushed ended with a hard break marker.
        hard_break: bool,
        annotation: Option<Annotation>,
    },
    Fence {
        open: FenceOpen,
        lines: Vec<String>,
        annotation: Option<Annotation>,
    },
    Indented {
        lines: Vec<String>,
        /// Blank lines seen since the last indented line, not yet part of the block.
        blank_run: usize,
        annotation: Option<Annotation>,
    },
}

/// An annotation line waiting for the next line to decide whether it trails the
/// block before it or leads the block after it.
#[derive(Debug)]
struct PendingAnnotation {
    annotation: Annotation,
    /// A block ended right before the annotation and can still take it.
    has_target: bool,
}

/// Line-at-a-time segmentation state machine.
///
/// Lines go in through [`push`](Self::push) and finished paragraphs come out of
/// [`pop`](Self::pop) in document order. A block that just closed is held back
/// for one line so that an annotation directly below it can still attach.
pub struct BlockBuilder {
    classifier: MarkdownLineClassifier,
    leaf: LeafState,
    held: Option<Paragraph>,
    pending: Option<PendingAnnotation>,
    out: VecDeque<Paragraph>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            classifier: MarkdownLineClassifier,
            leaf: LeafState::None,
            held: None,
            pending: None,
            out: VecDeque::new(),
        }
    }

    pub fn push(&mut self, line: &str) {
        let mut c = self.classifier.classify(line);

        if self.in_fence() {
            self.consume_fence_line(&c);
            return;
        }

        if self.in_indented() && self.consume_indented_line(&c) {
            return;
        }

        if let Some(annotation) = c.annotation.take() {
            self.note_annotation(annotation);
            return;
        }

        let mut leading = self.resolve_pending(c.is_blank);
        self.release_held();

        if c.is_blank {
            self.flush_paragraph();
            return;
        }

        if let Some(inline) = c.leading_annotation.take() {
            leading = Some(merge_annotations(leading, inline));
        }
        if leading.is_some() {
            // An annotation always starts a new block.
            self.flush_paragraph();
        }

        if let Some(open) = c.fence.take() {
            self.flush_paragraph();
            self.leaf = LeafState::Fence {
                open,
                lines: vec![c.content.trim_end().to_string()],
                annotation: leading,
            };
            return;
        }

        if c.is_header {
            self.flush_paragraph();
            self.hold_header(&c.content, leading);
            return;
        }

        // Indented code cannot interrupt a paragraph.
        if !self.paragraph_open() && c.indent >= Indent::CODE_BLOCK {
            self.leaf = LeafState::Indented {
                lines: vec![Indent::strip_columns(&c.text, Indent::CODE_BLOCK)],
                blank_run: 0,
                annotation: leading,
            };
            return;
        }

        self.extend_paragraph(&c, leading);
    }

    pub fn pop(&mut self) -> Option<Paragraph> {
        self.out.pop_front()
    }

    /// End of input: close whatever is still open.
    pub fn finish(&mut self) {
        if let LeafState::Fence { open, .. } = &self.leaf {
            log::warn!(
                "unclosed code fence {:?}, closing at end of input",
                open.close_line()
            );
            let close = open.close_line();
            self.close_fence(close);
        }
        if let LeafState::Indented { blank_run, .. } = self.leaf {
            self.close_indented(blank_run == 0);
        }
        // End of input counts as a blank line for a pending annotation.
        let _ = self.resolve_pending(true);
        self.flush_paragraph();
        self.release_held();
    }

    fn in_fence(&self) -> bool {
        matches!(self.leaf, LeafState::Fence { .. })
    }

    fn in_indented(&self) -> bool {
        matches!(self.leaf, LeafState::Indented { .. })
    }

    fn paragraph_open(&self) -> bool {
        matches!(self.leaf, LeafState::Paragraph { .. })
    }

    fn consume_fence_line(&mut self, c: &LineClass) {
        let LeafState::Fence { open, lines, .. } = &mut self.leaf else {
            return;
        };
        if CodeFence::closes(open, &c.text) {
            let close = c.text.trim_end().to_string();
            self.close_fence(close);
        } else {
            lines.push(c.text.clone());
        }
    }

    fn close_fence(&mut self, close_line: String) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Fence {
            mut lines,
            annotation,
            ..
        } = prev
        {
            lines.push(close_line);
            self.hold(Paragraph::new(lines.join("\n")).with_annotation(annotation));
        } else {
            self.leaf = prev;
        }
    }

    /// Returns false when the line ends the indented block and still needs processing.
    fn consume_indented_line(&mut self, c: &LineClass) -> bool {
        let LeafState::Indented {
            lines, blank_run, ..
        } = &mut self.leaf
        else {
            return false;
        };

        if c.is_blank {
            *blank_run += 1;
            if *blank_run >= 2 {
                self.close_indented(false);
            }
            return true;
        }

        if c.indent >= Indent::CODE_BLOCK {
            lines.extend(std::iter::repeat_n(String::new(), *blank_run));
            *blank_run = 0;
            lines.push(Indent::strip_columns(&c.text, Indent::CODE_BLOCK));
            return true;
        }

        let adjacent = *blank_run == 0;
        self.close_indented(adjacent);
        false
    }

    /// Emits the indented block as a fenced paragraph; trailing blank lines were
    /// never added so there is nothing to trim.
    fn close_indented(&mut self, hold: bool) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        let LeafState::Indented {
            lines, annotation, ..
        } = prev
        else {
            self.leaf = prev;
            return;
        };

        let body = lines.join("\n");
        let fence = CodeFence::fence_for(&body);
        let paragraph =
            Paragraph::new(format!("{fence}\n{body}\n{fence}")).with_annotation(annotation);
        if hold {
            self.hold(paragraph);
        } else {
            self.emit(paragraph);
        }
    }

    fn hold_header(&mut self, content: &str, leading: Option<Annotation>) {
        let line = content.trim();
        let (text, annotation) = match Annotation::split_trailing(line) {
            Some((rest, trailing)) => (rest, Some(merge_annotations(leading, trailing))),
            None => (line, leading),
        };
        self.hold(Paragraph::new(text).with_annotation(annotation));
    }

    fn extend_paragraph(&mut self, c: &LineClass, leading: Option<Annotation>) {
        match &mut self.leaf {
            LeafState::Paragraph {
                text, hard_break, ..
            } => {
                if *hard_break || c.starts_item {
                    text.push('\n');
                    text.push_str(c.content.trim_end());
                } else {
                    text.push(' ');
                    text.push_str(c.content.trim());
                }
                *hard_break = c.hard_break;
            }
            _ => {
                self.leaf = LeafState::Paragraph {
                    text: c.content.trim_end().to_string(),
                    hard_break: c.hard_break,
                    annotation: leading,
                };
            }
        }
    }

    fn flush_paragraph(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Paragraph {
            text, annotation, ..
        } = prev
        {
            let paragraph = match Annotation::split_trailing(&text) {
                Some((rest, trailing)) => Paragraph::new(rest)
                    .with_annotation(Some(merge_annotations(annotation, trailing))),
                None => Paragraph::new(text).with_annotation(annotation),
            };
            self.emit(paragraph);
        } else {
            self.leaf = prev; // put back non-paragraph leaf (e.g. fence)
        }
    }

    fn note_annotation(&mut self, annotation: Annotation) {
        // Consecutive annotation lines are decided together by the line after them.
        let pending = match self.pending.take() {
            Some(p) => PendingAnnotation {
                annotation: p.annotation.merge(annotation),
                has_target: p.has_target,
            },
            None => PendingAnnotation {
                annotation,
                has_target: self.paragraph_open() || self.held.is_some(),
            },
        };
        self.pending = Some(pending);
    }

    /// Decides a pending annotation given whether the following line is blank.
    ///
    /// Followed by a blank line it trails the block before it; otherwise it is
    /// returned to lead the block the current line opens.
    fn resolve_pending(&mut self, next_is_blank: bool) -> Option<Annotation> {
        let pending = self.pending.take()?;
        if !next_is_blank {
            return Some(pending.annotation);
        }
        if pending.has_target {
            self.attach_trailing(pending.annotation);
        } else {
            log::warn!(
                "annotation {:?} is not adjacent to any paragraph, dropping it",
                pending.annotation.raw
            );
        }
        None
    }

    fn attach_trailing(&mut self, trailing: Annotation) {
        if let LeafState::Paragraph { annotation, .. } = &mut self.leaf {
            *annotation = Some(merge_annotations(annotation.take(), trailing));
            self.flush_paragraph();
        } else if let Some(held) = &mut self.held {
            held.annotation = Some(merge_annotations(held.annotation.take(), trailing));
        }
    }

    fn hold(&mut self, paragraph: Paragraph) {
        self.release_held();
        self.held = Some(paragraph);
    }

    fn release_held(&mut self) {
        if let Some(paragraph) = self.held.take() {
            self.out.push_back(paragraph);
        }
    }

    fn emit(&mut self, paragraph: Paragraph) {
        self.release_held();
        self.out.push_back(paragraph);
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_annotations(existing: Option<Annotation>, next: Annotation) -> Annotation {
    match existing {
        Some(existing) => existing.merge(next),
        None => next,
    }
}
