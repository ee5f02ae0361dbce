use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;

use regex::Regex;

use crate::notebook::Cell;
use crate::parsing::Paragraph;

/// Stands in for the header text before the first header.
pub const HEADER_SENTINEL: &str = "_";
/// Code containing either marker is displayed as a form.
pub const FORM_MARKERS: [&str; 2] = ["#@title", "#@param"];
const CODE_SUFFIX: &str = "-code";

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w]+").expect("Invalid slug regex"))
}

/// Lowercases `text` and collapses every run of non-word characters into `-`.
pub fn slugify(text: &str) -> String {
    non_word_re()
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Hands out slugs that are unique within one conversion.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugifies `name`, suffixing `-2`, `-3`, ... on collision.
    ///
    /// A name that slugifies to nothing yields an empty slug that is never
    /// recorded.
    pub fn register(&mut self, name: &str) -> String {
        let slug = slugify(name);
        if slug.is_empty() {
            return slug;
        }
        if self.used.insert(slug.clone()) {
            return slug;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{slug}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Groups a paragraph stream into markdown and code cells.
///
/// Headers start a new markdown cell; each code block becomes its own cell;
/// any other paragraph joins the markdown cell being built.
pub struct Cells<I> {
    paragraphs: I,
    registry: SlugRegistry,
    last_header: String,
    pending: Vec<String>,
    out: VecDeque<Cell>,
    finished: bool,
}

impl<I> Cells<I> {
    pub fn new(paragraphs: I) -> Self {
        Cells {
            paragraphs,
            registry: SlugRegistry::new(),
            last_header: HEADER_SENTINEL.to_string(),
            pending: Vec::new(),
            out: VecDeque::new(),
            finished: false,
        }
    }

    fn flush_markdown(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let source = std::mem::take(&mut self.pending).join("\n\n");
        let slug = self.registry.register(&self.last_header);
        self.out.push_back(Cell::markdown(source, slug));
    }

    fn process(&mut self, paragraph: Paragraph) {
        if let Some(header) = paragraph.header_text() {
            let header = header.to_string();
            self.flush_markdown();
            self.last_header = header;
            self.pending.push(paragraph.text);
            return;
        }

        if let Some(block) = paragraph.code_block() {
            self.flush_markdown();
            let source = block.source();
            let language = Some(block.lang().to_string()).filter(|l| !l.is_empty());
            let slug = self
                .registry
                .register(&format!("{}{CODE_SUFFIX}", self.last_header));

            let mut cell = Cell::code(source, slug, language);
            if FORM_MARKERS.iter().any(|m| cell.source.contains(m)) {
                cell = cell.with_metadata("cellView", "form");
            }
            self.out.push_back(cell);
            return;
        }

        if !paragraph.is_empty() {
            self.pending.push(paragraph.text);
        }
    }
}

impl<I> Iterator for Cells<I>
where
    I: Iterator<Item = Paragraph>,
{
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        loop {
            if let Some(cell) = self.out.pop_front() {
                return Some(cell);
            }
            if self.finished {
                return None;
            }
            match self.paragraphs.next() {
                Some(paragraph) => self.process(paragraph),
                None => {
                    self.flush_markdown();
                    self.finished = true;
                }
            }
        }
    }
}

/// Materializes `paragraphs` into cells.
pub fn paragraphs_to_cells<I>(paragraphs: I) -> Cells<I::IntoIter>
where
    I: IntoIterator<Item = Paragraph>,
{
    Cells::new(paragraphs.into_iter())
}
