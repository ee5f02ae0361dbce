pub mod attributes;
pub mod blocks;
pub mod paragraph;
pub mod sections;

#[cfg(test)]
mod tests;

use blocks::BlockBuilder;

pub use attributes::{Annotation, Attributes};
pub use paragraph::{CodeBlock, Paragraph};
pub use sections::{Section, SectionOptions, Sections};

/// Lazily segments a stream of lines into paragraphs.
///
/// Lines are pulled from the inner iterator only when the builder has nothing
/// ready, so a paragraph is yielded as soon as the line that ends it is seen.
pub struct Paragraphs<I> {
    lines: I,
    builder: BlockBuilder,
    finished: bool,
}

impl<I, S> Iterator for Paragraphs<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Paragraph;

    fn next(&mut self) -> Option<Paragraph> {
        loop {
            if let Some(paragraph) = self.builder.pop() {
                return Some(paragraph);
            }
            if self.finished {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.builder.push(line.as_ref()),
                None => {
                    self.builder.finish();
                    self.finished = true;
                }
            }
        }
    }
}

/// Segments `lines` into paragraphs.
pub fn paragraphs<I>(lines: I) -> Paragraphs<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Paragraphs {
        lines: lines.into_iter(),
        builder: BlockBuilder::new(),
        finished: false,
    }
}
