//! Stages that run on sections, paragraphs and cells after segmentation.

pub mod cells;
pub mod decorate;
pub mod filter_classes;
pub mod imports;

pub use cells::{Cells, SlugRegistry, paragraphs_to_cells, slugify};
pub use decorate::{DecorateOptions, decorate, open_in_colab, view_the_docs};
pub use filter_classes::{ClassFilterOptions, filter_classes, filter_paragraph};
pub use imports::{Imports, normalize_index};

use crate::parsing::{Paragraph, Section};

/// Turns a section stream back into a paragraph stream.
pub fn flatten<I>(sections: I) -> impl Iterator<Item = Paragraph>
where
    I: IntoIterator<Item = Section>,
{
    sections.into_iter().flatten()
}
