//! The conversion pipeline, stage by stage:
//!
//! text → variables → samples → HTML normalizer → paragraphs → sections →
//! imports → flatten → class filter → cells → decorations → notebook.
//!
//! Every stage gets only its own options. The front half up to sections runs
//! again for each imported document.

use std::collections::BTreeMap;

use crate::error::ConvertError;
use crate::io::LineSource;
use crate::notebook::{Cell, Notebook};
use crate::parsing::{Section, SectionOptions, Sections, paragraphs};
use crate::preprocess::{SnippetSource, expand_samples, normalize_html, substitute};
use crate::steps::{
    ClassFilterOptions, DecorateOptions, Imports, decorate, filter_classes, flatten,
    paragraphs_to_cells,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub variables: BTreeMap<String, String>,
    /// Fail on `{{ name }}` with no binding instead of warning.
    pub strict_variables: bool,
    /// Documents spliced in at section positions; negative keys count from the end.
    pub imports: BTreeMap<i64, Vec<LineSource>>,
    pub sections: SectionOptions,
    pub classes: ClassFilterOptions,
    pub decorations: DecorateOptions,
    pub notebook_title: Option<String>,
    pub kernel: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            variables: BTreeMap::new(),
            strict_variables: false,
            imports: BTreeMap::new(),
            sections: SectionOptions::default(),
            classes: ClassFilterOptions::default(),
            decorations: DecorateOptions::default(),
            notebook_title: None,
            kernel: Notebook::DEFAULT_KERNEL.to_string(),
        }
    }
}

/// Reads one document and splits it into sections.
pub fn read_sections(
    source: &LineSource,
    options: &PipelineOptions,
    snippets: &dyn SnippetSource,
) -> Result<Vec<Section>, ConvertError> {
    let text = source.read_to_string()?;
    let text = substitute(&text, &options.variables, options.strict_variables)?;
    let text = expand_samples(&text, snippets)?;

    let lines = normalize_html(text.lines());
    Ok(Sections::new(paragraphs(lines), options.sections).collect())
}

/// Produces the cells for `source` before decoration.
pub fn cells(
    source: &LineSource,
    options: &PipelineOptions,
    snippets: &dyn SnippetSource,
) -> Result<Vec<Cell>, ConvertError> {
    let sections = read_sections(source, options, snippets)?;

    let imported = Imports::new(sections, options.imports.clone(), |import: &LineSource| {
        log::debug!("loading import {import:?}");
        read_sections(import, options, snippets)
    });

    // The first import failure stops the stream and is reported after it drains.
    let mut failure = None;
    let sections = imported.map_while(|result| result.map_err(|err| failure = Some(err)).ok());
    let cells: Vec<Cell> =
        paragraphs_to_cells(filter_classes(flatten(sections), &options.classes)).collect();

    match failure {
        Some(err) => Err(err),
        None => Ok(cells),
    }
}

/// Converts a Markdown document into a notebook.
pub fn convert(
    source: &LineSource,
    options: &PipelineOptions,
    snippets: &dyn SnippetSource,
) -> Result<Notebook, ConvertError> {
    let cells = decorate(cells(source, options, snippets)?, &options.decorations);
    log::debug!("converted document into {} cell(s)", cells.len());
    Ok(Notebook::new(
        cells,
        options.notebook_title.clone(),
        options.kernel.clone(),
    ))
}
