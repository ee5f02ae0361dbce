//! Cell and notebook records, and their nbformat v4 (`.ipynb`) rendering.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Markdown,
    Code,
}

/// A markdown or code unit with a unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub kind: CellKind,
    pub source: String,
    pub slug: String,
    /// Language tag of a code cell's fence, when it had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Cell {
    pub fn markdown(source: impl Into<String>, slug: impl Into<String>) -> Self {
        Cell {
            kind: CellKind::Markdown,
            source: source.into(),
            slug: slug.into(),
            language: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn code(source: impl Into<String>, slug: impl Into<String>, language: Option<String>) -> Self {
        Cell {
            kind: CellKind::Code,
            source: source.into(),
            slug: slug.into(),
            language,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotebookMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub kernel: String,
    pub toc_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: NotebookMetadata,
}

impl Notebook {
    pub const DEFAULT_KERNEL: &'static str = "python3";

    /// Builds the notebook, taking the title from the first header cell when
    /// none is given.
    pub fn new(cells: Vec<Cell>, title: Option<String>, kernel: impl Into<String>) -> Self {
        let title = title.or_else(|| title_from_cells(&cells));
        Notebook {
            cells,
            metadata: NotebookMetadata {
                title,
                kernel: kernel.into(),
                toc_visible: true,
            },
        }
    }
}

impl Notebook {
    pub const NBFORMAT: u32 = 4;
    /// Minor 4 keeps cell ids optional; the slug travels in `metadata.id`.
    pub const NBFORMAT_MINOR: u32 = 4;

    /// The nbformat v4 view of this notebook.
    pub fn to_ipynb(&self) -> Ipynb<'_> {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                let metadata = IpynbCellMetadata {
                    id: &cell.slug,
                    extra: &cell.metadata,
                };
                match cell.kind {
                    CellKind::Markdown => IpynbCell::Markdown {
                        metadata,
                        source: &cell.source,
                    },
                    CellKind::Code => IpynbCell::Code {
                        execution_count: None,
                        metadata,
                        outputs: Vec::new(),
                        source: &cell.source,
                    },
                }
            })
            .collect();

        Ipynb {
            cells,
            metadata: IpynbMetadata {
                colab: ColabMetadata {
                    name: self.metadata.title.as_deref(),
                    toc_visible: self.metadata.toc_visible,
                },
                kernelspec: KernelSpec {
                    name: &self.metadata.kernel,
                    display_name: &self.metadata.kernel,
                },
            },
            nbformat: Self::NBFORMAT,
            nbformat_minor: Self::NBFORMAT_MINOR,
        }
    }

    /// Writes the notebook as an indented `.ipynb` document.
    pub fn write_ipynb<W: Write>(&self, mut writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(&mut writer, &self.to_ipynb())?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}

#[derive(Debug, Serialize)]
pub struct Ipynb<'a> {
    pub cells: Vec<IpynbCell<'a>>,
    pub metadata: IpynbMetadata<'a>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum IpynbCell<'a> {
    Markdown {
        metadata: IpynbCellMetadata<'a>,
        source: &'a str,
    },
    Code {
        execution_count: Option<u32>,
        metadata: IpynbCellMetadata<'a>,
        outputs: Vec<serde_json::Value>,
        source: &'a str,
    },
}

#[derive(Debug, Serialize)]
pub struct IpynbCellMetadata<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub extra: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct IpynbMetadata<'a> {
    pub colab: ColabMetadata<'a>,
    pub kernelspec: KernelSpec<'a>,
}

#[derive(Debug, Serialize)]
pub struct ColabMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub toc_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct KernelSpec<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
}

fn title_from_cells(cells: &[Cell]) -> Option<String> {
    cells
        .iter()
        .filter(|cell| !cell.is_code())
        .filter_map(|cell| cell.source.lines().next())
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_matches(['#', ' ']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn title_from_first_header_cell() {
        let cells = vec![
            Cell::markdown("intro", "_"),
            Cell::markdown("# Getting started #\n\nText", "getting-started"),
            Cell::markdown("## Later", "later"),
        ];
        let nb = Notebook::new(cells, None, Notebook::DEFAULT_KERNEL);
        assert_eq!(nb.metadata.title.as_deref(), Some("Getting started"));
        assert_eq!(nb.metadata.kernel, "python3");
        assert!(nb.metadata.toc_visible);
    }

    #[test]
    fn explicit_title_wins() {
        let cells = vec![Cell::markdown("# Heading", "heading")];
        let nb = Notebook::new(cells, Some("Custom".into()), "python3");
        assert_eq!(nb.metadata.title.as_deref(), Some("Custom"));
    }

    #[test]
    fn no_header_no_title() {
        let cells = vec![
            Cell::code("# comment", "_-code", None),
            Cell::markdown("text", "_"),
        ];
        let nb = Notebook::new(cells, None, "python3");
        assert_eq!(nb.metadata.title, None);
    }

    #[test]
    fn ipynb_hello_world() {
        let cells = vec![
            Cell::markdown("# Hello world\n\nHello Colab!", "hello-world"),
            Cell::code(
                "# Hello world in Python.\nprint('Hello from Python!')",
                "hello-world-code",
                Some("py".into()),
            ),
        ];
        let nb = Notebook::new(cells, None, Notebook::DEFAULT_KERNEL);

        let json = serde_json::to_value(nb.to_ipynb()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "cells": [
                    {
                        "cell_type": "markdown",
                        "metadata": { "id": "hello-world" },
                        "source": "# Hello world\n\nHello Colab!",
                    },
                    {
                        "cell_type": "code",
                        "execution_count": null,
                        "metadata": { "id": "hello-world-code" },
                        "outputs": [],
                        "source": "# Hello world in Python.\nprint('Hello from Python!')",
                    },
                ],
                "metadata": {
                    "colab": { "name": "Hello world", "toc_visible": true },
                    "kernelspec": { "name": "python3", "display_name": "python3" },
                },
                "nbformat": 4,
                "nbformat_minor": 4,
            })
        );
    }

    #[test]
    fn ipynb_form_cell_and_untitled_notebook() {
        let cell = Cell::code("#@title Setup", "_-code", None).with_metadata("cellView", "form");
        let nb = Notebook::new(vec![cell], None, "python2");

        let json = serde_json::to_value(nb.to_ipynb()).unwrap();

        assert_eq!(
            json["cells"][0]["metadata"],
            serde_json::json!({ "id": "_-code", "cellView": "form" })
        );
        assert_eq!(
            json["metadata"],
            serde_json::json!({
                "colab": { "toc_visible": true },
                "kernelspec": { "name": "python2", "display_name": "python2" },
            })
        );
    }

    #[test]
    fn write_ipynb_ends_with_newline() {
        let nb = Notebook::new(vec![Cell::markdown("# T", "t")], None, "python3");
        let mut out = Vec::new();

        nb.write_ipynb(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["nbformat"], 4);
    }

    #[test]
    fn serializes_compactly() {
        let cell = Cell::code("#@title Setup", "setup-code", Some("py".into()))
            .with_metadata("cellView", "form");
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "code",
                "source": "#@title Setup",
                "slug": "setup-code",
                "language": "py",
                "metadata": { "cellView": "form" },
            })
        );

        let json = serde_json::to_value(Cell::markdown("text", "_")).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "markdown", "source": "text", "slug": "_" }));
    }
}
