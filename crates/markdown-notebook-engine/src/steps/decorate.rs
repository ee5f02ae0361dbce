//! Fixed link cells wrapped around the generated ones.

use crate::notebook::Cell;

pub const VIEW_DOCS_TOP_SLUG: &str = "view-the-docs-top";
pub const VIEW_DOCS_BOTTOM_SLUG: &str = "view-the-docs-bottom";
pub const OPEN_IN_COLAB_SLUG: &str = "view-in-github";

const COLAB_URL: &str = "https://colab.research.google.com/github";
const COLAB_BADGE: &str = "https://colab.research.google.com/assets/colab-badge.svg";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorateOptions {
    pub docs_url: Option<String>,
    pub docs_logo_url: Option<String>,
    /// Where the generated notebook lives on GitHub.
    pub ipynb_github_url: Option<String>,
}

fn view_the_docs_html(docs_url: &str, docs_logo_url: Option<&str>) -> String {
    let logo = docs_logo_url
        .map(|url| format!(r#"<img src="{url}" width="32" height="32" />"#))
        .unwrap_or_default();
    format!(
        r#"<table align="left"><td><a target="_blank" href="{docs_url}">{logo}View the docs</a></td></table>"#
    )
}

/// Surrounds `cells` with "View the docs" link cells when a docs URL is set.
pub fn view_the_docs(mut cells: Vec<Cell>, docs_url: Option<&str>, docs_logo_url: Option<&str>) -> Vec<Cell> {
    let Some(docs_url) = docs_url else {
        return cells;
    };
    let html = view_the_docs_html(docs_url, docs_logo_url);
    cells.insert(0, Cell::markdown(html.clone(), VIEW_DOCS_TOP_SLUG));
    cells.push(Cell::markdown(html, VIEW_DOCS_BOTTOM_SLUG));
    cells
}

/// Prepends an "Open in Colab" badge cell when the notebook's GitHub URL is set.
pub fn open_in_colab(mut cells: Vec<Cell>, ipynb_github_url: Option<&str>) -> Vec<Cell> {
    let Some(url) = ipynb_github_url else {
        return cells;
    };
    let url = url.strip_prefix("https://").unwrap_or(url);
    let url = url.strip_prefix("github.com/").unwrap_or(url);
    let html = format!(
        r#"<a href="{COLAB_URL}/{url}" target="_parent"><img src="{COLAB_BADGE}" alt="Open in Colab"/></a>"#
    );
    cells.insert(0, Cell::markdown(html, OPEN_IN_COLAB_SLUG));
    cells
}

/// Applies every configured decoration.
pub fn decorate(cells: Vec<Cell>, options: &DecorateOptions) -> Vec<Cell> {
    let cells = view_the_docs(
        cells,
        options.docs_url.as_deref(),
        options.docs_logo_url.as_deref(),
    );
    open_in_colab(cells, options.ipynb_github_url.as_deref())
}
