//! Text rewrites applied before segmentation.
//!
//! Variable substitution and sample expansion work on the whole document text;
//! the HTML normalizer is a line adapter feeding the segmenter.

pub mod html;
pub mod samples;
pub mod variables;

pub use html::{HtmlNormalizer, normalize_html};
pub use samples::{
    CachedSnippetSource, DirectorySnippetSource, GITHUB_RAW_URL, GithubSnippetSource,
    MemorySnippetSource, SampleError, SampleLocation, SnippetSource, expand_samples,
    extract_snippet, raw_url,
};
pub use variables::{UndefinedVariable, substitute};
