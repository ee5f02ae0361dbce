pub mod error;
pub mod io;
pub mod notebook;
pub mod parsing;
pub mod pipeline;
pub mod preprocess;
pub mod steps;

// Re-export key types for easier usage
pub use error::ConvertError;
pub use io::*;
pub use notebook::{Cell, CellKind, Ipynb, IpynbCell, Notebook, NotebookMetadata};
pub use parsing::{Annotation, Attributes, Paragraph, Section, SectionOptions};
pub use pipeline::{PipelineOptions, cells, convert, read_sections};
pub use preprocess::{
    CachedSnippetSource, DirectorySnippetSource, GITHUB_RAW_URL, GithubSnippetSource,
    MemorySnippetSource, SampleError, SampleLocation, SnippetSource,
};
pub use steps::{ClassFilterOptions, DecorateOptions};
