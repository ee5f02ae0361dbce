//! `{% github_sample /owner/repo/blob/branch/path tag:name %}` directives.
//!
//! Each directive is replaced by the lines found between `[START name]` and
//! `[END name]` markers in the referenced file. Where the file comes from is up
//! to a [`SnippetSource`]; a fetch failure aborts the conversion.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("invalid github_sample location: {0}")]
    InvalidLocation(String),
    #[error("sample not found: {0}")]
    NotFound(String),
    #[error("failed to read sample {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },
}

/// A file at a branch of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^/([^/]+)/([^/]+)/blob/([^/]+)/([\w/.-]+)$")
            .expect("Invalid sample location regex")
    })
}

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{%\s*github_sample\s+(\S+)\s+tag:(\w+)\s*%\}")
            .expect("Invalid github_sample regex")
    })
}

impl SampleLocation {
    /// Parses `/owner/repo/blob/branch/path`.
    pub fn parse(location: &str) -> Result<Self, SampleError> {
        let caps = location_re()
            .captures(location)
            .ok_or_else(|| SampleError::InvalidLocation(location.to_string()))?;
        Ok(SampleLocation {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            branch: caps[3].to_string(),
            path: caps[4].to_string(),
        })
    }
}

impl fmt::Display for SampleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/blob/{}/{}",
            self.owner, self.repo, self.branch, self.path
        )
    }
}

/// Retrieves the full text of a sample file.
pub trait SnippetSource {
    fn fetch(&self, location: &SampleLocation) -> Result<String, SampleError>;
}

/// Reads samples from a local mirror laid out as `<root>/<owner>/<repo>/<branch>/<path>`.
#[derive(Debug, Clone)]
pub struct DirectorySnippetSource {
    root: PathBuf,
}

impl DirectorySnippetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySnippetSource { root: root.into() }
    }
}

impl SnippetSource for DirectorySnippetSource {
    fn fetch(&self, location: &SampleLocation) -> Result<String, SampleError> {
        let path = self
            .root
            .join(&location.owner)
            .join(&location.repo)
            .join(&location.branch)
            .join(&location.path);
        if !path.is_file() {
            return Err(SampleError::NotFound(location.to_string()));
        }
        std::fs::read_to_string(&path).map_err(|source| SampleError::Io { path, source })
    }
}

/// Samples held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySnippetSource {
    files: HashMap<SampleLocation, String>,
}

impl MemorySnippetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: SampleLocation, text: impl Into<String>) {
        self.files.insert(location, text.into());
    }
}

impl SnippetSource for MemorySnippetSource {
    fn fetch(&self, location: &SampleLocation) -> Result<String, SampleError> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| SampleError::NotFound(location.to_string()))
    }
}

/// Where raw file contents are served on GitHub.
pub const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// `<base>/<owner>/<repo>/<branch>/<path>`
pub fn raw_url(base_url: &str, location: &SampleLocation) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        location.owner,
        location.repo,
        location.branch,
        location.path
    )
}

fn check_status(url: &str, status: reqwest::StatusCode) -> Result<(), SampleError> {
    if status.is_success() {
        return Ok(());
    }
    Err(SampleError::Http {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

/// Downloads samples from GitHub's raw file host, or a server laid out the same way.
///
/// Any non-success response fails the fetch. Wrap it in a
/// [`CachedSnippetSource`] so that a file used by several directives is only
/// downloaded once.
pub struct GithubSnippetSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl GithubSnippetSource {
    pub fn new() -> Result<Self, SampleError> {
        Self::with_base_url(GITHUB_RAW_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SampleError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SampleError::Client)?;
        Ok(GithubSnippetSource {
            client,
            base_url: base_url.into(),
        })
    }
}

impl SnippetSource for GithubSnippetSource {
    fn fetch(&self, location: &SampleLocation) -> Result<String, SampleError> {
        let url = raw_url(&self.base_url, location);
        log::debug!("downloading sample {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| SampleError::Request {
                url: url.clone(),
                source,
            })?;
        check_status(&url, response.status())?;
        response
            .text()
            .map_err(|source| SampleError::Request { url, source })
    }
}

/// Fetches each location at most once.
pub struct CachedSnippetSource<S> {
    inner: S,
    cache: RefCell<HashMap<SampleLocation, String>>,
}

impl<S: SnippetSource> CachedSnippetSource<S> {
    pub fn new(inner: S) -> Self {
        CachedSnippetSource {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<S: SnippetSource> SnippetSource for CachedSnippetSource<S> {
    fn fetch(&self, location: &SampleLocation) -> Result<String, SampleError> {
        if let Some(text) = self.cache.borrow().get(location) {
            return Ok(text.clone());
        }
        let text = self.inner.fetch(location)?;
        self.cache
            .borrow_mut()
            .insert(location.clone(), text.clone());
        Ok(text)
    }
}

/// Whether `line` holds a `[ keyword tag ]` marker.
fn has_marker(line: &str, keyword: &str, tag: &str) -> bool {
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find(']') else {
            return false;
        };
        let mut words = rest[..close].split_whitespace();
        if words.next() == Some(keyword) && words.next() == Some(tag) && words.next().is_none() {
            return true;
        }
    }
    false
}

/// Lines strictly between `[START tag]` and `[END tag]`, common indentation removed.
///
/// Empty when the start marker is missing; runs to the end of `text` when the
/// end marker is missing.
pub fn extract_snippet(text: &str, tag: &str) -> String {
    let mut lines = text
        .lines()
        .skip_while(|line| !has_marker(line, "START", tag));
    if lines.next().is_none() {
        return String::new();
    }
    let snippet: Vec<&str> = lines.take_while(|line| !has_marker(line, "END", tag)).collect();

    let indent = snippet
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    snippet
        .iter()
        .map(|line| line.chars().skip(indent).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces every sample directive in `text` with its snippet.
pub fn expand_samples(text: &str, source: &dyn SnippetSource) -> Result<String, SampleError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in directive_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let location = SampleLocation::parse(&caps[1])?;
        let tag = &caps[2];
        log::debug!("expanding sample {location} tag {tag}");

        let snippet = extract_snippet(&source.fetch(&location)?, tag);
        out.push_str(&text[last..whole.start()]);
        out.push_str(&snippet);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
