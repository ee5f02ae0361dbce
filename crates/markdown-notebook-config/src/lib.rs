use markdown_notebook_engine::{
    ClassFilterOptions, DecorateOptions, LineSource, Notebook, PipelineOptions, SectionOptions,
};
use relative_path::RelativePathBuf;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// A document spliced into the section stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportEntry {
    /// Relative to the directory of the document being converted.
    pub path: RelativePathBuf,
    /// Section position; negative values count from the end.
    pub index: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kernel: String,
    /// Replaces the built-in keep set when present.
    pub keep_classes: Option<BTreeSet<String>>,
    pub filter_classes: BTreeSet<String>,
    pub shells: Option<BTreeSet<String>>,
    pub start_on_header: bool,
    pub strict_variables: bool,
    pub notebook_title: Option<String>,
    pub docs_url: Option<String>,
    pub docs_logo_url: Option<String>,
    pub ipynb_github_url: Option<String>,
    /// Local mirror that `github_sample` directives read from instead of the network.
    pub samples_dir: Option<PathBuf>,
    /// Raw-content host for `github_sample` downloads.
    pub samples_url: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub imports: Vec<ImportEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kernel: Notebook::DEFAULT_KERNEL.to_string(),
            keep_classes: None,
            filter_classes: BTreeSet::new(),
            shells: None,
            start_on_header: true,
            strict_variables: false,
            notebook_title: None,
            docs_url: None,
            docs_logo_url: None,
            ipynb_github_url: None,
            samples_dir: None,
            samples_url: None,
            variables: BTreeMap::new(),
            imports: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the samples directory
        config.samples_dir = config
            .samples_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-notebook");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Maps the file onto the engine's options. Import paths resolve against `base_dir`.
    pub fn pipeline_options(&self, base_dir: &Path) -> PipelineOptions {
        let defaults = ClassFilterOptions::default();

        let mut imports: BTreeMap<i64, Vec<LineSource>> = BTreeMap::new();
        for entry in &self.imports {
            imports
                .entry(entry.index)
                .or_default()
                .push(LineSource::File(entry.path.to_path(base_dir)));
        }

        PipelineOptions {
            variables: self.variables.clone(),
            strict_variables: self.strict_variables,
            imports,
            sections: SectionOptions {
                start_on_header: self.start_on_header,
            },
            classes: ClassFilterOptions {
                keep: self.keep_classes.clone().unwrap_or(defaults.keep),
                force_filter: self.filter_classes.clone(),
                shells: self.shells.clone().unwrap_or(defaults.shells),
            },
            decorations: DecorateOptions {
                docs_url: self.docs_url.clone(),
                docs_logo_url: self.docs_logo_url.clone(),
                ipynb_github_url: self.ipynb_github_url.clone(),
            },
            notebook_title: self.notebook_title.clone(),
            kernel: self.kernel.clone(),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
