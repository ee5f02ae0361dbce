use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a document's lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSource {
    File(PathBuf),
    Text(String),
    Stdin,
}

impl LineSource {
    /// `-` means standard input, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            LineSource::Stdin
        } else {
            LineSource::File(PathBuf::from(arg))
        }
    }

    /// Reads the whole document.
    pub fn read_to_string(&self) -> Result<String, IoError> {
        match self {
            LineSource::File(path) => read_file(path),
            LineSource::Text(text) => Ok(text.clone()),
            LineSource::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }

    pub fn read_lines(&self) -> Result<Vec<String>, IoError> {
        Ok(lines_from_str(&self.read_to_string()?))
    }
}

impl From<&str> for LineSource {
    fn from(text: &str) -> Self {
        LineSource::Text(text.to_string())
    }
}

/// Read a markdown file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Read a markdown file as lines with their terminators removed.
pub fn read_lines(path: &Path) -> Result<Vec<String>, IoError> {
    Ok(lines_from_str(&read_file(path)?))
}

/// Splits text into lines, dropping `\n` / `\r\n` terminators only.
///
/// Trailing spaces survive because two of them mark a hard line break.
pub fn lines_from_str(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
