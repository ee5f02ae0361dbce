use crate::io::IoError;
use crate::preprocess::{SampleError, UndefinedVariable};

/// Anything that aborts a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    UndefinedVariable(#[from] UndefinedVariable),
    #[error("failed to expand sample: {0}")]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Io(#[from] IoError),
}
