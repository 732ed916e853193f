use std::fmt;

use thiserror::Error;

/// Failures while rendering a service.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("invalid codegen option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error("formatting error: {0}")]
    Format(#[from] fmt::Error),
}
