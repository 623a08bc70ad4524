//! Extraction errors
//!
//! Nothing is recovered internally: every variant aborts the run, and files
//! written before the failure stay on disk.

use crate::fsplit::extract::unit::Keyword;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line_number}: `{keyword}` declarator without a unit name: {line:?}")]
    MalformedDeclarator {
        line_number: usize,
        keyword: Keyword,
        line: String,
    },

    #[error("line {line_number}: declarator while `{open}` is still open: {line:?}")]
    NestedDeclarator {
        line_number: usize,
        open: String,
        line: String,
    },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }
}
