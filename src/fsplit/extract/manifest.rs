//! Manifest of extracted routines
//!
//! Subroutine and function names in the order they were first declared, one
//! per line on disk.

use crate::fsplit::extract::error::ExtractError;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    names: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name unless it is already listed.
    ///
    /// Returns `false` for a duplicate, which keeps its first position.
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// One name per line, each line newline-terminated.
    pub fn render(&self) -> String {
        self.names.iter().map(|name| format!("{}\n", name)).collect()
    }

    /// Write the rendered manifest to `path`, replacing any previous one.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExtractError> {
        let path = path.as_ref();
        fs::write(path, self.render()).map_err(|e| ExtractError::io(path, e))
    }
}

impl<S: Into<String>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut manifest = Manifest::new();
        for name in iter {
            manifest.push(name);
        }
        manifest
    }
}
