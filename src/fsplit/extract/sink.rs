//! Unit sinks
//!
//! The extractor never touches the filesystem directly: it opens, fills and
//! closes units through a [`UnitSink`]. [`DirectorySink`] writes one file per
//! unit, [`MemorySink`] keeps everything in memory for dry runs and tests.
//!
//! A sink holds at most one open unit. `open` is only called with no unit
//! open, `write_line` and `close` only with one open.
//!
//! Lines are raw bytes: source text is copied as found, whatever its encoding.

use crate::fsplit::extract::error::ExtractError;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub trait UnitSink {
    /// Start a new unit stored under `filename`, replacing any previous one.
    fn open(&mut self, filename: &str) -> Result<(), ExtractError>;

    /// Append one line (without its terminator) to the open unit.
    fn write_line(&mut self, line: &[u8]) -> Result<(), ExtractError>;

    /// Flush and release the open unit.
    fn close(&mut self) -> Result<(), ExtractError>;
}

/// Writes each unit to `<root>/<filename>`.
///
/// The root directory must exist; it is not created here.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    current: Option<(PathBuf, BufWriter<File>)>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: None,
        }
    }

    fn current(&mut self) -> Result<&mut (PathBuf, BufWriter<File>), ExtractError> {
        let root = &self.root;
        self.current.as_mut().ok_or_else(|| {
            ExtractError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::Other, "no unit is open"),
            )
        })
    }
}

impl UnitSink for DirectorySink {
    fn open(&mut self, filename: &str) -> Result<(), ExtractError> {
        let path = self.root.join(filename);
        let file = File::create(&path).map_err(|e| ExtractError::io(&path, e))?;
        self.current = Some((path, BufWriter::new(file)));
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), ExtractError> {
        let (path, writer) = self.current()?;
        writer
            .write_all(line)
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| ExtractError::io(path.as_path(), e))
    }

    fn close(&mut self) -> Result<(), ExtractError> {
        match self.current.take() {
            Some((path, mut writer)) => writer.flush().map_err(|e| ExtractError::io(path, e)),
            None => Ok(()),
        }
    }
}

/// Keeps units in memory, in the order they were opened.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
    current: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of `filename`, if a unit was written under that name.
    pub fn bytes(&self, filename: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, contents)| contents.as_slice())
    }

    /// Contents of `filename` as text, invalid UTF-8 replaced.
    pub fn get(&self, filename: &str) -> Option<Cow<'_, str>> {
        self.bytes(filename).map(String::from_utf8_lossy)
    }

    /// File names in the order they were first opened.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<(String, Vec<u8>)> {
        self.files
    }
}

impl UnitSink for MemorySink {
    fn open(&mut self, filename: &str) -> Result<(), ExtractError> {
        // Reopening a name truncates it, like File::create.
        let index = match self.files.iter().position(|(name, _)| name == filename) {
            Some(index) => {
                self.files[index].1.clear();
                index
            }
            None => {
                self.files.push((filename.to_string(), Vec::new()));
                self.files.len() - 1
            }
        };
        self.current = Some(index);
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), ExtractError> {
        if let Some(index) = self.current {
            let contents = &mut self.files[index].1;
            contents.extend_from_slice(line);
            contents.push(b'\n');
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ExtractError> {
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn directory_sink_writes_one_file_per_unit() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());

        sink.open("foo.f").unwrap();
        sink.write_line(b"      subroutine foo(x)").unwrap();
        sink.write_line(b"      end").unwrap();
        sink.close().unwrap();

        sink.open("bar.f").unwrap();
        sink.write_line(b"      function bar(y)").unwrap();
        sink.close().unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("foo.f")).unwrap(),
            "      subroutine foo(x)\n      end\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("bar.f")).unwrap(),
            "      function bar(y)\n"
        );
    }

    #[test]
    fn directory_sink_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.f"), "stale contents\nmore\n").unwrap();

        let mut sink = DirectorySink::new(dir.path());
        sink.open("foo.f").unwrap();
        sink.write_line(b"fresh").unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("foo.f")).unwrap(), "fresh\n");
    }

    #[test]
    fn directory_sink_requires_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("src"));
        let err = sink.open("foo.f").unwrap_err();
        match err {
            ExtractError::Io { path, .. } => assert!(path.ends_with("src/foo.f")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_sink_rejects_writes_without_open_unit() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        assert!(sink.write_line(b"orphan").is_err());
        assert!(sink.close().is_ok());
    }

    #[test]
    fn memory_sink_keeps_open_order_and_truncates_on_reopen() {
        let mut sink = MemorySink::new();
        sink.open("a.f").unwrap();
        sink.write_line(b"one").unwrap();
        sink.close().unwrap();
        sink.open("b.f").unwrap();
        sink.write_line(b"two").unwrap();
        sink.close().unwrap();
        sink.open("a.f").unwrap();
        sink.write_line(b"three").unwrap();
        sink.close().unwrap();

        assert_eq!(sink.filenames().collect::<Vec<_>>(), ["a.f", "b.f"]);
        assert_eq!(sink.get("a.f").as_deref(), Some("three\n"));
        assert_eq!(sink.get("b.f").as_deref(), Some("two\n"));
        assert_eq!(sink.get("c.f"), None);
        assert_eq!(sink.bytes("b.f"), Some(&b"two\n"[..]));
    }
}
