//! Routine extractor
//!
//! Runs the classified line stream through a small state machine:
//!
//! | line            | no unit open          | unit open                          |
//! |-----------------|-----------------------|------------------------------------|
//! | declarator      | open unit, header     | error (strict) / body line (lenient) |
//! | incomplete decl | error                 | error (strict) / body line (lenient) |
//! | terminator      | ignored               | copy line, footer, close unit      |
//! | ordinary        | dropped               | copy line                          |
//!
//! # Architecture
//!
//! - [`Extractor::extract_lines`] is the core: any line source, any sink
//! - [`Extractor::extract_str`] and [`Extractor::extract_file`] are thin wrappers
//! - [`Extractor::extract_to`] and [`extract`] write to a directory and the manifest
//!
//! Lines travel as bytes. Only a lossy UTF-8 view is classified; the sink gets
//! the original bytes, so sources in Latin-1 or another legacy encoding are
//! copied unchanged.

use crate::fsplit::extract::banner::Banner;
use crate::fsplit::extract::classification::{classify_line, LineClass};
use crate::fsplit::extract::error::ExtractError;
use crate::fsplit::extract::manifest::Manifest;
use crate::fsplit::extract::sink::{DirectorySink, UnitSink};
use crate::fsplit::extract::unit::{Category, Declarator, UnitSummary};
use fsplit_config::{FsplitConfig, OutputConfig};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Knobs of the extraction itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub banner: Banner,
    /// Reject a declarator seen while a unit is open. When off, such lines are
    /// copied into the open unit like any other.
    pub strict_nesting: bool,
    /// Names never listed in the manifest. Their files are still written.
    pub manifest_exclude: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            banner: Banner::default(),
            strict_nesting: true,
            manifest_exclude: Vec::new(),
        }
    }
}

impl From<&FsplitConfig> for ExtractOptions {
    fn from(config: &FsplitConfig) -> Self {
        Self {
            banner: Banner::from(&config.banner),
            strict_nesting: config.extraction.strict_nesting,
            manifest_exclude: config.extraction.manifest_exclude.clone(),
        }
    }
}

/// Where [`Extractor::extract_to`] puts its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub directory: PathBuf,
    pub manifest: PathBuf,
    pub create_directory: bool,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("src"),
            manifest: PathBuf::from("routines.lis"),
            create_directory: false,
        }
    }
}

impl From<&OutputConfig> for OutputLayout {
    fn from(config: &OutputConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            manifest: config.manifest.clone(),
            create_directory: config.create_directory,
        }
    }
}

/// Outcome of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Units closed by a terminator, in source order.
    pub units: Vec<UnitSummary>,
    pub manifest: Manifest,
    /// Ordinary lines seen outside any unit.
    pub dropped_lines: usize,
    /// File left open when the input ran out, if any.
    pub unterminated: Option<String>,
}

impl ExtractionReport {
    /// Number of units written with their closing banner.
    pub fn count(&self) -> usize {
        self.units.len()
    }
}

/// The unit currently receiving lines.
#[derive(Debug)]
struct OpenUnit {
    declarator: Declarator,
    filename: String,
    lines: usize,
}

/// Tracking state threaded through the line loop.
#[derive(Debug, Default)]
struct ExtractionState {
    current: Option<OpenUnit>,
    report: ExtractionReport,
}

impl ExtractionState {
    fn step<S: UnitSink + ?Sized>(
        &mut self,
        options: &ExtractOptions,
        line_number: usize,
        line: &[u8],
        sink: &mut S,
    ) -> Result<(), ExtractError> {
        let text = String::from_utf8_lossy(line);
        match classify_line(&text) {
            LineClass::Ordinary => self.copy_or_drop(line, sink),
            LineClass::Terminator => self.close(options, line, sink),
            LineClass::Declarator(declarator) => {
                if self.current.is_none() {
                    self.open(options, declarator, line, sink)
                } else {
                    self.nested(options, line_number, line, text, sink)
                }
            }
            LineClass::IncompleteDeclarator(keyword) => {
                if self.current.is_none() {
                    Err(ExtractError::MalformedDeclarator {
                        line_number,
                        keyword,
                        line: text.into_owned(),
                    })
                } else {
                    self.nested(options, line_number, line, text, sink)
                }
            }
        }
    }

    fn open<S: UnitSink + ?Sized>(
        &mut self,
        options: &ExtractOptions,
        declarator: Declarator,
        line: &[u8],
        sink: &mut S,
    ) -> Result<(), ExtractError> {
        let filename = declarator.filename();
        tracing::debug!(
            name = %declarator.name,
            category = %declarator.category(),
            file = %filename,
            "Opening unit"
        );

        sink.open(&filename)?;
        for banner_line in options.banner.header(&filename) {
            sink.write_line(banner_line.as_bytes())?;
        }
        sink.write_line(line)?;

        if declarator.category().is_listed() {
            self.list(options, &declarator.name);
        }

        self.current = Some(OpenUnit {
            declarator,
            filename,
            lines: 1,
        });
        Ok(())
    }

    fn list(&mut self, options: &ExtractOptions, name: &str) {
        if options.manifest_exclude.iter().any(|excluded| excluded == name) {
            tracing::debug!(name, "Keeping excluded routine out of the manifest");
            return;
        }
        if !self.report.manifest.push(name) {
            tracing::warn!(name, "Routine declared more than once, its file is overwritten");
        }
    }

    fn nested<S: UnitSink + ?Sized>(
        &mut self,
        options: &ExtractOptions,
        line_number: usize,
        line: &[u8],
        text: Cow<'_, str>,
        sink: &mut S,
    ) -> Result<(), ExtractError> {
        if options.strict_nesting {
            let open = self
                .current
                .as_ref()
                .map(|unit| unit.filename.clone())
                .unwrap_or_default();
            return Err(ExtractError::NestedDeclarator {
                line_number,
                open,
                line: text.into_owned(),
            });
        }
        tracing::debug!(line_number, "Declarator inside an open unit copied as body");
        self.copy_or_drop(line, sink)
    }

    fn copy_or_drop<S: UnitSink + ?Sized>(
        &mut self,
        line: &[u8],
        sink: &mut S,
    ) -> Result<(), ExtractError> {
        match self.current.as_mut() {
            Some(unit) => {
                sink.write_line(line)?;
                unit.lines += 1;
            }
            None => self.report.dropped_lines += 1,
        }
        Ok(())
    }

    fn close<S: UnitSink + ?Sized>(
        &mut self,
        options: &ExtractOptions,
        line: &[u8],
        sink: &mut S,
    ) -> Result<(), ExtractError> {
        let Some(unit) = self.current.take() else {
            tracing::trace!("Ignoring terminator outside any unit");
            return Ok(());
        };

        sink.write_line(line)?;
        for banner_line in options.banner.footer(&unit.filename) {
            sink.write_line(banner_line.as_bytes())?;
        }
        sink.close()?;

        self.report.units.push(UnitSummary {
            name: unit.declarator.name,
            category: Category::from(unit.declarator.keyword),
            filename: unit.filename,
            lines: unit.lines + 1,
        });
        Ok(())
    }

    fn finish<S: UnitSink + ?Sized>(
        mut self,
        sink: &mut S,
    ) -> Result<ExtractionReport, ExtractError> {
        if let Some(unit) = self.current.take() {
            tracing::warn!(
                file = %unit.filename,
                "Input ended inside a unit, its file has no closing banner"
            );
            sink.close()?;
            self.report.unterminated = Some(unit.filename);
        }
        if self.report.dropped_lines > 0 {
            tracing::debug!(
                count = self.report.dropped_lines,
                "Dropped lines outside any unit"
            );
        }
        Ok(self.report)
    }
}

/// Splits a multi-routine source into units.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    // ===== LINE-BASED PROCESSING (core) =====

    /// Run the state machine over `lines`, sending unit text to `sink`.
    pub fn extract_lines<I, S>(
        &self,
        lines: I,
        sink: &mut S,
    ) -> Result<ExtractionReport, ExtractError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: UnitSink + ?Sized,
    {
        let mut state = ExtractionState::default();
        for (index, line) in lines.into_iter().enumerate() {
            state.step(&self.options, index + 1, line.as_ref().as_bytes(), sink)?;
        }
        state.finish(sink)
    }

    /// Extract from source text held in memory.
    pub fn extract_str<S: UnitSink + ?Sized>(
        &self,
        source: &str,
        sink: &mut S,
    ) -> Result<ExtractionReport, ExtractError> {
        self.extract_lines(source.lines(), sink)
    }

    // ===== FILE-BASED PROCESSING (wrappers) =====

    /// Extract from a source file, reading it one line at a time.
    ///
    /// Lines end at `\n`; a `\r` before it is dropped. No encoding is assumed.
    pub fn extract_file<S: UnitSink + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        sink: &mut S,
    ) -> Result<ExtractionReport, ExtractError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;
        tracing::info!(source = %path.display(), "Extracting routines");

        let mut reader = BufReader::new(file);
        let mut state = ExtractionState::default();
        let mut buf = Vec::new();
        let mut line_number = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| ExtractError::io(path, e))?;
            if read == 0 {
                break;
            }
            line_number += 1;
            state.step(&self.options, line_number, trim_line_end(&buf), sink)?;
        }
        state.finish(sink)
    }

    /// Extract `source` into `layout.directory` and write the manifest.
    pub fn extract_to(
        &self,
        source: impl AsRef<Path>,
        layout: &OutputLayout,
    ) -> Result<ExtractionReport, ExtractError> {
        if layout.create_directory {
            fs::create_dir_all(&layout.directory)
                .map_err(|e| ExtractError::io(&layout.directory, e))?;
        }

        let mut sink = DirectorySink::new(&layout.directory);
        let report = self.extract_file(source, &mut sink)?;
        report.manifest.write_to(&layout.manifest)?;

        tracing::info!(
            units = report.count(),
            routines = report.manifest.len(),
            directory = %layout.directory.display(),
            manifest = %layout.manifest.display(),
            "Extraction complete"
        );
        Ok(report)
    }
}

/// Strip the `\n` or `\r\n` a raw line was read with.
fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split `source_path` into `src/` and write `routines.lis`, both relative to
/// the working directory, with default options.
///
/// Returns the number of units written and the manifest.
pub fn extract(source_path: impl AsRef<Path>) -> Result<(usize, Manifest), ExtractError> {
    let report = Extractor::default().extract_to(source_path, &OutputLayout::default())?;
    Ok((report.count(), report.manifest))
}
