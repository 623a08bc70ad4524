//! Routine extraction
//!
//! Splits a concatenated Fortran-like source into one file per program,
//! block-data unit, subroutine or function.
//!
//! The work happens in a single forward pass:
//! 1. Every line is classified on its own (./extract/classification.rs)
//!    into ordinary, terminator or declarator lines.
//! 2. The extractor (./extract/extractor.rs) threads an explicit state through
//!    the stream: at most one unit is open at a time, declarators open one,
//!    `end` closes it, everything else is copied or dropped.
//! 3. Unit text goes to a [`sink::UnitSink`], either a directory on disk or an
//!    in-memory map, wrapped in the generated banners (./extract/banner.rs).
//! 4. Subroutine and function names are collected into the manifest
//!    (./extract/manifest.rs), written once at the end.

pub mod banner;
pub mod classification;
pub mod error;
pub mod extractor;
pub mod manifest;
pub mod sink;
pub mod unit;

pub use banner::Banner;
pub use classification::{classify_line, LineClass};
pub use error::ExtractError;
pub use extractor::{extract, ExtractOptions, ExtractionReport, Extractor, OutputLayout};
pub use manifest::Manifest;
pub use sink::{DirectorySink, MemorySink, UnitSink};
pub use unit::{Category, Declarator, Keyword, UnitSummary};
