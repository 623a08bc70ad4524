//! # fsplit
//!
//! Splits a concatenated Fortran source (the historical `decay0.for` generator)
//! into one file per routine, each wrapped in a generated licence banner, and
//! writes a manifest of the extracted routine names.
//!
//! The entry points live in [`fsplit::extract`]; the `extract` binary wraps
//! them with configuration loading from the `fsplit-config` crate.

pub mod fsplit;
