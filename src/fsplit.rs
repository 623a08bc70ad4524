//! Main module for the routine extractor

pub mod extract;
