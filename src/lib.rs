//! Signal-to-noise measurement of compressed audio against its original.
//!
//! The pipeline loads each catalog pair, aligns the two signals to a common
//! length, computes the SNR of the compressed rendition and of the original
//! against itself, and collects one [`models::AnalysisRecord`] per entry.

pub mod align;
pub mod catalog;
pub mod chart;
pub mod error;
pub mod format;
pub mod loader;
pub mod models;
pub mod processor;
pub mod report;
pub mod snr;
pub mod tui;

pub use error::{Result, SnrError};
