use serde::{Deserialize, Serialize};

/// Height used to draw a perfect reconstruction in charts.
pub const PERFECT_DISPLAY_DB: f64 = 100.0;

/// Label drawn in place of a number for a perfect reconstruction.
pub const PERFECT_LABEL: &str = "\u{221e}";

/// Outcome of a single SNR measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "db", rename_all = "snake_case")]
pub enum SnrResult {
    /// Measured ratio in decibels.
    Finite(f64),
    /// Noise power was exactly zero.
    PerfectReconstruction,
}

impl SnrResult {
    /// The measured decibel value, or `None` for a perfect reconstruction.
    pub fn db(&self) -> Option<f64> {
        match self {
            SnrResult::Finite(db) => Some(*db),
            SnrResult::PerfectReconstruction => None,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, SnrResult::PerfectReconstruction)
    }

    /// Value to plot: the measurement itself, or [`PERFECT_DISPLAY_DB`].
    pub fn display_value(&self) -> f64 {
        self.db().unwrap_or(PERFECT_DISPLAY_DB)
    }

    /// Text label: two decimals, or [`PERFECT_LABEL`].
    pub fn label(&self) -> String {
        match self {
            SnrResult::Finite(db) => format!("{:.2}", db),
            SnrResult::PerfectReconstruction => PERFECT_LABEL.to_string(),
        }
    }
}

/// SNR values and signal facts for an entry that was measured successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub compressed_snr: SnrResult,
    /// Original compared against itself; always a perfect reconstruction.
    pub reference_snr: SnrResult,
    pub aligned_samples: usize,
    pub original_sample_rate: u32,
    pub compressed_sample_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Measured(Measurement),
    LoadFailure { path: String, message: String },
    DegenerateSignal { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub algorithm: String,
    pub original: String,
    pub compressed: String,
    pub size_mb: f64,
    pub duration_min: f64,
    pub bitrate_kbps: u32,
    pub outcome: Outcome,
}

impl AnalysisRecord {
    pub fn measurement(&self) -> Option<&Measurement> {
        match &self.outcome {
            Outcome::Measured(m) => Some(m),
            _ => None,
        }
    }

    pub fn compressed_snr(&self) -> Option<SnrResult> {
        self.measurement().map(|m| m.compressed_snr)
    }

    pub fn reference_snr(&self) -> Option<SnrResult> {
        self.measurement().map(|m| m.reference_snr)
    }

    /// Short reason for a failed entry.
    pub fn failure(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Measured(_) => None,
            Outcome::LoadFailure { message, .. } => Some(message),
            Outcome::DegenerateSignal { message } => Some(message),
        }
    }
}

/// Ordered dataset produced by one pass over a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub records: Vec<AnalysisRecord>,
    pub catalog: Option<String>,
}

impl AnalysisReport {
    pub fn measured_count(&self) -> usize {
        self.records.iter().filter(|r| r.measurement().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.records.len() - self.measured_count()
    }
}

/// Progress notifications emitted while a catalog is processed.
pub enum ProcessEvent<'a> {
    EntryStarted { index: usize, total: usize, algorithm: &'a str },
    EntryCompleted { index: usize, record: &'a AnalysisRecord },
    EntryFailed { index: usize, algorithm: &'a str, message: String },
}
