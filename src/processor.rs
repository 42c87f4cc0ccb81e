use tracing::{debug, warn};

use crate::align::align;
use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Result, SnrError};
use crate::loader::AudioLoader;
use crate::models::{AnalysisRecord, AnalysisReport, Measurement, Outcome, ProcessEvent};
use crate::snr::compute_snr;

/// What to do when an entry cannot be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole run on the first failing entry.
    FailFast,
    /// Record the failure in the entry's record and continue.
    #[default]
    KeepGoing,
}

/// Measures every catalog entry in order, one at a time.
pub struct CatalogProcessor<L> {
    loader: L,
    policy: FailurePolicy,
}

impl<L: AudioLoader> CatalogProcessor<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn process(&self, catalog: &Catalog) -> Result<AnalysisReport> {
        self.process_with_progress(catalog, |_| {})
    }

    /// Measure the catalog, reporting progress via callback.
    ///
    /// The report holds exactly one record per entry, in catalog order.
    pub fn process_with_progress(
        &self,
        catalog: &Catalog,
        mut on_event: impl FnMut(ProcessEvent<'_>),
    ) -> Result<AnalysisReport> {
        let total = catalog.len();
        let mut records = Vec::with_capacity(total);

        for (index, entry) in catalog.entries().iter().enumerate() {
            on_event(ProcessEvent::EntryStarted {
                index,
                total,
                algorithm: &entry.algorithm,
            });

            let outcome = match self.measure_entry(catalog, entry) {
                Ok(measurement) => Outcome::Measured(measurement),
                Err(e) if self.policy == FailurePolicy::KeepGoing => {
                    let message = e.to_string();
                    let outcome = failure_outcome(e).map_err(|e| entry_error(entry, e))?;
                    warn!(algorithm = %entry.algorithm, error = %message, "entry not measured");
                    on_event(ProcessEvent::EntryFailed {
                        index,
                        algorithm: &entry.algorithm,
                        message,
                    });
                    outcome
                }
                Err(e) => return Err(entry_error(entry, e)),
            };

            let record = AnalysisRecord {
                algorithm: entry.algorithm.clone(),
                original: entry.original.display().to_string(),
                compressed: entry.compressed.display().to_string(),
                size_mb: entry.size_mb,
                duration_min: entry.duration_min(),
                bitrate_kbps: entry.bitrate_kbps,
                outcome,
            };

            if record.measurement().is_some() {
                on_event(ProcessEvent::EntryCompleted {
                    index,
                    record: &record,
                });
            }
            records.push(record);
        }

        Ok(AnalysisReport {
            records,
            catalog: catalog.name().map(String::from),
        })
    }

    /// Load, align and measure a single entry. Both signals are dropped on return.
    fn measure_entry(&self, catalog: &Catalog, entry: &CatalogEntry) -> Result<Measurement> {
        let original = self.loader.load(&catalog.original_path(entry))?;
        let compressed = self.loader.load(&catalog.compressed_path(entry))?;

        if original.sample_rate != compressed.sample_rate {
            warn!(
                algorithm = %entry.algorithm,
                original_rate = original.sample_rate,
                compressed_rate = compressed.sample_rate,
                "sample rates differ; signals are compared sample-by-sample without resampling"
            );
        }

        let (reference, test) = align(&original.samples, &compressed.samples)?;
        let compressed_snr = compute_snr(reference, test)?;
        let reference_snr = compute_snr(reference, reference)?;

        debug!(
            algorithm = %entry.algorithm,
            aligned = reference.len(),
            original_len = original.len(),
            compressed_len = compressed.len(),
            "measured"
        );

        Ok(Measurement {
            compressed_snr,
            reference_snr,
            aligned_samples: reference.len(),
            original_sample_rate: original.sample_rate,
            compressed_sample_rate: compressed.sample_rate,
        })
    }
}

fn entry_error(entry: &CatalogEntry, source: SnrError) -> SnrError {
    SnrError::Entry {
        algorithm: entry.algorithm.clone(),
        source: Box::new(source),
    }
}

/// Map an entry failure onto the record outcome. Errors that are not a
/// per-entry load or signal problem are handed back so the run aborts.
fn failure_outcome(err: SnrError) -> Result<Outcome> {
    match err {
        SnrError::Load { path, message } => Ok(Outcome::LoadFailure {
            path: path.display().to_string(),
            message,
        }),
        SnrError::DegenerateSignal(message) => Ok(Outcome::DegenerateSignal { message }),
        other => Err(other),
    }
}
