//! Main execution logic for the cohesion engine.
//! Unified entry point for batch analysis.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::config::Config;
use crate::error::{LcomError, Result};
use crate::model::TypeModel;
use crate::types::{CohesionReport, TypeOutcome};

use super::worker;

/// Shared flag a caller can set to abort a running batch. Checked before
/// each per-type task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The main analysis engine.
/// Runs one independent task per type on a dedicated worker pool.
pub struct Engine {
    config: Config,
}

impl Engine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Entry point for analyzing a batch without cancellation.
    ///
    /// # Errors
    /// Returns error if the worker pool cannot be built.
    pub fn run(&self, types: &[TypeModel]) -> Result<CohesionReport> {
        self.run_with_progress(types, &CancellationToken::new(), &|_| {})
    }

    /// Entry point for analyzing a batch with cancellation and a progress
    /// callback invoked with each type name as its task starts.
    ///
    /// # Errors
    /// Returns `LcomError::Cancelled` if the token is set before every task
    /// has run; no partial report is produced.
    pub fn run_with_progress<F>(
        &self,
        types: &[TypeModel],
        token: &CancellationToken,
        on_progress: &F,
    ) -> Result<CohesionReport>
    where
        F: Fn(&str) + Sync,
    {
        let start = std::time::Instant::now();
        let _span = tracing::info_span!("cohesion_batch", types = types.len()).entered();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.analysis.workers)
            .build()?;

        let results: Vec<Option<(String, TypeOutcome)>> = pool.install(|| {
            types
                .par_iter()
                .map(|model| {
                    if token.is_cancelled() {
                        return None;
                    }
                    on_progress(&model.name);
                    Some((model.name.clone(), worker::analyze_type(model, &self.config)))
                })
                .collect()
        });

        if token.is_cancelled() || results.iter().any(Option::is_none) {
            tracing::info!("Batch cancelled");
            return Err(LcomError::Cancelled);
        }

        let report = CohesionReport {
            types: collect_outcomes(results.into_iter().flatten()),
            options: self.config.analysis.clone(),
            duration_ms: start.elapsed().as_millis(),
        };
        tracing::info!(
            measured = report.measured_count(),
            failed = report.failed_count(),
            "Batch complete"
        );
        Ok(report)
    }
}

/// Keys outcomes by type name. A repeated name gets a `#n` suffix so no
/// result is dropped.
fn collect_outcomes<I>(outcomes: I) -> BTreeMap<String, TypeOutcome>
where
    I: IntoIterator<Item = (String, TypeOutcome)>,
{
    let mut types = BTreeMap::new();
    for (name, outcome) in outcomes {
        let mut key = name.clone();
        let mut n = 2;
        while types.contains_key(&key) {
            key = format!("{name}#{n}");
            n += 1;
        }
        if key != name {
            tracing::warn!(type_name = %name, key = %key, "Duplicate type name");
        }
        types.insert(key, outcome);
    }
    types
}
