//! Generic per-event loop shared by every analysis driver.
//!
//! Drivers implement [`Analysis`] and supply an [`Accumulator`]; the runner
//! owns reading, batching, skip bookkeeping and the optional rayon
//! map-reduce across events.
//!
//! ```text
//!  EventSource ──batch──► chunks ──(par_)map──► partial RunOutcomes ──merge in order──► RunOutcome
//! ```

use std::collections::BTreeMap;

use rayon::prelude::*;
use tp_core::{ErrorInfo, TpError};

use crate::config::RunnerConfig;
use crate::source::{EventRecord, EventSource};

/// Records folded per partial outcome. Partials are merged in record order,
/// so floating-point sums depend on the batch size but never on the thread
/// count or on scheduling.
const CHUNK_SIZE: usize = 64;

/// Per-worker partial state that can be merged into a total.
///
/// Partials are merged in record order, so `merge` only needs to be
/// associative for parallel and sequential runs to agree.
pub trait Accumulator: Default + Send {
    /// Folds `other` into `self`.
    fn merge(&mut self, other: Self);
}

/// Result of analysing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventVerdict {
    /// The record passed and was accumulated.
    Analyzed,
    /// The record was rejected for the given reason code.
    Skipped(&'static str),
}

/// Per-event callback supplied by a driver.
pub trait Analysis: Sync {
    /// Partial result type.
    type Acc: Accumulator;

    /// Short name used in logs and summaries.
    fn name(&self) -> &str;

    /// Processes one record. Implementations only touch `acc` for records
    /// they report as [`EventVerdict::Analyzed`].
    fn analyze(&self, record: &EventRecord, acc: &mut Self::Acc) -> EventVerdict;
}

/// Counters and accumulated state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome<A> {
    /// Records pulled from the source.
    pub events_read: usize,
    /// Records that passed the analysis.
    pub events_analyzed: usize,
    /// Skipped records per reason code.
    pub skipped: BTreeMap<String, usize>,
    /// Accumulated analysis state.
    pub accumulator: A,
}

impl<A: Default> Default for RunOutcome<A> {
    fn default() -> Self {
        Self {
            events_read: 0,
            events_analyzed: 0,
            skipped: BTreeMap::new(),
            accumulator: A::default(),
        }
    }
}

impl<A> RunOutcome<A> {
    /// Total number of skipped records.
    pub fn events_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl<A: Accumulator> RunOutcome<A> {
    fn observe<T: Analysis<Acc = A>>(&mut self, analysis: &T, record: &EventRecord) {
        self.events_read += 1;
        match analysis.analyze(record, &mut self.accumulator) {
            EventVerdict::Analyzed => self.events_analyzed += 1,
            EventVerdict::Skipped(reason) => {
                *self.skipped.entry(reason.to_string()).or_default() += 1;
            }
        }
    }
}

impl<A: Accumulator> Accumulator for RunOutcome<A> {
    fn merge(&mut self, other: Self) {
        self.events_read += other.events_read;
        self.events_analyzed += other.events_analyzed;
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_default() += count;
        }
        self.accumulator.merge(other.accumulator);
    }
}

/// Drives an [`Analysis`] over an [`EventSource`].
#[derive(Debug)]
pub struct Runner {
    batch_size: usize,
    pool: Option<rayon::ThreadPool>,
}

impl Runner {
    /// Creates a runner; any thread count other than `1` builds a rayon pool.
    pub fn new(config: &RunnerConfig) -> Result<Self, TpError> {
        if config.batch_size == 0 {
            return Err(TpError::Config(ErrorInfo::new(
                "batch-size",
                "batch size must be positive",
            )));
        }
        let pool = if config.threads == 1 {
            None
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build()
                .map_err(|err| {
                    TpError::Analysis(
                        ErrorInfo::new("thread-pool", err.to_string())
                            .with_context("threads", config.threads.to_string()),
                    )
                })?;
            Some(pool)
        };
        Ok(Self {
            batch_size: config.batch_size,
            pool,
        })
    }

    /// Runs `analysis` over every record of `source`.
    ///
    /// Source errors abort the run; per-event failures are tallied as skips.
    pub fn run<S, T>(&self, source: &mut S, analysis: &T) -> Result<RunOutcome<T::Acc>, TpError>
    where
        S: EventSource + ?Sized,
        T: Analysis,
    {
        let mut total = RunOutcome::default();
        let mut batch = Vec::with_capacity(self.batch_size);
        let mut exhausted = false;
        while !exhausted {
            batch.clear();
            while batch.len() < self.batch_size {
                match source.next_record()? {
                    Some(record) => batch.push(record),
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }
            if batch.is_empty() {
                break;
            }
            total.merge(self.process(&batch, analysis));
            tracing::debug!(
                analysis = analysis.name(),
                events_read = total.events_read,
                "batch complete"
            );
        }
        tracing::info!(
            analysis = analysis.name(),
            events_read = total.events_read,
            events_analyzed = total.events_analyzed,
            events_skipped = total.events_skipped(),
            "run complete"
        );
        Ok(total)
    }

    fn process<T: Analysis>(&self, batch: &[EventRecord], analysis: &T) -> RunOutcome<T::Acc> {
        let partials: Vec<RunOutcome<T::Acc>> = match &self.pool {
            None => batch
                .chunks(CHUNK_SIZE)
                .map(|chunk| observe_chunk(analysis, chunk))
                .collect(),
            Some(pool) => pool.install(|| {
                batch
                    .par_chunks(CHUNK_SIZE)
                    .map(|chunk| observe_chunk(analysis, chunk))
                    .collect()
            }),
        };
        let mut outcome = RunOutcome::default();
        for partial in partials {
            outcome.merge(partial);
        }
        outcome
    }
}

fn observe_chunk<T: Analysis>(analysis: &T, chunk: &[EventRecord]) -> RunOutcome<T::Acc> {
    let mut outcome = RunOutcome::default();
    for record in chunk {
        outcome.observe(analysis, record);
    }
    outcome
}
