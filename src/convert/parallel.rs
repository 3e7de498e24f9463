//! Parallel document converter.
//!
//! Architecture:
//! - Main thread: collect string leaves in document order
//! - Feeder: send one job per code
//! - Worker pool: decode and compress codes independently
//! - Main thread: gather results by job id, write them back in the same order

use crossbeam::channel::{bounded, Receiver, Sender};
use log::debug;
use serde_json::{Map, Value};

use super::{
    command_error, finish_document, take_commands, BroadlinkToTuya, CodeConverter, ConvertStats,
    DocumentConverter,
};
use crate::error::{Error, Result};
use crate::ConvertConfig;

/// A single code to convert
struct ConvertJob<'a> {
    /// Position of the code in document order
    job_id: usize,
    key: &'a str,
    code: &'a str,
}

/// Result of converting a single code
struct ConvertedCode {
    job_id: usize,
    encoded: Result<String>,
}

/// Parallel converter implementation
pub struct ParallelConverter {
    config: ConvertConfig,
}

impl ParallelConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    fn effective_threads(&self) -> usize {
        self.config.effective_threads()
    }
}

impl DocumentConverter for ParallelConverter {
    fn convert(&mut self, mut document: Value) -> Result<(Value, ConvertStats)> {
        let num_threads = self.effective_threads();

        // For single thread, delegate to single-threaded implementation for efficiency
        if num_threads == 1 {
            let mut single = super::single::SingleThreadedConverter::new(self.config.clone());
            return single.convert(document);
        }

        let mut commands = take_commands(&mut document)?;
        let converter = BroadlinkToTuya::new(self.config.level);

        let encoded = {
            let mut leaves = Vec::new();
            collect_codes(&commands, &mut leaves);
            debug!("converting {} codes on {} threads", leaves.len(), num_threads);
            convert_parallel(&converter, &leaves, num_threads)?
        };

        let mut stats = ConvertStats::default();
        let mut encoded = encoded.into_iter();
        replace_codes(&mut commands, &mut encoded, &mut stats)?;

        Ok((finish_document(document, commands), stats))
    }
}

/// String leaves as `(key, code)` in document order
fn collect_codes<'a>(commands: &'a Map<String, Value>, out: &mut Vec<(&'a str, &'a str)>) {
    for (key, value) in commands {
        match value {
            Value::String(code) => out.push((key.as_str(), code.as_str())),
            Value::Object(nested) => collect_codes(nested, out),
            _ => {}
        }
    }
}

/// Overwrite string leaves in the same order `collect_codes` visits them
fn replace_codes(
    commands: &mut Map<String, Value>,
    encoded: &mut impl Iterator<Item = String>,
    stats: &mut ConvertStats,
) -> Result<()> {
    for value in commands.values_mut() {
        match value {
            Value::String(code) => {
                let next = encoded.next().ok_or_else(|| {
                    Error::Internal("fewer converted codes than leaves".to_string())
                })?;
                stats.record(code, &next);
                *code = next;
            }
            Value::Object(nested) => replace_codes(nested, encoded, stats)?,
            _ => {}
        }
    }
    Ok(())
}

fn convert_parallel<C: CodeConverter>(
    converter: &C,
    leaves: &[(&str, &str)],
    num_threads: usize,
) -> Result<Vec<String>> {
    // Channel capacity - enough to keep workers busy without excessive memory
    let channel_capacity = num_threads * 4;

    let (job_tx, job_rx): (Sender<ConvertJob<'_>>, Receiver<ConvertJob<'_>>) =
        bounded(channel_capacity);
    let (result_tx, result_rx): (Sender<ConvertedCode>, Receiver<ConvertedCode>) =
        bounded(channel_capacity);

    // Use crossbeam's scoped threads so jobs can borrow the document
    let result = crossbeam::scope(|scope| {
        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move |_| {
                worker_thread(converter, job_rx, result_tx);
            });
        }

        // Drop our copies of the channels that workers use
        drop(job_rx);
        drop(result_tx);

        scope.spawn(move |_| {
            for (job_id, &(key, code)) in leaves.iter().enumerate() {
                if job_tx.send(ConvertJob { job_id, key, code }).is_err() {
                    break;
                }
            }
        });

        gather_results(result_rx, leaves.len())
    });

    result.map_err(|_| Error::Internal("Thread panicked".to_string()))?
}

fn worker_thread<C: CodeConverter>(
    converter: &C,
    job_rx: Receiver<ConvertJob<'_>>,
    result_tx: Sender<ConvertedCode>,
) {
    for job in job_rx {
        let encoded = converter.convert(job.code).map_err(|e| command_error(job.key, e));
        if result_tx.send(ConvertedCode { job_id: job.job_id, encoded }).is_err() {
            break;
        }
    }
}

/// Receive every result, reorder by job id
///
/// All results are drained before returning so workers never block on a full
/// channel. The error of the earliest failing code wins, matching the
/// single-threaded converter.
fn gather_results(result_rx: Receiver<ConvertedCode>, count: usize) -> Result<Vec<String>> {
    let mut slots: Vec<Option<String>> = vec![None; count];
    let mut first_error: Option<(usize, Error)> = None;

    for converted in result_rx {
        match converted.encoded {
            Ok(encoded) => slots[converted.job_id] = Some(encoded),
            Err(e) => {
                if first_error.as_ref().map_or(true, |(id, _)| converted.job_id < *id) {
                    first_error = Some((converted.job_id, e));
                }
            }
        }
    }

    if let Some((_, e)) = first_error {
        return Err(e);
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::Internal("missing converted code".to_string()))
}
