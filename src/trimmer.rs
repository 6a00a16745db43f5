//! Trim → validate → keep/discard, for one trace or a directory of them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::abif;
use crate::error::{Result, TrimError};
use crate::fasta;
use crate::heuristic::trim_window;
use crate::rules::{MinAverageQuality, MinLengthRetention, NoLongNRun, RuleSet, Verdict};
use crate::trace::Trace;

/// Extensions recognised as ABIF trace files.
pub const TRACE_EXTENSIONS: &[&str] = &["ab1", "abi"];

/// Rule thresholds.
#[derive(Debug, Clone)]
pub struct TrimConfig {
    pub max_n_run: usize,
    pub min_retention: f64,
    pub min_avg_quality: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            max_n_run: 2,
            min_retention: 0.7,
            min_avg_quality: 30.0,
        }
    }
}

impl TrimConfig {
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(vec![
            Box::new(NoLongNRun {
                max_run: self.max_n_run,
            }),
            Box::new(MinLengthRetention {
                min_fraction: self.min_retention,
            }),
            Box::new(MinAverageQuality {
                min_average: self.min_avg_quality,
            }),
        ])
    }
}

/// Batch-mode output settings.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Subdirectory of the input directory receiving the output.
    pub out_dir_name: String,
    pub merged_name: String,
    pub threads: usize,
    /// Gzip the merged file (appends `.gz` to its name).
    pub compress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            out_dir_name: "trimmed".to_string(),
            merged_name: "merged.fas".to_string(),
            threads: 4,
            compress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted(Trace),
    Discarded { name: String, reason: String },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Accepted traces in input order.
    pub accepted: Vec<Trace>,
    pub discarded: Vec<(String, String)>,
    /// Inputs that could not be decoded or evaluated.
    pub failed: Vec<(PathBuf, String)>,
    pub merged_path: Option<PathBuf>,
    pub total: usize,
}

pub struct Trimmer {
    rules: RuleSet,
}

impl Trimmer {
    pub fn new(rules: RuleSet) -> Self {
        Trimmer { rules }
    }

    pub fn with_config(config: &TrimConfig) -> Self {
        Trimmer::new(config.rule_set())
    }

    /// Trims one trace and checks it against the rule set.
    pub fn trim(&self, trace: &Trace) -> Result<Outcome> {
        info!("Trimming {}", trace.name());
        debug!(
            "\tlength: {}, max {}, avg: {:.1}",
            trace.len(),
            trace.max_quality(),
            trace.average_quality().unwrap_or(0.0)
        );

        let (start, end) = trim_window(trace.seq(), trace.qual_val());
        debug!("\ttrimming from {} to {}", start, end);
        let trimmed = trace.slice(start, end);

        match self.rules.validate(trace, &trimmed)? {
            Verdict::Pass => Ok(Outcome::Accepted(trimmed)),
            Verdict::Fail(reason) => {
                warn!("Discarding an unqualified trace {}: {}", trace.name(), reason);
                Ok(Outcome::Discarded {
                    name: trace.name().to_string(),
                    reason,
                })
            }
        }
    }

    /// Trims a single ABIF file, writing `<stem>_trimmed.fas` next to it when
    /// the result is accepted. Returns the written path, if any.
    pub fn trim_file(&self, path: &Path) -> Result<Option<PathBuf>> {
        let original = abif::read_trace(path)?;
        match self.trim(&original)? {
            Outcome::Accepted(trimmed) => {
                let out = path.with_file_name(format!("{}_trimmed.fas", original.name()));
                info!("\tsaving a trimmed trace to {}", out.display());
                fasta::save_fasta(&trimmed, &out)?;
                Ok(Some(out))
            }
            Outcome::Discarded { .. } => Ok(None),
        }
    }

    /// Decodes, trims and writes one file; every failure stays inside the
    /// returned result so one bad input cannot stop the batch.
    fn process_file(&self, path: &Path, out: &Path) -> Result<Outcome> {
        let original = abif::read_trace(path)?;
        let outcome = self.trim(&original)?;
        if let Outcome::Accepted(trimmed) = &outcome {
            debug!("\tsaving a trimmed trace to {}", out.display());
            fasta::save_fasta(trimmed, out)?;
        }
        Ok(outcome)
    }
}

/// Lists trace files directly inside `dir`, sorted by path.
pub fn discover_traces(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_trace_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_trace_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| TRACE_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
        .unwrap_or(false)
}

/// Picks a per-trace output file name for every input.
///
/// The default is `<stem>.fas`. When that is taken (`s.ab1` next to `s.abi`)
/// or equals one of the `reserved` names, the full file name is used instead
/// (`s.abi.fas`). Names are compared case-insensitively; an input with no
/// free name gets an `OutputCollision` error.
pub fn plan_outputs(files: &[PathBuf], reserved: &[&str]) -> Vec<Result<String>> {
    let mut taken: HashSet<String> = reserved.iter().map(|r| r.to_ascii_lowercase()).collect();
    files
        .iter()
        .map(|path| {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("trace");
            let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or(stem);
            for candidate in [format!("{}.fas", stem), format!("{}.fas", file_name)] {
                if taken.insert(candidate.to_ascii_lowercase()) {
                    return Ok(candidate);
                }
            }
            Err(TrimError::OutputCollision {
                path: path.clone(),
                name: format!("{}.fas", stem),
            })
        })
        .collect()
}

/// Trims every trace file in `dir` and merges the accepted ones into one FASTA.
pub fn trim_and_merge(trimmer: Arc<Trimmer>, dir: &Path, options: &BatchOptions) -> Result<BatchReport> {
    let files = discover_traces(dir)?;
    let out_dir = dir.join(&options.out_dir_name);
    fs::create_dir_all(&out_dir)?;
    info!("Trimming {} ab1 files", files.len());

    let mut merged_name = options.merged_name.clone();
    if options.compress && !merged_name.ends_with(".gz") {
        merged_name.push_str(".gz");
    }
    let outputs = plan_outputs(&files, &[options.merged_name.as_str(), merged_name.as_str()]);

    let (job_tx, job_rx): (Sender<(usize, PathBuf, PathBuf)>, Receiver<(usize, PathBuf, PathBuf)>) = bounded(64);
    let (res_tx, res_rx): (Sender<(usize, PathBuf, Result<Outcome>)>, Receiver<(usize, PathBuf, Result<Outcome>)>) =
        bounded(64);

    let mut handles = Vec::new();
    for _ in 0..options.threads.max(1) {
        let rx = job_rx.clone();
        let tx = res_tx.clone();
        let trimmer = Arc::clone(&trimmer);
        handles.push(thread::spawn(move || {
            while let Ok((idx, path, out)) = rx.recv() {
                let result = trimmer.process_file(&path, &out);
                if tx.send((idx, path, result)).is_err() {
                    break;
                }
            }
        }));
    }
    drop(job_rx);
    drop(res_tx);

    let total = files.len();
    let mut results: Vec<(usize, PathBuf, Result<Outcome>)> = Vec::new();
    let mut jobs = Vec::with_capacity(total);
    for (idx, (path, output)) in files.into_iter().zip(outputs).enumerate() {
        match output {
            Ok(name) => jobs.push((idx, path, out_dir.join(name))),
            Err(e) => results.push((idx, path, Err(e))),
        }
    }
    // 单独线程投递任务，避免和结果通道互相阻塞
    let feeder = thread::spawn(move || {
        for job in jobs {
            if job_tx.send(job).is_err() {
                break;
            }
        }
    });

    results.extend(res_rx.iter());

    feeder
        .join()
        .map_err(|_| std::io::Error::other("job feeder thread panicked"))?;
    for handle in handles {
        handle
            .join()
            .map_err(|_| std::io::Error::other("trimming worker panicked"))?;
    }

    results.sort_by_key(|(idx, _, _)| *idx);

    let mut report = BatchReport {
        total,
        ..BatchReport::default()
    };
    for (_, path, result) in results {
        match result {
            Ok(Outcome::Accepted(trace)) => report.accepted.push(trace),
            Ok(Outcome::Discarded { name, reason }) => report.discarded.push((name, reason)),
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                report.failed.push((path, e.to_string()));
            }
        }
    }

    let merged_path = out_dir.join(merged_name);
    info!(
        "Merging {}/{} files to {}",
        report.accepted.len(),
        report.total,
        merged_path.display()
    );
    fasta::write_merged(&report.accepted, &merged_path)?;
    report.merged_path = Some(merged_path);

    Ok(report)
}
