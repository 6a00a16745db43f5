// lib.rs - 库函数

pub mod abif;
pub mod error;
pub mod fasta;
pub mod heuristic;
pub mod rules;
pub mod trace;
pub mod trimmer;

pub use error::{Result, TrimError};
pub use heuristic::{head_trim_index, trim_window};
pub use rules::{parse_n_run_limit, MinAverageQuality, MinLengthRetention, NoLongNRun, QualityRule, RuleSet, Verdict};
pub use trace::Trace;
pub use trimmer::{trim_and_merge, BatchOptions, BatchReport, Outcome, TrimConfig, Trimmer};
