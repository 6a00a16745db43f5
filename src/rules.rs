//! 质量规则：判断修剪后的 trace 是否值得保留

use crate::error::{Result, TrimError};
use crate::heuristic::is_n;
use crate::trace::Trace;

/// 单条规则的检查结果，`Fail` 带诊断信息
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// 质量规则接口
///
/// 对 (原始, 修剪后) 两条 trace 做判断：
/// - `Ok(Pass)` 通过
/// - `Ok(Fail(msg))` 不合格，属于正常过滤
/// - `Err(..)` 无法计算（例如空质量序列）
pub trait QualityRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, original: &Trace, trimmed: &Trace) -> Result<Verdict>;
}

/// 连续 N 检查：出现 `max_run` 个或更多连续 N 即判为不合格
///
/// `max_run` 至少为 1，见 [`parse_n_run_limit`]。
#[derive(Debug, Clone)]
pub struct NoLongNRun {
    pub max_run: usize,
}

impl Default for NoLongNRun {
    fn default() -> Self {
        Self { max_run: 2 }
    }
}

/// 解析命令行给出的连续 N 上限，0 会让所有非空序列都不合格，因此拒绝
pub fn parse_n_run_limit(s: &str) -> std::result::Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl QualityRule for NoLongNRun {
    fn name(&self) -> &'static str {
        "no-long-n-run"
    }

    fn evaluate(&self, _original: &Trace, trimmed: &Trace) -> Result<Verdict> {
        let mut run = 0usize;
        for &base in trimmed.seq() {
            if is_n(base) {
                run += 1;
            } else {
                run = 0;
            }
            if run >= self.max_run {
                return Ok(Verdict::Fail(format!(
                    "{} or more consecutive Ns",
                    self.max_run
                )));
            }
        }
        Ok(Verdict::Pass)
    }
}

/// 长度保留检查：修剪后至少保留原始长度的 `min_fraction`（默认 70%）
#[derive(Debug, Clone)]
pub struct MinLengthRetention {
    pub min_fraction: f64,
}

impl Default for MinLengthRetention {
    fn default() -> Self {
        Self { min_fraction: 0.7 }
    }
}

impl QualityRule for MinLengthRetention {
    fn name(&self) -> &'static str {
        "min-length-retention"
    }

    fn evaluate(&self, original: &Trace, trimmed: &Trace) -> Result<Verdict> {
        let kept = trimmed.len() as f64;
        if kept < self.min_fraction * original.len() as f64 {
            return Ok(Verdict::Fail(format!(
                "too short: kept {} of {} bases",
                trimmed.len(),
                original.len()
            )));
        }
        Ok(Verdict::Pass)
    }
}

/// 平均质量检查：修剪后平均质量不低于 `min_average`（默认 30，等于 30 通过）
#[derive(Debug, Clone)]
pub struct MinAverageQuality {
    pub min_average: f64,
}

impl Default for MinAverageQuality {
    fn default() -> Self {
        Self { min_average: 30.0 }
    }
}

impl QualityRule for MinAverageQuality {
    fn name(&self) -> &'static str {
        "min-average-quality"
    }

    fn evaluate(&self, _original: &Trace, trimmed: &Trace) -> Result<Verdict> {
        let average = trimmed
            .average_quality()
            .ok_or_else(|| TrimError::EmptyQuality {
                name: trimmed.name().to_string(),
            })?;
        if average < self.min_average {
            return Ok(Verdict::Fail(format!(
                "intensity too low: average quality {:.2} < {}",
                average, self.min_average
            )));
        }
        Ok(Verdict::Pass)
    }
}

/// 有序规则集合，按顺序求 AND
pub struct RuleSet {
    rules: Vec<Box<dyn QualityRule>>,
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn QualityRule>>) -> Self {
        RuleSet { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 返回第一条失败规则的结果，全部通过则返回 `Pass`
    /// 第一条失败之后的规则不再执行
    pub fn validate(&self, original: &Trace, trimmed: &Trace) -> Result<Verdict> {
        for rule in &self.rules {
            let verdict = rule.evaluate(original, trimmed)?;
            if let Verdict::Fail(msg) = verdict {
                tracing::debug!(rule = rule.name(), trace = trimmed.name(), "rule failed");
                return Ok(Verdict::Fail(msg));
            }
        }
        Ok(Verdict::Pass)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::new(vec![
            Box::new(NoLongNRun::default()),
            Box::new(MinLengthRetention::default()),
            Box::new(MinAverageQuality::default()),
        ])
    }
}
