//! 测序 trace：碱基序列与质量值逐位对应

use crate::error::{Result, TrimError};

/// 一条 trace，`seq` 与 `qual_val` 长度始终相同
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    name: String,
    seq: Vec<u8>,
    qual_val: Vec<u8>,
}

impl Trace {
    /// 构造 trace，碱基数与质量值个数不一致时返回 `LengthMismatch`
    pub fn new(name: impl Into<String>, seq: Vec<u8>, qual_val: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if seq.len() != qual_val.len() {
            return Err(TrimError::LengthMismatch {
                name,
                bases: seq.len(),
                quals: qual_val.len(),
            });
        }
        Ok(Trace { name, seq, qual_val })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn qual_val(&self) -> &[u8] {
        &self.qual_val
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn max_quality(&self) -> u8 {
        self.qual_val.iter().copied().max().unwrap_or(0)
    }

    /// 平均质量，空 trace 返回 `None`
    pub fn average_quality(&self) -> Option<f64> {
        if self.qual_val.is_empty() {
            return None;
        }
        let sum: u64 = self.qual_val.iter().map(|&q| q as u64).sum();
        Some(sum as f64 / self.qual_val.len() as f64)
    }

    /// 截取 `[start, end)` 得到新的 trace，碱基和质量值一起截取
    ///
    /// 窗口倒置或越界时返回空 trace，不会 panic；原 trace 不变
    pub fn slice(&self, start: usize, end: usize) -> Trace {
        let end = end.min(self.seq.len());
        let (seq, qual_val) = if start < end {
            (self.seq[start..end].to_vec(), self.qual_val[start..end].to_vec())
        } else {
            (Vec::new(), Vec::new())
        };
        Trace {
            name: self.name.clone(),
            seq,
            qual_val,
        }
    }
}
