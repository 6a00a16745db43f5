//! 首尾切点的启发式算法
//!
//! 只检查序列的前三分之一，切点放在窗口内最后一个"坏"碱基之后：
//! - 质量低于整条序列最大质量的一半（整数除法）
//! - 或者碱基为 N

/// 返回好序列开始的位置
pub fn head_trim_index(seq: &[u8], qual: &[u8]) -> usize {
    debug_assert_eq!(seq.len(), qual.len());
    let half_max = qual.iter().copied().max().unwrap_or(0) / 2;

    let mut head = 0;
    for i in 0..qual.len() / 3 {
        if qual[i] < half_max || is_n(seq[i]) {
            head = i + 1;
        }
    }
    head
}

/// 正向坐标下的修剪窗口 `[start, end)`
///
/// `end` 由反向序列上的 [`head_trim_index`] 换算：`len - 1 - index`，
/// 所以尾部即使不需要修剪也会丢掉最后一个碱基
pub fn trim_window(seq: &[u8], qual: &[u8]) -> (usize, usize) {
    let start = head_trim_index(seq, qual);

    let rev_seq: Vec<u8> = seq.iter().rev().copied().collect();
    let rev_qual: Vec<u8> = qual.iter().rev().copied().collect();
    let rev_head = head_trim_index(&rev_seq, &rev_qual);

    let end = seq.len().saturating_sub(1).saturating_sub(rev_head);
    (start, end)
}

/// N 不区分大小写
#[inline]
pub(crate) fn is_n(base: u8) -> bool {
    base.eq_ignore_ascii_case(&b'N')
}
