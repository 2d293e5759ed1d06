//! Skill similarity: normalized string similarity used by the skill matcher.
//!
//! Default: `GestaltScorer`, the Ratcliff/Obershelp ratio `2·M / (|a| + |b|)`
//! where `M` counts characters in recursively found longest common blocks.

/// Pluggable similarity backend. Implementations must be deterministic,
/// case-insensitive, and return a value in `[0.0, 1.0]`.
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GestaltScorer;

impl SimilarityScorer for GestaltScorer {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity(a, b)
    }
}

/// Gestalt pattern-matching ratio of `a` and `b`, ignoring case. Two empty strings score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Sum of the lengths of all matching blocks: take the longest common block,
/// then recurse into the unmatched regions on its left and right.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, k) = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if k == 0 {
            continue;
        }
        matched += k;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + k < a_hi && j + k < b_hi {
            pending.push((i + k, a_hi, j + k, b_hi));
        }
    }

    matched
}

/// Longest common block within `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
/// Ties go to the earliest start in `a`, then the earliest start in `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let width = b_hi - b_lo;
    let mut best = (a_lo, b_lo, 0);
    // run[j + 1] = length of the common run ending at a[i - 1], b[b_lo + j]
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in a_lo..a_hi {
        for j in 0..width {
            curr[j + 1] = if a[i] == b[b_lo + j] { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best.2 {
                best = (i + 1 - k, b_lo + j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
