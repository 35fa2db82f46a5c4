//! 類似度計算
//!
//! Ratcliff/Obershelp方式の一致率（`2 * 一致文字数 / 両文字列の長さ合計`）。
//! 最長一致ブロックを見つけ、その左右を再帰的に探索して一致文字数を数える。

use crate::normalize::normalize_text;
use std::collections::HashMap;

/// 頻出文字の除外を行う最小長
const AUTOJUNK_MIN_LEN: usize = 200;

/// 正規化済み文字列同士の類似度（0.0〜1.0）
///
/// どちらかが空なら0.0。
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let matches = BlockMatcher::new(&a, &b).matching_chars();

    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// 生の文字列を正規化してから類似度を計算する
pub fn similarity(text1: &str, text2: &str) -> f64 {
    sequence_ratio(&normalize_text(text1), &normalize_text(text2))
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// b中の各文字の出現位置（昇順）
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // 長い文字列では頻出文字を一致の起点にしない
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// a[alo..ahi] と b[blo..bhi] の最長一致ブロック (i, j, size)
    ///
    /// 同じ長さなら a 側で最も早く始まるもの、次に b 側で最も早いものを返す。
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // j2len[j] = a[..i] と b[..=j] の末尾で一致している長さ
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = match j.checked_sub(1) {
                        Some(p) => j2len.get(&p).copied().unwrap_or(0),
                        None => 0,
                    };
                    let k = prev + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // 起点から除外した頻出文字でブロックを前後に伸ばす
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// 一致ブロックの合計文字数
    fn matching_chars(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_is_one() {
        assert_eq!(sequence_ratio("abc corp", "abc corp"), 1.0);
        assert_eq!(sequence_ratio("台北", "台北"), 1.0);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(sequence_ratio("", "abc"), 0.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
        assert_eq!(sequence_ratio("", ""), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // 一致ブロック "ab" + "d" → 2*3/8
        assert!(approx(sequence_ratio("abcd", "abxd"), 0.75));
        // "bcd" 一致 → 2*3/8
        assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
        // 共通文字なし
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        // 最初に見つかる "t" で分割されるため一致は1文字のみ
        assert!(approx(sequence_ratio("tide", "diet"), 0.25));
    }

    #[test]
    fn test_order_of_blocks() {
        // "qabxcd" と "abycdf": "ab" と "cd" が一致 → 2*4/12
        assert!(approx(sequence_ratio("qabxcd", "abycdf"), 8.0 / 12.0));
    }

    #[test]
    fn test_symmetric_for_simple_inputs() {
        let pairs = [("abc corp", "abc co"), ("xyz ltd", "xyz limited"), ("台北市", "台北")];
        for (a, b) in pairs {
            assert!(approx(sequence_ratio(a, b), sequence_ratio(b, a)), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_bounds() {
        let samples = ["", "a", "abc", "abc corp", "zzz", "台北市信義區", "aaaaab"];
        for a in samples {
            for b in samples {
                let r = sequence_ratio(a, b);
                assert!((0.0..=1.0).contains(&r), "{} / {} = {}", a, b, r);
            }
        }
    }

    #[test]
    fn test_long_strings_with_popular_chars() {
        // 200文字以上では頻出文字が起点にならないが、隣接する一致としては伸びる
        let a = "a".repeat(250);
        let b = format!("{}b", "a".repeat(249));
        let r = sequence_ratio(&a, &b);
        assert!((0.0..=1.0).contains(&r));

        let text: String = (0..30).map(|i| format!("record {} ", i)).collect();
        assert!(text.chars().count() >= 200);
        assert_eq!(sequence_ratio(&text, &text), 1.0);
    }

    #[test]
    fn test_similarity_normalizes() {
        assert_eq!(similarity("ABC Corp", "abc corp"), 1.0);
        assert_eq!(similarity("  ", "abc"), 0.0);
    }
}
