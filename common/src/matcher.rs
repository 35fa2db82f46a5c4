//! 貪欲照合
//!
//! 主表の行を入力順に処理し、まだ使われていないタグ行から候補を集める。
//! 採用したタグ行は消費済みとなり、後続の主表行からは見えなくなる。
//! 先に処理した行が優先される順序依存の割り当てで、全体最適ではない。

use crate::candidate::{evaluate_pair, MainKeys, MatchCandidate, MatchColumns, TagKeys};
use crate::types::MatchParams;
use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 消費済みタグ行の集合
pub type ConsumptionSet = BTreeSet<usize>;

/// 主表1行に対する一致タグを求める（上位 `max_matches` 件）
///
/// `tag_keys` はタグ表の行順に並んだ正規化済み照合値。
/// 消費済み集合は参照のみ。採用行の登録は呼び出し側が行う。
pub fn find_matches(
    main_keys: &MainKeys,
    tag_keys: &[TagKeys],
    columns: &MatchColumns,
    params: &MatchParams,
    consumed: &ConsumptionSet,
) -> Vec<MatchCandidate> {
    if params.max_matches == 0 || main_keys.is_blank() {
        return Vec::new();
    }

    let mut candidates = collect_candidates(main_keys, tag_keys, columns, params, consumed);

    // 安定ソート: 同点はタグ表の行順を維持
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(params.max_matches);
    candidates
}

/// 採用した候補を消費済みにする
pub fn consume(consumed: &mut ConsumptionSet, matches: &[MatchCandidate]) {
    consumed.extend(matches.iter().map(|m| m.tag_row));
}

fn accept(candidate: &MatchCandidate, params: &MatchParams) -> bool {
    candidate.score >= params.min_similarity
}

#[cfg(feature = "parallel")]
fn collect_candidates(
    main_keys: &MainKeys,
    tag_keys: &[TagKeys],
    columns: &MatchColumns,
    params: &MatchParams,
    consumed: &ConsumptionSet,
) -> Vec<MatchCandidate> {
    tag_keys
        .par_iter()
        .enumerate()
        .filter(|(tag_row, _)| !consumed.contains(tag_row))
        .filter_map(|(tag_row, keys)| {
            evaluate_pair(main_keys, keys, tag_row, columns, params.similarity_threshold)
        })
        .filter(|c| accept(c, params))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_candidates(
    main_keys: &MainKeys,
    tag_keys: &[TagKeys],
    columns: &MatchColumns,
    params: &MatchParams,
    consumed: &ConsumptionSet,
) -> Vec<MatchCandidate> {
    tag_keys
        .iter()
        .enumerate()
        .filter(|(tag_row, _)| !consumed.contains(tag_row))
        .filter_map(|(tag_row, keys)| {
            evaluate_pair(main_keys, keys, tag_row, columns, params.similarity_threshold)
        })
        .filter(|c| accept(c, params))
        .collect()
}
