//! 照合エンジンの統合テスト
//!
//! ファイル読み込みから照合・集計までの流れと、結果が常に満たす性質を検証

use std::collections::HashSet;
use table_matcher::loader;
use table_matcher_common::{
    match_tables, Cell, FieldMapping, MatchParams, Table, DETAIL_COLUMN, MATCHED_TAGS_COLUMN,
    SIMILARITY_COLUMN, TOTAL_VALUE_COLUMN,
};
use tempfile::tempdir;

const WORDS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "corp", "ltd", "trading", "台北", "商行", "co",
];

fn mapping() -> FieldMapping {
    FieldMapping {
        main_field1: "field1".into(),
        main_field2: "field2".into(),
        tag_field1: "field1".into(),
        tag_field2: "field2".into(),
        tag_name_field: "name".into(),
        tag_value_field: "value".into(),
    }
}

/// 決定的な擬似乱数（線形合同法）
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }

    fn phrase(&mut self) -> String {
        let len = 1 + self.next() % 3;
        (0..len)
            .map(|_| WORDS[self.next() % WORDS.len()])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn generated_tables(seed: u64, main_rows: usize, tag_rows: usize) -> (Table, Table) {
    let mut rng = Lcg(seed);

    let main = Table::from_rows(
        vec!["id".into(), "field1".into(), "field2".into()],
        (0..main_rows)
            .map(|i| vec![Cell::Int(i as i64), Cell::Text(rng.phrase()), Cell::Text(rng.phrase())])
            .collect(),
    );
    let tags = Table::from_rows(
        vec!["field1".into(), "field2".into(), "name".into(), "value".into()],
        (0..tag_rows)
            .map(|i| {
                vec![
                    Cell::Text(rng.phrase()),
                    Cell::Text(rng.phrase()),
                    Cell::Text(format!("T{}", i)),
                    Cell::Int((rng.next() % 100) as i64),
                ]
            })
            .collect(),
    );
    (main, tags)
}

fn params(similarity_threshold: f64, max_matches: usize) -> MatchParams {
    MatchParams {
        similarity_threshold,
        max_matches,
        min_similarity: 0.3,
    }
}

#[test]
fn test_scenario_from_csv_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let main_path = dir.path().join("main.csv");
    let tag_path = dir.path().join("tags.csv");
    std::fs::write(&main_path, "field1,field2\nABC Corp,X\nXYZ Ltd,Y\n").unwrap();
    std::fs::write(
        &tag_path,
        "field1,field2,name,value\nabc corp,tagA,Tag1,10\nzzz,Y,Tag2,5\n",
    )
    .unwrap();

    let main = loader::load_table(&main_path, None).unwrap();
    let tags = loader::load_table(&tag_path, None).unwrap();
    let outcome = match_tables(&main, &tags, &mapping(), &MatchParams::default()).unwrap();

    let col = |name: &str| outcome.main.column_index(name).unwrap();
    assert_eq!(outcome.main.cell(0, col(TOTAL_VALUE_COLUMN)), &Cell::Int(10));
    assert_eq!(outcome.main.cell(0, col(MATCHED_TAGS_COLUMN)), &Cell::text("Tag1"));
    assert_eq!(outcome.main.cell(0, col(SIMILARITY_COLUMN)), &Cell::text("1.00"));
    assert_eq!(outcome.main.cell(1, col(TOTAL_VALUE_COLUMN)), &Cell::Int(5));
    assert_eq!(outcome.main.cell(1, col(MATCHED_TAGS_COLUMN)), &Cell::text("Tag2"));
    assert_eq!(outcome.main.cell(1, col(DETAIL_COLUMN)), &Cell::text("field2↔field2"));
    assert!(outcome.unmatched.is_empty());
}

#[test]
fn test_disjoint_conserved_and_capped() {
    for seed in 1..=5u64 {
        let (main, tags) = generated_tables(seed, 30, 60);
        for (threshold, cap) in [(0.5, 3), (0.8, 5), (0.3, 1)] {
            let outcome = match_tables(&main, &tags, &mapping(), &params(threshold, cap)).unwrap();

            let mut seen = HashSet::new();
            let mut total_matched = 0;
            for summary in &outcome.summaries {
                assert!(summary.matches.len() <= cap, "上限超過: seed={}", seed);
                for m in &summary.matches {
                    assert!(seen.insert(m.tag_row), "タグ {} が重複して使用された", m.tag_row);
                    assert!(m.score >= threshold && m.score <= 1.0);
                }
                total_matched += summary.matches.len();
            }

            assert_eq!(total_matched, outcome.consumed.len());
            assert_eq!(outcome.unmatched.len() + outcome.consumed.len(), tags.len());
            assert_eq!(outcome.main.len(), main.len());
        }
    }
}

#[test]
fn test_raising_threshold_never_adds_matches() {
    let (main, tags) = generated_tables(42, 12, 80);

    for row in 0..main.len() {
        let single = main.filter_rows(|i| i == row);
        let mut previous = usize::MAX;
        for threshold in [0.2, 0.4, 0.6, 0.8, 1.0] {
            let outcome = match_tables(&single, &tags, &mapping(), &params(threshold, 10)).unwrap();
            let count = outcome.summaries[0].matches.len();
            assert!(count <= previous, "閾値 {} で一致数が増加", threshold);
            previous = count;
        }
    }
}

#[test]
fn test_unmatched_keeps_original_order() {
    let (main, tags) = generated_tables(7, 10, 40);
    let outcome = match_tables(&main, &tags, &mapping(), &params(0.6, 5)).unwrap();

    let expected: Vec<&[Cell]> = (0..tags.len())
        .filter(|i| !outcome.consumed.contains(i))
        .filter_map(|i| tags.row(i))
        .collect();
    let actual: Vec<&[Cell]> = outcome.unmatched.rows().iter().map(|r| r.as_slice()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_shared_tag_goes_to_earlier_row() {
    let main = Table::from_rows(
        vec!["field1".into(), "field2".into()],
        vec![
            vec![Cell::text("Global Trading"), Cell::Empty],
            vec![Cell::text("Global Trading"), Cell::Empty],
        ],
    );
    let tags = Table::from_rows(
        vec!["field1".into(), "field2".into(), "name".into(), "value".into()],
        vec![vec![Cell::text("global trading"), Cell::Empty, Cell::text("GT"), Cell::Int(3)]],
    );

    let outcome = match_tables(&main, &tags, &mapping(), &MatchParams::default()).unwrap();
    assert_eq!(outcome.summaries[0].tag_names(), "GT");
    assert!(outcome.summaries[1].matches.is_empty());
    assert_eq!(outcome.summaries[1].total, Cell::Int(0));
}
