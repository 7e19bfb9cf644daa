//! Block enumeration: sliding category windows, overflow handling, and the
//! general (per-slot category table) regime.

use std::sync::Arc;

use tablecomb::{
    block_combinations, self_pair_combinations, self_triple_combinations, BinAxis, ChunkedTable,
    ColumnBinning, Combination, IndexPolicy, OverflowPolicy, SelectionMask, Slot, TableBuilder,
    ValueBinning,
};

fn globals(c: &Combination) -> Vec<usize> {
    c.cursors().iter().map(|r| r.global_index()).collect()
}

/// Two-axis binning over y and z; id = y bin + 7 * z bin.
fn yz_binning(overflow: OverflowPolicy) -> ColumnBinning {
    ColumnBinning::new(
        vec![
            BinAxis::new("y", vec![0.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 101.0]).unwrap(),
            BinAxis::new("z", vec![-7.0, -5.0, -3.0, -1.0, 1.0, 3.0, 5.0, 7.0]).unwrap(),
        ],
        overflow,
    )
    .unwrap()
}

/// Ten rows; rows {0, 4, 7} land in one category, {1, 6} in another, the
/// remaining five overflow the y or z edges.
fn sparse_table() -> ChunkedTable {
    TableBuilder::new()
        .column_i64("x", (0..10).collect::<Vec<_>>())
        .column_f64(
            "y",
            vec![25.0, 18.0, 48.0, 103.0, 28.0, 102.0, 12.0, 24.0, 41.0, 49.0],
        )
        .column_f64("z", vec![-6.0, 0.0, 8.0, 2.0, -6.0, 2.0, 0.0, -7.0, 8.0, 8.0])
        .build()
        .unwrap()
}

/// Ten rows split evenly into two categories: {0, 1, 3, 4, 7} and
/// {2, 5, 6, 8, 9}. No overflow.
fn dense_table() -> ChunkedTable {
    TableBuilder::new()
        .column_i64("x", (0..10).collect::<Vec<_>>())
        .column_f64(
            "y",
            vec![25.0, 21.0, 48.0, 26.0, 28.0, 42.0, 47.0, 24.0, 41.0, 49.0],
        )
        .column_f64(
            "z",
            vec![-1.3, -1.8, 2.0, -2.0, -1.5, 2.0, 2.5, -1.8, 1.3, 1.8],
        )
        .build()
        .unwrap()
}

/// Five rows with one-axis categories [0, 1, 1, 2, 3].
fn laddered_table() -> ChunkedTable {
    TableBuilder::new()
        .column_f64("y", vec![5.0, 15.0, 15.0, 25.0, 35.0])
        .build()
        .unwrap()
}

fn ladder_binning() -> ColumnBinning {
    ColumnBinning::new(
        vec![BinAxis::new("y", vec![0.0, 10.0, 20.0, 30.0, 40.0]).unwrap()],
        OverflowPolicy::Discard,
    )
    .unwrap()
}

#[test]
fn full_pairs_within_single_categories() {
    let t = sparse_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let pairs: Vec<Vec<usize>> = block_combinations(
        IndexPolicy::Full,
        &binning,
        1,
        0,
        vec![Slot::new(&t), Slot::new(&t)],
    )
    .unwrap()
    .iter()
    .map(|c| globals(&c))
    .collect();
    assert_eq!(
        pairs,
        vec![
            vec![0, 0],
            vec![0, 4],
            vec![0, 7],
            vec![4, 0],
            vec![4, 4],
            vec![4, 7],
            vec![7, 0],
            vec![7, 4],
            vec![7, 7],
            vec![1, 1],
            vec![1, 6],
            vec![6, 1],
            vec![6, 6],
        ]
    );
}

#[test]
fn strictly_upper_pairs_within_single_categories() {
    let t = sparse_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let pairs: Vec<Vec<usize>> = self_pair_combinations(&binning, 1, 0, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();
    assert_eq!(
        pairs,
        vec![vec![0, 4], vec![0, 7], vec![4, 7], vec![1, 6]]
    );
}

#[test]
fn negative_range_means_same_category_only() {
    let t = sparse_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let zero: Vec<Vec<usize>> = self_pair_combinations(&binning, 1, 0, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();
    let negative: Vec<Vec<usize>> = self_pair_combinations(&binning, 1, -1, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();
    assert_eq!(negative, zero);
    assert_eq!(
        negative,
        vec![vec![0, 4], vec![0, 7], vec![4, 7], vec![1, 6]]
    );
}

#[test]
fn retained_overflow_rows_never_pair() {
    let t = sparse_table();
    let discard: Vec<Vec<usize>> =
        self_pair_combinations(&yz_binning(OverflowPolicy::Discard), 1, 0, &t)
            .unwrap()
            .iter()
            .map(|c| globals(&c))
            .collect();
    let retain: Vec<Vec<usize>> =
        self_pair_combinations(&yz_binning(OverflowPolicy::Retain), 1, 0, &t)
            .unwrap()
            .iter()
            .map(|c| globals(&c))
            .collect();
    // Rows 2, 3, 5, 8, 9 overflow the edges; retention keeps them out of
    // every window either way.
    assert_eq!(discard, retain);
    for pair in &retain {
        assert!(!pair.iter().any(|r| [2, 3, 5, 8, 9].contains(r)));
    }
}

#[test]
fn pair_and_triple_counts_per_category() {
    let t = dense_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    // Two categories of five rows each.
    let pairs = self_pair_combinations(&binning, 1, 0, &t).unwrap();
    assert_eq!(pairs.iter().count(), 20); // 2 * C(5, 2)
    let triples = self_triple_combinations(&binning, 1, 0, &t).unwrap();
    assert_eq!(triples.iter().count(), 20); // 2 * C(5, 3)
}

#[test]
fn same_bin_pairs_partition_the_plain_pair_set() {
    let t = dense_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let block: Vec<Vec<usize>> = self_pair_combinations(&binning, 1, 0, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();

    // No pair twice.
    let mut deduped = block.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), block.len());

    // Exactly the plain pairs whose two rows share a category.
    let same_group = |a: usize, b: usize| {
        let g17 = [0usize, 1, 3, 4, 7];
        (g17.contains(&a) && g17.contains(&b)) || (!g17.contains(&a) && !g17.contains(&b))
    };
    let mut expected: Vec<Vec<usize>> = tablecomb::pair_combinations(&t)
        .iter()
        .map(|c| globals(&c))
        .filter(|p| same_group(p[0], p[1]))
        .collect();
    expected.sort();
    assert_eq!(deduped, expected);
}

#[test]
fn window_counters_track_category_boundaries() {
    let t = dense_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let mut fresh_at = Vec::new();
    for (i, c) in self_pair_combinations(&binning, 1, 0, &t)
        .unwrap()
        .iter()
        .enumerate()
    {
        assert_eq!(c.window_neighbours(), Some(1));
        if c.is_new_window() {
            fresh_at.push(i);
        }
    }
    // One window per category, each opening at its first pair.
    assert_eq!(fresh_at, vec![0, 10]);
}

#[test]
fn sliding_window_emits_each_pair_once() {
    let t = laddered_table();
    let collected: Vec<(Vec<usize>, bool, usize)> =
        self_pair_combinations(&ladder_binning(), 2, 1, &t)
            .unwrap()
            .iter()
            .map(|c| {
                (
                    globals(&c),
                    c.is_new_window(),
                    c.window_neighbours().unwrap(),
                )
            })
            .collect();
    // Categories per row: [0, 1, 1, 2, 3]. Each window merges two
    // consecutive non-empty categories; a pair is owned by the window
    // anchored at its smaller category.
    assert_eq!(
        collected,
        vec![
            (vec![0, 1], true, 2),
            (vec![0, 2], false, 2),
            (vec![1, 2], true, 2),
            (vec![1, 3], false, 2),
            (vec![2, 3], false, 2),
            (vec![3, 4], true, 2),
        ]
    );
}

#[test]
fn range_zero_ignores_window_depth() {
    let t = laddered_table();
    // A deep window offers cross-category candidates, but range 0 keeps
    // only same-category pairs.
    let pairs: Vec<Vec<usize>> = self_pair_combinations(&ladder_binning(), 3, 0, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();
    assert_eq!(pairs, vec![vec![1, 2]]);
}

#[test]
fn window_depth_limits_reach_even_under_wide_range() {
    let t = TableBuilder::new()
        .column_i64("cat", vec![1, 1, 2, 2, 2, 5])
        .build()
        .unwrap();
    let binning = ValueBinning::new("cat");
    // Range admits any category distance here, so the window depth alone
    // decides which rows can meet.
    let pairs: Vec<Vec<usize>> = self_pair_combinations(&binning, 2, 10, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();
    // Window at cat 1 merges cats {1, 2}; window at cat 2 merges {2, 5}.
    // Rows of cat 1 never meet row 5 (cat 5).
    assert_eq!(pairs.len(), 13); // C(6, 2) minus (0,5) and (1,5)
    assert!(!pairs.contains(&vec![0, 5]));
    assert!(!pairs.contains(&vec![1, 5]));
    assert!(pairs.contains(&vec![2, 5]));
}

#[test]
fn value_binning_groups_by_raw_id() {
    let t = TableBuilder::new()
        .column_i64("ev", vec![7, 7, 3, 3, 3, 9])
        .build()
        .unwrap();
    let pairs: Vec<Vec<usize>> = self_pair_combinations(&ValueBinning::new("ev"), 1, 0, &t)
        .unwrap()
        .iter()
        .map(|c| globals(&c))
        .collect();
    // Categories enumerate in ascending id order: 3 before 7 before 9.
    assert_eq!(pairs, vec![vec![2, 3], vec![2, 4], vec![3, 4], vec![0, 1]]);
}

#[test]
fn selection_composes_with_block() {
    let t = dense_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let mut keep = vec![true; 10];
    keep[0] = false;
    let mask = Arc::new(SelectionMask::from_mask(&keep));
    let slot = Slot::filtered_shared(&t, mask).unwrap();
    let pairs: Vec<Vec<usize>> = block_combinations(
        IndexPolicy::StrictlyUpper,
        &binning,
        1,
        0,
        vec![slot.clone(), slot],
    )
    .unwrap()
    .iter()
    .map(|c| globals(&c))
    .collect();
    // Dropping row 0 shrinks its category to four rows.
    assert_eq!(pairs.len(), 16); // C(4, 2) + C(5, 2)
    assert!(pairs.iter().all(|p| !p.contains(&0)));
    assert_eq!(pairs[0], vec![1, 3]);
}

#[test]
fn general_regime_pairs_two_tables_by_category() {
    let a = TableBuilder::new()
        .column_i64("ev", vec![0, 0, 1])
        .build()
        .unwrap();
    let b = TableBuilder::new()
        .column_i64("ev", vec![0, 1, 1])
        .build()
        .unwrap();
    let binning = ValueBinning::new("ev");
    let pairs: Vec<Vec<usize>> = block_combinations(
        IndexPolicy::Full,
        &binning,
        1,
        0,
        vec![Slot::new(&a), Slot::new(&b)],
    )
    .unwrap()
    .iter()
    .map(|c| globals(&c))
    .collect();
    assert_eq!(
        pairs,
        vec![vec![0, 0], vec![1, 0], vec![2, 1], vec![2, 2]]
    );
}

#[test]
fn general_regime_skips_categories_missing_from_a_slot() {
    let a = TableBuilder::new()
        .column_i64("ev", vec![0, 0, 2])
        .build()
        .unwrap();
    let b = TableBuilder::new()
        .column_i64("ev", vec![1, 2])
        .build()
        .unwrap();
    let binning = ValueBinning::new("ev");
    let pairs: Vec<Vec<usize>> = block_combinations(
        IndexPolicy::Full,
        &binning,
        1,
        0,
        vec![Slot::new(&a), Slot::new(&b)],
    )
    .unwrap()
    .iter()
    .map(|c| globals(&c))
    .collect();
    // Only category 2 exists in both tables.
    assert_eq!(pairs, vec![vec![2, 1]]);
}

#[test]
fn block_restarts_and_early_exit_are_safe() {
    let t = dense_table();
    let binning = yz_binning(OverflowPolicy::Discard);
    let generator = self_pair_combinations(&binning, 1, 0, &t).unwrap();
    let first: Vec<Vec<usize>> = generator.iter().map(|c| globals(&c)).collect();
    // Abandon an iterator mid-window, then run again in full.
    let partial: Vec<Vec<usize>> = generator.iter().take(4).map(|c| globals(&c)).collect();
    assert_eq!(partial, first[..4].to_vec());
    let second: Vec<Vec<usize>> = generator.iter().map(|c| globals(&c)).collect();
    assert_eq!(first, second);
}

#[test]
fn all_rows_overflowing_yields_nothing() {
    let t = TableBuilder::new()
        .column_f64("y", vec![-10.0, 200.0])
        .column_f64("z", vec![0.0, 0.0])
        .build()
        .unwrap();
    for overflow in [OverflowPolicy::Discard, OverflowPolicy::Retain] {
        let generator = self_pair_combinations(&yz_binning(overflow), 1, 0, &t).unwrap();
        assert_eq!(generator.iter().count(), 0);
    }
}
