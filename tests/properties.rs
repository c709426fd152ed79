//! Property and scenario tests that exercise the builder and searcher together, cross-checking
//! against an independent oracle R-tree where it helps.

use bytemuck::cast_slice;
use flatpack_rtree::{HilbertRTree, HilbertRTreeBuilder, HilbertRTreeIndex, HilbertRTreeRef, HilbertSort};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

fn build(boxes: &[(f64, f64, f64, f64)]) -> HilbertRTree<f64> {
    let mut builder = HilbertRTreeBuilder::new(boxes.len()).unwrap();
    for &(min_x, min_y, max_x, max_y) in boxes {
        builder.add(min_x, min_y, max_x, max_y).unwrap();
    }
    builder.finish::<HilbertSort>().unwrap()
}

fn random_boxes(n: usize, world: f64, seed: u64) -> Vec<(f64, f64, f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x: f64 = rng.gen_range(0.0..world);
            let y: f64 = rng.gen_range(0.0..world);
            let w: f64 = rng.gen_range(0.1..2.0);
            let h: f64 = rng.gen_range(0.1..2.0);
            (x, y, x + w, y + h)
        })
        .collect()
}

#[test]
fn scenario_empty_query_on_four_disjoint_boxes() {
    let boxes = vec![
        (0.0, 0.0, 1.0, 1.0),
        (2.0, 2.0, 3.0, 3.0),
        (4.0, 4.0, 5.0, 5.0),
        (6.0, 6.0, 7.0, 7.0),
    ];
    let tree = build(&boxes);
    assert_eq!(tree.search(10.0, 10.0, 20.0, 20.0), Vec::<usize>::new());
}

#[test]
fn scenario_overlapping_query_matches_expected_set() {
    let boxes = vec![
        (0.0, 0.0, 1.0, 1.0),
        (2.0, 2.0, 3.0, 3.0),
        (4.0, 4.0, 5.0, 5.0),
        (6.0, 6.0, 7.0, 7.0),
    ];
    let tree = build(&boxes);
    let mut hits = tree.search(0.5, 0.5, 4.5, 4.5);
    hits.sort_unstable();
    assert_eq!(hits, vec![0, 1, 2]);
}

#[test]
fn scenario_filter_keeps_only_even_references() {
    let boxes = random_boxes(100, 50.0, 7);
    let tree = build(&boxes);
    let mut evens = tree.search_filtered(
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::INFINITY,
        |i| i % 2 == 0,
    );
    evens.sort_unstable();
    assert_eq!(evens, (0..100).step_by(2).collect::<Vec<_>>());
}

#[test]
fn scenario_grid_point_query_hits_the_right_leaf() {
    // 32x32 grid of unit cells -> N=1024, B=16 -> levels [1024, 64, 4, 1].
    let mut boxes = Vec::with_capacity(1024);
    for gy in 0..32i64 {
        for gx in 0..32i64 {
            let x = gx as f64;
            let y = gy as f64;
            boxes.push((x, y, x + 1.0, y + 1.0));
        }
    }
    let tree = build(&boxes);
    assert_eq!(tree.level_bounds().len(), 4);

    let hits = tree.search(0.0, 0.0, 0.0, 0.0);
    assert_eq!(hits, vec![0]);
}

#[test]
fn scenario_edge_touching_box_is_returned() {
    let mut builder = HilbertRTreeBuilder::new(1).unwrap();
    builder.add(1.0, 1.0, 2.0, 2.0).unwrap();
    let tree = builder.finish::<HilbertSort>().unwrap();
    assert_eq!(tree.search(2.0, 2.0, 3.0, 3.0), vec![0]);
}

#[test]
fn scenario_restore_from_bytes_matches_original_on_random_queries() {
    let boxes = random_boxes(500, 200.0, 11);
    let tree = build(&boxes);
    let bytes: Vec<u8> = cast_slice(&tree.into_inner()).to_vec();
    let restored = HilbertRTreeRef::<f64>::try_new(&bytes, 500, 16).unwrap();

    let original = build(&boxes);
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10 {
        let x = rng.gen_range(0.0..200.0);
        let y = rng.gen_range(0.0..200.0);
        let w = rng.gen_range(1.0..50.0);
        let h = rng.gen_range(1.0..50.0);

        let mut a = original.search(x, y, x + w, y + h);
        let mut b = restored.search(x, y, x + w, y + h);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}

#[test]
fn full_extent_query_returns_every_leaf_exactly_once() {
    let boxes = random_boxes(300, 100.0, 3);
    let tree = build(&boxes);
    let mut hits = tree.search(
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::INFINITY,
    );
    hits.sort_unstable();
    assert_eq!(hits, (0..300).collect::<Vec<_>>());
}

#[test]
fn internal_node_boxes_are_the_union_of_their_children() {
    let boxes = random_boxes(400, 60.0, 21);
    let tree = build(&boxes);
    let records = tree.records();
    let level_bounds = tree.level_bounds().to_vec();
    let node_size = tree.node_size();

    // level_bounds[k] is the slot offset marking the end of level k (leaves = level 0).
    for level in 1..level_bounds.len() {
        let level_start = level_bounds[level - 1];
        let level_end = level_bounds[level];
        let child_level_end = level_bounds[level - 1];

        let mut p = level_start;
        while p < level_end {
            let first_child = records[p] as usize;
            let group_end = (first_child + node_size * 5).min(child_level_end);

            let mut min_x = f64::INFINITY;
            let mut min_y = f64::INFINITY;
            let mut max_x = f64::NEG_INFINITY;
            let mut max_y = f64::NEG_INFINITY;
            let mut c = first_child;
            while c < group_end {
                min_x = min_x.min(records[c + 1]);
                min_y = min_y.min(records[c + 2]);
                max_x = max_x.max(records[c + 3]);
                max_y = max_y.max(records[c + 4]);
                c += 5;
            }

            assert_eq!(records[p + 1], min_x, "level {level} parent at {p} min_x");
            assert_eq!(records[p + 2], min_y, "level {level} parent at {p} min_y");
            assert_eq!(records[p + 3], max_x, "level {level} parent at {p} max_x");
            assert_eq!(records[p + 4], max_y, "level {level} parent at {p} max_y");

            p += 5;
        }
    }
}

#[test]
fn cross_validates_against_rstar_oracle() {
    let boxes = random_boxes(600, 150.0, 1234);
    let tree = build(&boxes);

    let rects: Vec<_> = boxes
        .iter()
        .enumerate()
        .map(|(idx, &(min_x, min_y, max_x, max_y))| {
            let aabb = AABB::from_corners((min_x, min_y), (max_x, max_y));
            GeomWithData::new(aabb.into(), idx)
        })
        .collect();
    let rstar_tree: RTree<GeomWithData<Rectangle<(f64, f64)>, usize>> = RTree::bulk_load(rects);

    let mut rng = StdRng::seed_from_u64(4242);
    for _ in 0..25 {
        let x = rng.gen_range(0.0..150.0);
        let y = rng.gen_range(0.0..150.0);
        let w = rng.gen_range(1.0..30.0);
        let h = rng.gen_range(1.0..30.0);

        let mut ours = tree.search(x, y, x + w, y + h);
        ours.sort_unstable();

        let aabb = AABB::from_corners((x, y), (x + w, y + h));
        let mut oracle: Vec<usize> = rstar_tree
            .locate_in_envelope_intersecting(&aabb)
            .map(|item| *item.data())
            .collect();
        oracle.sort_unstable();

        assert_eq!(ours, oracle);
    }
}

#[test]
fn error_paths_are_precondition_violations() {
    assert!(HilbertRTreeBuilder::<f64>::new(0).is_err());

    let mut builder = HilbertRTreeBuilder::new(1).unwrap();
    builder.add(0.0, 0.0, 1.0, 1.0).unwrap();
    assert!(builder.add(1.0, 1.0, 2.0, 2.0).is_err());

    let mut short = HilbertRTreeBuilder::new(2).unwrap();
    short.add(0.0, 0.0, 1.0, 1.0).unwrap();
    assert!(short.finish::<HilbertSort>().is_err());
}
