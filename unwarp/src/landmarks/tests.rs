//! Tests for landmark sets, pairing and the landmark file.

use glam::IVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::file::{format_landmarks, parse_landmarks, HEADER};
use super::*;
use crate::error::Error;
use crate::geometry::ImageSize;
use common::test_utils::test_output_path;

const SIZE: ImageSize = ImageSize::new(256, 256);

fn p(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}

#[test]
fn add_point_makes_it_current() {
    let mut set = LandmarkSet::new(SIZE);
    assert_eq!(set.current_index(), None);
    assert_eq!(set.add_point(p(1, 2)), 0);
    assert_eq!(set.add_point(p(3, 4)), 1);
    assert_eq!(set.current_index(), Some(1));
    assert_eq!(set.current().unwrap().position, p(3, 4));
}

#[test]
fn add_point_does_not_deduplicate() {
    let mut set = LandmarkSet::new(SIZE);
    set.add_point(p(5, 5));
    set.add_point(p(5, 5));
    assert_eq!(set.len(), 2);
}

#[test]
fn hue_advances_by_golden_angle() {
    let mut set = LandmarkSet::new(SIZE);
    set.add_point(p(0, 0));
    set.add_point(p(1, 1));
    let h0 = set.get(0).unwrap().color.hue;
    let h1 = set.get(1).unwrap().color.hue;
    assert!(((h1 - h0).rem_euclid(1.0) - GOLDEN_ANGLE).abs() < 1e-5);
}

#[test]
fn remove_point_resets_current_to_last() {
    let mut set = LandmarkSet::new(SIZE);
    for i in 0..4 {
        set.add_point(p(i, i));
    }
    set.set_current(Some(1));
    let removed = set.remove_current().unwrap();
    assert_eq!(removed.position, p(1, 1));
    assert_eq!(set.len(), 3);
    assert_eq!(set.current_index(), Some(2));

    set.remove_point(0);
    set.remove_point(0);
    set.remove_point(0);
    assert!(set.is_empty());
    assert_eq!(set.current_index(), None);
}

#[test]
fn remove_on_empty_or_out_of_range_is_noop() {
    let mut set = LandmarkSet::new(SIZE);
    assert!(set.remove_current().is_none());
    assert!(set.remove_point(3).is_none());

    set.add_point(p(1, 1));
    assert!(set.remove_point(7).is_none());
    assert_eq!(set.len(), 1);
}

#[test]
fn invalid_removal_keeps_current_index() {
    let mut set = LandmarkSet::new(SIZE);
    set.add_point(p(1, 1));
    set.add_point(p(2, 2));
    set.add_point(p(3, 3));

    set.set_current(Some(0));
    assert!(set.remove_point(7).is_none());
    assert_eq!(set.current_index(), Some(0));

    set.set_current(None);
    assert!(set.remove_current().is_none());
    assert_eq!(set.current_index(), None);
    assert_eq!(set.len(), 3);
}

#[test]
fn invalid_pair_removal_keeps_both_current_indices() {
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(1, 1), p(1, 1));
    pairs.push_pair(p(5, 5), p(5, 5));
    pairs.select_closest(Side::Source, p(0, 0));

    assert!(pairs.remove(9).is_none());
    assert_eq!(pairs.source().current_index(), Some(0));
    assert_eq!(pairs.target().current_index(), Some(0));
    assert_eq!(pairs.len(), 2);
}

#[test]
fn move_point_clamps_to_image() {
    let mut set = LandmarkSet::new(ImageSize::new(100, 50));
    set.add_point(p(10, 10));
    assert!(set.move_current(p(150, -5)));
    assert_eq!(set.current().unwrap().position, p(99, 0));
}

#[test]
fn move_without_current_is_noop() {
    let mut set = LandmarkSet::new(SIZE);
    assert!(!set.move_current(p(3, 3)));
    assert!(!set.nudge_current(p(1, 0)));
}

#[test]
fn nudge_clamps_at_border() {
    let mut set = LandmarkSet::new(ImageSize::new(10, 10));
    set.add_point(p(9, 0));
    set.nudge_current(p(1, -1));
    assert_eq!(set.current().unwrap().position, p(9, 0));
    set.nudge_current(p(-2, 3));
    assert_eq!(set.current().unwrap().position, p(7, 3));
}

#[test]
fn next_point_wraps() {
    let mut set = LandmarkSet::new(SIZE);
    set.next_point();
    assert_eq!(set.current_index(), None);

    set.add_point(p(0, 0));
    set.add_point(p(1, 0));
    set.add_point(p(2, 0));
    set.next_point();
    assert_eq!(set.current_index(), Some(0));
    set.next_point();
    assert_eq!(set.current_index(), Some(1));
}

#[test]
fn find_closest_minimizes_distance() {
    let mut set = LandmarkSet::new(SIZE);
    set.add_point(p(0, 0));
    set.add_point(p(100, 100));
    set.add_point(p(50, 40));
    assert_eq!(set.find_closest(p(48, 45)), Some(2));
    assert_eq!(set.find_closest(p(99, 120)), Some(1));
}

#[test]
fn find_closest_tie_picks_lowest_index() {
    let mut set = LandmarkSet::new(SIZE);
    set.add_point(p(10, 20));
    set.add_point(p(30, 20));
    assert_eq!(set.current_index(), Some(1));
    assert_eq!(set.find_closest(p(20, 20)), Some(0));
}

#[test]
fn find_closest_on_empty_keeps_current() {
    let set = LandmarkSet::new(SIZE);
    assert_eq!(set.find_closest(p(1, 1)), None);
}

#[test]
fn linked_add_rescales_into_paired_image() {
    let mut main = LandmarkSet::new(ImageSize::new(200, 100));
    let mut paired = LandmarkSet::new(ImageSize::new(100, 300));
    add_linked_point(&mut main, &mut paired, p(50, 10));
    assert_eq!(main.get(0).unwrap().position, p(50, 10));
    assert_eq!(paired.get(0).unwrap().position, p(25, 30));
}

#[test]
fn paired_sets_stay_same_length() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..300 {
        let mut pairs = LandmarkPairs::new(SIZE, ImageSize::new(128, 96));
        let steps = rng.random_range(1..40);
        for _ in 0..steps {
            let side = if rng.random_bool(0.5) {
                Side::Source
            } else {
                Side::Target
            };
            match rng.random_range(0..5) {
                0 | 1 => {
                    let at = p(rng.random_range(0..256), rng.random_range(0..256));
                    pairs.add(side, at);
                }
                2 => {
                    pairs.remove_current(side);
                }
                3 => {
                    let idx = rng.random_range(0..pairs.len() + 2);
                    pairs.remove(idx);
                }
                _ => {
                    let at = p(rng.random_range(0..256), rng.random_range(0..256));
                    pairs.remove_closest(side, at);
                }
            }
            assert_eq!(pairs.source().len(), pairs.target().len());
            assert_eq!(
                pairs.source().current_index(),
                pairs.target().current_index()
            );
        }
        pairs.remove_all();
        assert!(pairs.is_empty());
    }
}

#[test]
fn removing_first_pair_mirrors_onto_target() {
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(11, 11), p(11, 11));
    pairs.push_pair(p(200, 6), p(185, 15));

    pairs.remove(0);

    assert_eq!(pairs.source().len(), 1);
    assert_eq!(pairs.target().len(), 1);
    let remaining: Vec<_> = pairs.iter_pairs().collect();
    assert_eq!(remaining, vec![(p(200, 6), p(185, 15))]);
}

#[test]
fn linked_free_functions_keep_sets_aligned() {
    let mut main = LandmarkSet::new(SIZE);
    let mut paired = LandmarkSet::new(ImageSize::new(128, 128));
    add_linked_point(&mut main, &mut paired, p(10, 20));
    add_linked_point(&mut main, &mut paired, p(100, 40));

    next_linked(&mut main, &mut paired);
    assert_eq!(main.current_index(), Some(0));
    assert_eq!(paired.current_index(), Some(0));

    select_linked(&mut main, &mut paired, Some(7));
    assert_eq!(main.current_index(), None);
    assert_eq!(paired.current_index(), None);
    assert!(remove_current_linked(&mut main, &mut paired).is_none());

    select_linked(&mut main, &mut paired, Some(1));
    let (a, b) = remove_current_linked(&mut main, &mut paired).unwrap();
    assert_eq!((a.position, b.position), (p(100, 40), p(50, 20)));
    assert_eq!(main.points().len(), 1);
    assert_eq!(paired.colors().count(), 1);
}

#[test]
fn select_closest_mirrors_index() {
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(0, 0), p(100, 100));
    pairs.push_pair(p(50, 50), p(0, 0));
    assert_eq!(pairs.select_closest(Side::Target, p(90, 90)), Some(0));
    assert_eq!(pairs.source().current_index(), Some(0));
    assert_eq!(pairs.target().current_index(), Some(0));
}

#[test]
fn replace_with_mismatched_counts_keeps_state() {
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(1, 1), p(2, 2));
    let err = pairs.replace(&[p(0, 0), p(1, 1)], &[p(0, 0)]).unwrap_err();
    assert!(matches!(
        err,
        Error::CountMismatch {
            source_count: 2,
            target_count: 1
        }
    ));
    assert_eq!(pairs.len(), 1);
}

#[test]
fn swap_exchanges_roles() {
    let mut pairs = LandmarkPairs::new(ImageSize::new(10, 10), ImageSize::new(20, 20));
    pairs.push_pair(p(1, 2), p(3, 4));
    pairs.swap();
    assert_eq!(pairs.source().size(), ImageSize::new(20, 20));
    assert_eq!(pairs.iter_pairs().next(), Some((p(3, 4), p(1, 2))));
}

#[test]
fn format_uses_fixed_width_columns() {
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(11, 11), p(11, 11));
    pairs.push_pair(p(200, 6), p(185, 15));
    let text = format_landmarks(&pairs);
    let expected = format!(
        "{HEADER}\n    0\t     11\t     11\t     11\t     11\n    1\t    200\t      6\t    185\t     15\n"
    );
    assert_eq!(text, expected);
}

#[test]
fn parse_reads_rows_in_file_order() -> anyhow::Result<()> {
    let text = format!("{HEADER}\r\n  0\t5\t6\t7\t8\r\n\n  1\t-1\t2\t3\t4\n");
    let rows = parse_landmarks(&text)?;
    assert_eq!(rows.source, vec![p(5, 6), p(-1, 2)]);
    assert_eq!(rows.target, vec![p(7, 8), p(3, 4)]);
    Ok(())
}

#[test]
fn parse_errors_report_line() {
    assert!(matches!(
        parse_landmarks("index\txs\tys\txt\tyt\n"),
        Err(Error::MissingHeader { line: 1 })
    ));
    assert!(matches!(parse_landmarks(""), Err(Error::MissingHeader { line: 1 })));

    let text = format!("{HEADER}\n0\t1\t2\t3\t4\n1\t2\t3\n");
    assert!(matches!(
        parse_landmarks(&text),
        Err(Error::FieldCount { line: 3, found: 3 })
    ));

    let text = format!("{HEADER}\n0\t1\t2\tx\t4\n");
    match parse_landmarks(&text) {
        Err(Error::InvalidNumber { line, field, value }) => {
            assert_eq!(line, 2);
            assert_eq!(field, "xTarget");
            assert_eq!(value, "x");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn file_round_trip_preserves_order() -> anyhow::Result<()> {
    let path = test_output_path("landmarks_round_trip.txt");
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(6, 6), p(6, 6));
    pairs.push_pair(p(202, 7), p(185, 14));
    pairs.push_pair(p(196, 210), p(154, 200));
    pairs.save_file(&path)?;

    let mut loaded = LandmarkPairs::new(SIZE, SIZE);
    loaded.push_pair(p(1, 1), p(1, 1));
    loaded.load_file(&path)?;
    assert_eq!(
        loaded.iter_pairs().collect::<Vec<_>>(),
        pairs.iter_pairs().collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn failed_load_keeps_landmarks() {
    let path = test_output_path("landmarks_bad_row.txt");
    std::fs::write(&path, format!("{HEADER}\n0\t1\t2\n")).unwrap();
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    pairs.push_pair(p(9, 9), p(8, 8));
    assert!(pairs.load_file(&path).is_err());
    assert_eq!(pairs.len(), 1);
}

#[test]
fn missing_file_is_read_error() {
    let mut pairs = LandmarkPairs::new(SIZE, SIZE);
    let err = pairs
        .load_file(std::path::Path::new("does/not/exist.txt"))
        .unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}
