//! Integration tests: structural properties of the merge on larger networks.

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use linemerge::{Geometry, LineMerger, LineString, MergeConfig, merge_lines};

type Segment = ((i64, i64), (i64, i64));

/// Unordered segment key on an integer lattice.
fn segment_key(a: (f64, f64), b: (f64, f64)) -> Segment {
    let a = (a.0 as i64, a.1 as i64);
    let b = (b.0 as i64, b.1 as i64);
    if a <= b { (a, b) } else { (b, a) }
}

fn segments_of(lines: &[LineString]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = lines
        .iter()
        .flat_map(|line| {
            line.0
                .windows(2)
                .map(|w| segment_key((w[0].x, w[0].y), (w[1].x, w[1].y)))
                .collect::<Vec<_>>()
        })
        .collect();
    segments.sort_unstable();
    segments
}

/// Unit segments of a `size` x `size` lattice, row edges then column edges.
fn grid(size: i32) -> Vec<LineString> {
    let mut lines = Vec::new();
    for y in 0..=size {
        for x in 0..size {
            let (x, y) = (f64::from(x), f64::from(y));
            lines.push(LineString::from(vec![(x, y), (x + 1.0, y)]));
        }
    }
    for x in 0..=size {
        for y in 0..size {
            let (x, y) = (f64::from(x), f64::from(y));
            lines.push(LineString::from(vec![(x, y), (x, y + 1.0)]));
        }
    }
    lines
}

/// Deterministic pseudo-random walk segments on a small lattice.
fn scribble(count: usize, seed: u64) -> Vec<LineString> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as i32
    };
    let (mut x, mut y) = (0_i32, 0_i32);
    let mut lines = Vec::with_capacity(count);
    while lines.len() < count {
        let (dx, dy) = match next().rem_euclid(4) {
            0 => (1, 0),
            1 => (-1, 0),
            2 => (0, 1),
            _ => (0, -1),
        };
        let (nx, ny) = ((x + dx).clamp(-4, 4), (y + dy).clamp(-4, 4));
        if (nx, ny) != (x, y) {
            // Alternate stored direction so merging must reverse some lines.
            let (a, b) = if next() % 2 == 0 {
                ((x, y), (nx, ny))
            } else {
                ((nx, ny), (x, y))
            };
            lines.push(LineString::from(vec![
                (f64::from(a.0), f64::from(a.1)),
                (f64::from(b.0), f64::from(b.1)),
            ]));
        }
        (x, y) = (nx, ny);
    }
    lines
}

fn merge(lines: &[LineString], config: MergeConfig) -> Vec<LineString> {
    let geometries: Vec<Geometry> = lines.iter().cloned().map(Geometry::LineString).collect();
    merge_lines(&geometries, config).unwrap()
}

#[test]
fn grid_conserves_every_segment() {
    let input = grid(5);
    let merged = merge(&input, MergeConfig::default());
    assert_eq!(segments_of(&merged), segments_of(&input));
}

#[test]
fn grid_splits_at_every_branch_node() {
    // Interior and border nodes have degree 3 or 4; only the corners
    // pass through, so every output line is a single segment except the
    // four that wrap a corner.
    let input = grid(3);
    let merged = merge(&input, MergeConfig::default());
    assert_eq!(merged.len(), input.len() - 4);
    assert_eq!(merged.iter().filter(|l| l.0.len() == 3).count(), 4);
}

#[test]
fn scribble_conserves_every_segment() {
    for seed in [1, 7, 42, 1234] {
        let input = scribble(200, seed);
        for config in [MergeConfig::default(), MergeConfig::directed()] {
            let merged = merge(&input, config);
            assert_eq!(
                segments_of(&merged),
                segments_of(&input),
                "seed {seed}, config {config:?}"
            );
        }
    }
}

#[test]
fn directed_output_preserves_input_orientation() {
    let input = scribble(150, 99);
    let mut oriented: Vec<Segment> = input
        .iter()
        .map(|l| {
            let (a, b) = (l.0[0], l.0[1]);
            ((a.x as i64, a.y as i64), (b.x as i64, b.y as i64))
        })
        .collect();
    oriented.sort_unstable();

    let merged = merge(&input, MergeConfig::directed());
    let mut walked: Vec<Segment> = merged
        .iter()
        .flat_map(|line| {
            line.0
                .windows(2)
                .map(|w| ((w[0].x as i64, w[0].y as i64), (w[1].x as i64, w[1].y as i64)))
                .collect::<Vec<_>>()
        })
        .collect();
    walked.sort_unstable();
    assert_eq!(walked, oriented);
}

#[test]
fn directed_never_yields_more_lines_than_input() {
    let input = scribble(120, 5);
    let undirected = merge(&input, MergeConfig::default());
    let directed = merge(&input, MergeConfig::directed());
    assert!(undirected.len() <= directed.len());
    assert!(directed.len() <= input.len());
}

#[test]
fn repeated_reads_are_identical() {
    let input = scribble(80, 3);
    let mut merger = LineMerger::new();
    for line in &input {
        merger.add_line_string(line).unwrap();
    }
    let first = merger.merged_lines().unwrap().to_vec();
    for _ in 0..3 {
        merger.merge().unwrap();
        assert_eq!(merger.merged_lines().unwrap(), first.as_slice());
    }
}

#[test]
fn merge_is_deterministic_across_instances() {
    let input = scribble(100, 11);
    assert_eq!(
        merge(&input, MergeConfig::default()),
        merge(&input, MergeConfig::default())
    );
}

#[test]
fn nested_rings_are_each_closed() {
    let mut input = Vec::new();
    for size in 1..=3 {
        let s = f64::from(size);
        input.push(LineString::from(vec![(-s, -s), (s, -s)]));
        input.push(LineString::from(vec![(s, -s), (s, s)]));
        input.push(LineString::from(vec![(s, s), (-s, s)]));
        input.push(LineString::from(vec![(-s, s), (-s, -s)]));
    }
    let merged = merge(&input, MergeConfig::default());
    assert_eq!(merged.len(), 3);
    assert!(merged.iter().all(LineString::is_closed));
    assert!(merged.iter().all(|l| l.0.len() == 5));
}
