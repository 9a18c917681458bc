use crocus::{
    HistogramCollector, NumericColumnSegment, NumericDocValues, NumericRangeScanner, SkipIndex,
    SkipIndexBuilder, SkipIndexConfig, SkipInterval, TotalHitCountCollector,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn linear_scan_count(values: &NumericDocValues, query_min: i64, query_max: i64) -> u64 {
    let mut matches = 0;
    for doc in 0..values.max_doc() {
        if let Some(value) = values.get(doc) {
            if value >= query_min && value <= query_max {
                matches += 1;
            }
        }
    }
    matches
}

fn random_column(rng: &mut StdRng, max_doc: usize, value_range: i64, density: f64) -> NumericDocValues {
    let slots = (0..max_doc)
        .map(|_| {
            if rng.random_range(0.0..1.0) < density {
                Some(rng.random_range(-value_range..=value_range))
            } else {
                None
            }
        })
        .collect();
    NumericDocValues::new(slots)
}

#[test]
fn test_skip_scan_matches_linear_scan_randomized() {
    let mut rng = StdRng::seed_from_u64(42);

    for round in 0..50 {
        let max_doc = rng.random_range(1..400);
        let values = random_column(&mut rng, max_doc, 50, 0.8);

        let config = SkipIndexConfig {
            interval_size: rng.random_range(1..64),
            fanout: rng.random_range(2..8),
        };
        let index = SkipIndexBuilder::new(config).build(&values).unwrap();
        let scanner = NumericRangeScanner::new(&index, &values).unwrap();

        for _ in 0..20 {
            let a = rng.random_range(-60..=60);
            let b = rng.random_range(-60..=60);
            let (query_min, query_max) = (a.min(b), a.max(b));

            assert_eq!(
                scanner.count(query_min, query_max).unwrap(),
                linear_scan_count(&values, query_min, query_max),
                "round {round}, bounds [{query_min}, {query_max}]"
            );
        }
    }
}

#[test]
fn test_skip_scan_matches_linear_scan_for_random_partitions() {
    let mut rng = StdRng::seed_from_u64(7);

    for round in 0..50 {
        let max_doc = rng.random_range(1..300);
        let values = random_column(&mut rng, max_doc, 30, 0.7);

        // Cut the doc range at random points and summarize each piece
        // honestly; soundness must not depend on the partition chosen.
        let mut intervals = Vec::new();
        let mut start = 0u64;
        while start < values.max_doc() {
            let remaining = values.max_doc() - start;
            let len = rng.random_range(1..=remaining);
            let end = start + len - 1;

            let mut min_value = i64::MAX;
            let mut max_value = i64::MIN;
            let mut doc_count = 0;
            for doc in start..=end {
                if let Some(value) = values.get(doc) {
                    min_value = min_value.min(value);
                    max_value = max_value.max(value);
                    doc_count += 1;
                }
            }
            intervals.push(SkipInterval {
                min_doc_id: start,
                max_doc_id: end,
                min_value,
                max_value,
                doc_count,
            });
            start = end + 1;
        }

        let index = SkipIndex::from_levels(vec![intervals], values.max_doc()).unwrap();
        let scanner = NumericRangeScanner::new(&index, &values).unwrap();

        for _ in 0..20 {
            let a = rng.random_range(-40..=40);
            let b = rng.random_range(-40..=40);
            let (query_min, query_max) = (a.min(b), a.max(b));

            assert_eq!(
                scanner.count(query_min, query_max).unwrap(),
                linear_scan_count(&values, query_min, query_max),
                "round {round}, bounds [{query_min}, {query_max}]"
            );
        }
    }
}

#[test]
fn test_constant_run_longer_than_chunk_stays_sound() {
    // A sorted year column: long constant runs, the shape skip indexes
    // are built for.
    let mut slots: Vec<Option<i64>> = Vec::new();
    for year in 2019..=2026i64 {
        let run = 1024 + (year as usize % 3) * 512;
        slots.extend(std::iter::repeat_n(Some(year), run));
    }
    let values = NumericDocValues::new(slots);

    let config = SkipIndexConfig {
        interval_size: 256,
        fanout: 4,
    };
    let index = SkipIndexBuilder::new(config).build(&values).unwrap();

    // Each year collapses into one interval well past the chunk size.
    let level0 = index.level_intervals(0).unwrap();
    assert_eq!(level0.len(), 8);
    assert!(level0.iter().all(|interval| interval.is_constant()));
    assert!(level0.iter().any(|interval| {
        interval.max_doc_id - interval.min_doc_id + 1 > 256
    }));

    let scanner = NumericRangeScanner::new(&index, &values).unwrap();
    for (lo, hi) in [(2019, 2026), (2024, i64::MAX), (2020, 2021), (1990, 2000)] {
        assert_eq!(
            scanner.count(lo, hi).unwrap(),
            linear_scan_count(&values, lo, hi),
            "bounds [{lo}, {hi}]"
        );
    }
}

#[test]
fn test_multi_level_descent_matches_single_level() {
    let mut rng = StdRng::seed_from_u64(11);
    let values = random_column(&mut rng, 2048, 100, 0.9);

    let deep = SkipIndexBuilder::new(SkipIndexConfig {
        interval_size: 8,
        fanout: 2,
    })
    .build(&values)
    .unwrap();
    assert!(deep.num_levels() > 3);

    let flat = SkipIndexBuilder::new(SkipIndexConfig {
        interval_size: 8,
        fanout: usize::MAX,
    })
    .build(&values)
    .unwrap();
    assert_eq!(flat.num_levels(), 1);

    let deep_scanner = NumericRangeScanner::new(&deep, &values).unwrap();
    let flat_scanner = NumericRangeScanner::new(&flat, &values).unwrap();

    for _ in 0..30 {
        let a = rng.random_range(-120..=120);
        let b = rng.random_range(-120..=120);
        let (query_min, query_max) = (a.min(b), a.max(b));

        let expected = linear_scan_count(&values, query_min, query_max);
        assert_eq!(deep_scanner.count(query_min, query_max).unwrap(), expected);
        assert_eq!(flat_scanner.count(query_min, query_max).unwrap(), expected);
    }
}

#[test]
fn test_counting_and_value_collectors_agree() {
    let mut rng = StdRng::seed_from_u64(23);
    let values = random_column(&mut rng, 500, 20, 0.75);

    let segment =
        NumericColumnSegment::build(values.clone(), SkipIndexConfig {
            interval_size: 16,
            fanout: 4,
        })
        .unwrap();

    for (lo, hi) in [(-20, 20), (-5, 5), (0, 0), (10, 19)] {
        let mut counting = TotalHitCountCollector::new();
        let counted = segment.search(lo, hi, &mut counting).unwrap();
        assert_eq!(counted, counting.total_hits());

        let mut histogram = HistogramCollector::new();
        let collected = segment.search(lo, hi, &mut histogram).unwrap();

        // The bulk path and the per-doc path must agree on totals.
        assert_eq!(counted, collected);
        assert_eq!(histogram.total_hits(), counted);

        // And the histogram must reflect actual stored values, even for
        // docs that arrived through bulk-accepted intervals.
        for (value, tally) in histogram.histogram() {
            assert!(*value >= lo && *value <= hi);
            let stored = (0..values.max_doc())
                .filter(|&doc| values.get(doc) == Some(*value))
                .count() as u64;
            assert_eq!(*tally, stored, "value {value}");
        }
    }
}

#[test]
fn test_one_collector_accumulates_across_segments() {
    let seg1 = NumericColumnSegment::build(
        NumericDocValues::new(vec![Some(1), Some(5)]),
        SkipIndexConfig::default(),
    )
    .unwrap();
    let seg2 = NumericColumnSegment::build(
        NumericDocValues::new(vec![Some(3), None, Some(9)]),
        SkipIndexConfig::default(),
    )
    .unwrap();

    // One collector per query; each segment gets its own leaf.
    let mut collector = TotalHitCountCollector::new();
    seg1.search(0, 6, &mut collector).unwrap();
    seg2.search(0, 6, &mut collector).unwrap();
    assert_eq!(collector.total_hits(), 3);
}

#[test]
fn test_unbounded_query_counts_only_present_docs() {
    let values = NumericDocValues::new(vec![Some(3), None, Some(-8), None, Some(0)]);
    let segment = NumericColumnSegment::build(values, SkipIndexConfig::default()).unwrap();
    assert_eq!(segment.count(i64::MIN, i64::MAX).unwrap(), 3);
}
