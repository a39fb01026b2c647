// Unit tests for keep-segment planning

use super::*;

fn iv(start_ms: u64, end_ms: u64) -> Interval {
    Interval::new(start_ms, end_ms).unwrap()
}

fn total(ms: u64) -> MediaDuration {
    MediaDuration::from_ms(ms)
}

fn plan(total_ms: u64, silences: &[Interval], padding_ms: u64) -> Vec<Interval> {
    KeepSegmentPlanner::plan(total(total_ms), silences, padding_ms).unwrap()
}

#[test]
fn test_clip_to_duration() {
    let silences = [iv(1000, 2000), iv(9500, 10_040), iv(10_010, 10_900)];
    assert_eq!(
        KeepSegmentPlanner::clip_to_duration(total(10_000), &silences),
        vec![iv(1000, 2000), iv(9500, 10_000)]
    );
}

/// Small deterministic generator so property checks stay reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_silences(rng: &mut Lcg, total_ms: u64) -> Vec<Interval> {
    let mut silences = Vec::new();
    let mut pos = rng.next(500);
    while pos < total_ms {
        let end = (pos + 1 + rng.next(2000)).min(total_ms);
        silences.push(iv(pos, end));
        // Steps shorter than the silence produce overlaps on purpose
        pos += rng.next(3000);
    }
    silences
}

#[test]
fn test_worked_example() {
    let keep = plan(10_000, &[iv(2000, 3000), iv(6000, 6500)], 100);
    assert_eq!(keep, vec![iv(0, 2100), iv(2900, 6100), iv(6400, 10_000)]);
}

#[test]
fn test_no_silence_keeps_everything() {
    assert_eq!(plan(5000, &[], 100), vec![iv(0, 5000)]);
    assert_eq!(plan(1, &[], 0), vec![iv(0, 1)]);
}

#[test]
fn test_leading_silence_emits_no_leading_segment() {
    let keep = plan(5000, &[iv(0, 1000)], 100);
    assert_eq!(keep, vec![iv(900, 5000)]);

    let keep = plan(5000, &[iv(0, 1000)], 0);
    assert_eq!(keep, vec![iv(1000, 5000)]);
}

#[test]
fn test_silence_shorter_than_padding_from_start_is_ignored() {
    // Starts within padding of the cursor: nothing worth keeping before it
    let keep = plan(5000, &[iv(80, 1000)], 100);
    assert_eq!(keep, vec![iv(900, 5000)]);
}

#[test]
fn test_trailing_silence() {
    assert_eq!(plan(5000, &[iv(4000, 5000)], 0), vec![iv(0, 4000)]);
    // Padding backs the cursor off the end, leaving a short tail
    assert_eq!(
        plan(5000, &[iv(4000, 5000)], 100),
        vec![iv(0, 4100), iv(4900, 5000)]
    );
}

#[test]
fn test_padding_is_clamped_to_media_end() {
    let keep = plan(5000, &[iv(4950, 5000)], 100);
    assert_eq!(keep, vec![iv(0, 5000)]);
}

#[test]
fn test_padding_longer_than_silence_cancels_the_cut() {
    let keep = plan(10_000, &[iv(5000, 5100)], 200);
    assert_eq!(keep, vec![iv(0, 10_000)]);
}

#[test]
fn test_overlapping_silences() {
    let keep = plan(6000, &[iv(1000, 3000), iv(2500, 4000)], 100);
    assert_eq!(keep, vec![iv(0, 1100), iv(3900, 6000)]);
}

#[test]
fn test_nested_silence_does_not_move_cursor_backward() {
    let keep = plan(10_000, &[iv(1000, 5000), iv(1200, 1300)], 100);
    assert_eq!(keep, vec![iv(0, 1100), iv(4900, 10_000)]);
}

#[test]
fn test_adjacent_silences() {
    let keep = plan(6000, &[iv(1000, 2000), iv(2000, 3000)], 0);
    assert_eq!(keep, vec![iv(0, 1000), iv(3000, 6000)]);
}

#[test]
fn test_merge_tolerance_boundary() {
    // 49ms gap merges, 50ms gap survives
    assert_eq!(plan(3000, &[iv(1000, 1049)], 0), vec![iv(0, 3000)]);
    assert_eq!(
        plan(3000, &[iv(1000, 1050)], 0),
        vec![iv(0, 1000), iv(1050, 3000)]
    );
}

#[test]
fn test_fully_silent_media() {
    assert_eq!(plan(5000, &[iv(0, 5000)], 0), vec![]);
    assert_eq!(plan(5000, &[iv(0, 5000)], 100), vec![iv(4900, 5000)]);
}

#[test]
fn test_merge_close_extends_to_furthest_end() {
    let merged = KeepSegmentPlanner::merge_close(vec![iv(0, 500), iv(100, 300), iv(520, 900)]);
    assert_eq!(merged, vec![iv(0, 900)]);
}

#[test]
fn test_rejects_zero_duration() {
    let err = KeepSegmentPlanner::plan(total(0), &[], 100).unwrap_err();
    assert!(matches!(err, DomainError::InvalidDuration(_)));
}

#[test]
fn test_rejects_silence_past_end() {
    let err = KeepSegmentPlanner::plan(total(5000), &[iv(4000, 5001)], 100).unwrap_err();
    assert!(matches!(err, DomainError::InvalidInterval(_)));
}

#[test]
fn test_rejects_reversed_silence() {
    let reversed = Interval {
        start_ms: 3000,
        end_ms: 2000,
    };
    let err = KeepSegmentPlanner::plan(total(5000), &[reversed], 100).unwrap_err();
    assert!(matches!(err, DomainError::InvalidInterval(_)));
}

#[test]
fn test_rejects_unsorted_silences() {
    let err =
        KeepSegmentPlanner::plan(total(9000), &[iv(5000, 6000), iv(1000, 2000)], 100).unwrap_err();
    assert!(matches!(err, DomainError::UnsortedIntervals(_)));
}

#[test]
fn test_duration_accounting_identity() {
    let total_ms = 60_000;
    let padding_ms = 150;
    let silences: Vec<Interval> = (1..11)
        .map(|i| {
            let start = i * 5000;
            let len = 400 + (i * 137) % 900;
            iv(start, start + len)
        })
        .collect();

    let keep = plan(total_ms, &silences, padding_ms);
    let kept: u64 = keep.iter().map(Interval::duration_ms).sum();
    let silent: u64 = silences.iter().map(Interval::duration_ms).sum();
    let overlap = 2 * padding_ms * silences.len() as u64;

    assert_eq!(keep.len(), silences.len() + 1);
    assert_eq!(kept + silent, total_ms + overlap);
}

#[test]
fn test_planner_properties_hold_for_generated_inputs() {
    let mut rng = Lcg(0x5eed);
    for _ in 0..200 {
        let total_ms = 1 + rng.next(20_000);
        let padding_ms = rng.next(400);
        let silences = random_silences(&mut rng, total_ms);
        let keep = plan(total_ms, &silences, padding_ms);

        // Well-formed, in bounds, ordered, and separated by at least the tolerance
        for interval in &keep {
            assert!(interval.start_ms < interval.end_ms, "{:?}", interval);
            assert!(interval.end_ms <= total_ms);
        }
        for pair in keep.windows(2) {
            assert!(pair[0].gap_to(&pair[1]) >= MERGE_TOLERANCE_MS, "{:?}", pair);
        }

        // Every non-silent millisecond is kept, except content closer to the
        // start than the padding when a silence follows it
        for t in padding_ms..total_ms {
            let silent = silences.iter().any(|s| s.start_ms <= t && t < s.end_ms);
            if !silent {
                assert!(
                    keep.iter().any(|k| k.start_ms <= t && t < k.end_ms),
                    "ms {} dropped: total={} padding={} silences={:?} keep={:?}",
                    t,
                    total_ms,
                    padding_ms,
                    silences,
                    keep
                );
            }
        }
    }
}
