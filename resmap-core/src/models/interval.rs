use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::RegionError;

///
/// A closed, inclusive run of residue positions `[start, end]`.
///
/// Interval collections produced by [merge_intervals] are pairwise disjoint
/// and non-adjacent (gap > 1 between any two members).
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResidueInterval {
    pub start: u32,
    pub end: u32,
}

impl ResidueInterval {
    pub fn new(start: u32, end: u32) -> Result<Self, RegionError> {
        if start > end {
            return Err(RegionError::ReversedBounds { start, end });
        }
        Ok(ResidueInterval { start, end })
    }

    /// Inclusive width of the interval: `end - start + 1`.
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, pos: u32) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether two intervals overlap or abut (gap of exactly 1), i.e.
    /// whether they collapse into one interval under merging.
    pub fn touches(&self, other: &ResidueInterval) -> bool {
        self.start <= other.end.saturating_add(1) && other.start <= self.end.saturating_add(1)
    }

    /// The smallest interval covering both inputs.
    pub fn merge(&self, other: &ResidueInterval) -> ResidueInterval {
        ResidueInterval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Every residue position covered by the interval, in order.
    pub fn positions(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl Display for ResidueInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for ResidueInterval {
    type Err = RegionError;

    ///
    /// Parse a `"start-end"` region token. Missing `-`, non-numeric bounds
    /// and reversed bounds are all fatal.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| RegionError::Malformed(s.to_string()))?;
        let start = start
            .trim()
            .parse()
            .map_err(|_| RegionError::Malformed(s.to_string()))?;
        let end = end
            .trim()
            .parse()
            .map_err(|_| RegionError::Malformed(s.to_string()))?;
        ResidueInterval::new(start, end)
    }
}

///
/// Collapse a set of residue positions into the sorted list of maximal
/// contiguous closed intervals.
///
/// Duplicates and disorder in the input are allowed.
///
/// ```
/// use resmap_core::models::interval::ranges;
///
/// let intervals = ranges(&[1, 2, 3, 4, 7, 8, 9, 10]);
/// assert_eq!(intervals.iter().map(|iv| iv.to_string()).collect::<Vec<_>>(), ["1-4", "7-10"]);
/// ```
///
pub fn ranges(positions: &[u32]) -> Vec<ResidueInterval> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut intervals = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return intervals;
    };

    let (mut start, mut end) = (first, first);
    for pos in iter {
        // A boundary falls wherever consecutive sorted positions differ by
        // more than 1.
        if pos > end + 1 {
            intervals.push(ResidueInterval { start, end });
            start = pos;
        }
        end = pos;
    }
    intervals.push(ResidueInterval { start, end });

    intervals
}

///
/// Merge a list of closed intervals into the minimal disjoint cover,
/// combining every pair that overlaps or abuts (gap of exactly 1).
///
/// Sort once, then fold left-to-right: the running interval absorbs each
/// next interval that touches it. Transitive chains collapse in one sweep
/// and the result is independent of input order, ascending by start.
///
pub fn merge_intervals(intervals: &[ResidueInterval]) -> Vec<ResidueInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<ResidueInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if last.touches(&interval) => *last = last.merge(&interval),
            _ => merged.push(interval),
        }
    }

    merged
}

///
/// Parse a comma-separated `"start-end,start-end,…"` region string, merge
/// the intervals, and keep only those at least `min_len` residues wide.
///
/// # Arguments:
/// - `regions`: the raw region-list string, e.g. `"1-2,5-10,8-25"`
/// - `min_len`: inclusive minimum width for a merged interval to survive
///
pub fn consolidate_regions(
    regions: &str,
    min_len: u32,
) -> Result<Vec<ResidueInterval>, RegionError> {
    let parsed = regions
        .split(',')
        .map(str::parse)
        .collect::<Result<Vec<ResidueInterval>, _>>()?;

    Ok(merge_intervals(&parsed)
        .into_iter()
        .filter(|interval| interval.width() >= min_len)
        .collect())
}

///
/// Expand a comma-separated `"start-end,…"` region string into one position
/// list per region. Parsing is as strict as [consolidate_regions]; the
/// regions are not merged.
///
pub fn region_positions(regions: &str) -> Result<Vec<Vec<u32>>, RegionError> {
    regions
        .trim()
        .split(',')
        .map(|token| Ok(token.parse::<ResidueInterval>()?.positions().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn iv(start: u32, end: u32) -> ResidueInterval {
        ResidueInterval { start, end }
    }

    #[rstest]
    fn test_ranges() {
        let positions = [
            11, 12, 13, 14, 15, 16, 17, 18, 22, 23, 24, 25, 40, 41, 42, 43, 67, 68, 69, 70,
        ];
        assert_eq!(
            ranges(&positions),
            vec![iv(11, 18), iv(22, 25), iv(40, 43), iv(67, 70)]
        );
    }

    #[rstest]
    fn test_ranges_unsorted_with_duplicates() {
        assert_eq!(ranges(&[3, 1, 2, 2, 7, 8]), vec![iv(1, 3), iv(7, 8)]);
        assert_eq!(ranges(&[]), vec![]);
        assert_eq!(ranges(&[5]), vec![iv(5, 5)]);
    }

    #[rstest]
    #[case(vec![iv(1, 2), iv(5, 10), iv(15, 25)], vec![iv(1, 2), iv(5, 10), iv(15, 25)])]
    #[case(vec![iv(1, 2), iv(5, 10), iv(8, 25)], vec![iv(1, 2), iv(5, 25)])]
    #[case(vec![iv(1, 2), iv(5, 10), iv(8, 25), iv(26, 34)], vec![iv(1, 2), iv(5, 34)])]
    #[case(
        vec![iv(1, 2), iv(5, 10), iv(8, 25), iv(26, 34), iv(10, 20), iv(32, 37)],
        vec![iv(1, 2), iv(5, 37)]
    )]
    #[case(
        vec![iv(1, 2), iv(5, 10), iv(8, 25), iv(26, 34), iv(1, 20), iv(32, 37)],
        vec![iv(1, 37)]
    )]
    fn test_merge_intervals(
        #[case] input: Vec<ResidueInterval>,
        #[case] expected: Vec<ResidueInterval>,
    ) {
        assert_eq!(merge_intervals(&input), expected);
        // Result must not depend on input order.
        let reversed: Vec<ResidueInterval> = input.into_iter().rev().collect();
        assert_eq!(merge_intervals(&reversed), expected);
    }

    #[rstest]
    fn test_merged_intervals_are_disjoint_and_non_adjacent() {
        let merged = merge_intervals(&[iv(1, 3), iv(4, 6), iv(9, 12), iv(20, 21), iv(14, 18)]);
        for pair in merged.windows(2) {
            assert!(pair[1].start > pair[0].end + 1);
        }
        assert_eq!(merged, vec![iv(1, 6), iv(9, 12), iv(14, 18), iv(20, 21)]);
    }

    #[rstest]
    fn test_consolidate_regions() {
        let merged = consolidate_regions("1-2,5-10,8-25", 5).unwrap();
        assert_eq!(merged, vec![iv(5, 25)]);

        let merged = consolidate_regions("1-2,5-10,8-25", 1).unwrap();
        assert_eq!(merged, vec![iv(1, 2), iv(5, 25)]);
    }

    #[rstest]
    #[case("1-2,5")]
    #[case("1-2,x-10")]
    #[case("")]
    fn test_consolidate_regions_malformed(#[case] input: &str) {
        assert!(matches!(
            consolidate_regions(input, 1),
            Err(RegionError::Malformed(_))
        ));
    }

    #[rstest]
    fn test_consolidate_regions_reversed_bounds() {
        assert!(matches!(
            consolidate_regions("10-5", 1),
            Err(RegionError::ReversedBounds { start: 10, end: 5 })
        ));
    }

    #[rstest]
    fn test_region_positions() {
        let positions = region_positions("1-5,21-25").unwrap();
        assert_eq!(
            positions,
            vec![vec![1, 2, 3, 4, 5], vec![21, 22, 23, 24, 25]]
        );
    }

    #[rstest]
    fn test_interval_round_trip_display_parse() {
        let interval: ResidueInterval = "17-42".parse().unwrap();
        assert_eq!(interval, iv(17, 42));
        assert_eq!(interval.to_string(), "17-42");
        assert_eq!(interval.width(), 26);
    }

    #[rstest]
    fn test_touches() {
        assert!(iv(1, 7).touches(&iv(8, 17)));
        assert!(iv(8, 17).touches(&iv(1, 7)));
        assert!(iv(1, 12).touches(&iv(10, 17)));
        assert!(!iv(1, 7).touches(&iv(10, 17)));
    }
}
