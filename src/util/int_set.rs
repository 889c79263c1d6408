use super::IntSet;
use std::fmt::{Display, Formatter};

impl IntSet {
    /// Create a set from arbitrary closed ranges, merging overlapping and
    /// adjacent ranges into canonical form.
    pub fn new(content: impl IntoIterator<Item = (u32, u32)>, universe: (u32, u32)) -> Self {
        Self {
            universe,
            ranges: Self::coalesce(content.into_iter().collect()),
        }
    }

    pub fn empty(universe: (u32, u32)) -> Self {
        Self {
            universe,
            ranges: Vec::new(),
        }
    }

    pub fn universe(&self) -> (u32, u32) {
        self.universe
    }

    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.ranges
            .binary_search_by(|&(start, stop)| {
                if value < start {
                    std::cmp::Ordering::Greater
                } else if value > stop {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    // Sort by start, then sweep once merging every overlapping or adjacent
    // neighbour. Input ranges with start > stop are dropped.
    fn coalesce(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
        ranges.retain(|&(start, stop)| start <= stop);
        ranges.sort_unstable();
        let mut canonical: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
        for (start, stop) in ranges {
            match canonical.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => {
                    last.1 = last.1.max(stop);
                }
                _ => canonical.push((start, stop)),
            }
        }
        canonical
    }

    pub fn union(&self, other: &IntSet) -> IntSet {
        debug_assert_eq!(self.universe, other.universe);
        IntSet::new(
            self.ranges.iter().chain(other.ranges.iter()).copied(),
            self.universe,
        )
    }

    /// Intersection distributes over the union of disjoint ranges: intersect
    /// every range of `self` with every range of `other` and canonicalize.
    pub fn intersect(&self, other: &IntSet) -> IntSet {
        debug_assert_eq!(self.universe, other.universe);
        let mut intersections = Vec::new();
        for &(self_start, self_stop) in &self.ranges {
            for &(other_start, other_stop) in &other.ranges {
                if self_start > other_stop || other_start > self_stop {
                    continue;
                }
                intersections.push((self_start.max(other_start), self_stop.min(other_stop)));
            }
        }
        IntSet::new(intersections, self.universe)
    }

    /// Complement with respect to the universe: the gaps between ranges, plus
    /// the leading and trailing remainder of the universe.
    pub fn complement(&self) -> IntSet {
        let (lo, hi) = self.universe;
        let mut gaps = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = lo;
        for &(start, stop) in &self.ranges {
            if start > next {
                gaps.push((next, start - 1));
            }
            if stop >= hi {
                return IntSet::new(gaps, self.universe);
            }
            next = stop + 1;
        }
        gaps.push((next, hi));
        IntSet::new(gaps, self.universe)
    }

    pub fn difference(&self, other: &IntSet) -> IntSet {
        self.intersect(&other.complement())
    }
}

impl Display for IntSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &(start, stop) in &self.ranges {
            if start == stop {
                write!(f, "{}", fmt_code_point(start))?;
            } else {
                write!(f, "{}-{}", fmt_code_point(start), fmt_code_point(stop))?;
            }
        }
        Ok(())
    }
}

fn fmt_code_point(value: u32) -> String {
    match char::from_u32(value) {
        Some(c) if !c.is_control() => c.to_string(),
        _ => format!("\\u{{{:X}}}", value),
    }
}
