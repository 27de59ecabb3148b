//! Sorted, non-overlapping sets of token types
//!
//! Transition labels, follow sets and the combined follow set of a rule are
//! all expressed as `IntervalSet`s. Intervals are inclusive on both ends and
//! adjacent intervals are merged on insertion.

use std::fmt;

use super::token::TokenType;

/// Inclusive interval `[start, stop]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: TokenType,
    pub stop: TokenType,
}

impl Interval {
    pub fn new(start: TokenType, stop: TokenType) -> Self {
        Self { start, stop }
    }

    pub fn len(&self) -> usize {
        (self.stop - self.start + 1) as usize
    }
}

/// Set of token types stored as merged intervals
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing a single token type
    pub fn of(token: TokenType) -> Self {
        Self::range(token, token)
    }

    /// Set containing every token type in `[start, stop]`
    pub fn range(start: TokenType, stop: TokenType) -> Self {
        let mut set = Self::new();
        set.add_range(start, stop);
        set
    }

    pub fn from_tokens(tokens: &[TokenType]) -> Self {
        let mut set = Self::new();
        for token in tokens {
            set.add(*token);
        }
        set
    }

    pub fn add(&mut self, token: TokenType) {
        self.add_range(token, token);
    }

    pub fn add_range(&mut self, start: TokenType, stop: TokenType) {
        if stop < start {
            return;
        }

        let mut merged = Interval::new(start, stop);
        let mut result = Vec::with_capacity(self.intervals.len() + 1);
        let mut inserted = false;

        for interval in &self.intervals {
            if interval.stop + 1 < merged.start {
                result.push(*interval);
            } else if merged.stop + 1 < interval.start {
                if !inserted {
                    result.push(merged);
                    inserted = true;
                }
                result.push(*interval);
            } else {
                merged.start = merged.start.min(interval.start);
                merged.stop = merged.stop.max(interval.stop);
            }
        }

        if !inserted {
            result.push(merged);
        }
        self.intervals = result;
    }

    pub fn add_all(&mut self, other: &IntervalSet) {
        for interval in &other.intervals {
            self.add_range(interval.start, interval.stop);
        }
    }

    pub fn contains(&self, token: TokenType) -> bool {
        self.intervals
            .binary_search_by(|interval| {
                if interval.stop < token {
                    std::cmp::Ordering::Less
                } else if interval.start > token {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Everything in `vocabulary` that is not in this set
    pub fn complement(&self, vocabulary: &IntervalSet) -> IntervalSet {
        let mut result = IntervalSet::new();
        for token in vocabulary.iter() {
            if !self.contains(token) {
                result.add(token);
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of token types in the set
    pub fn size(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenType> + '_ {
        self.intervals
            .iter()
            .flat_map(|interval| interval.start..=interval.stop)
    }

    pub fn to_vec(&self) -> Vec<TokenType> {
        self.iter().collect()
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .intervals
            .iter()
            .map(|interval| {
                if interval.start == interval.stop {
                    interval.start.to_string()
                } else {
                    format!("{}..{}", interval.start, interval.stop)
                }
            })
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
