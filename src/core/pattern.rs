use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GradualError;

/// Direction in which an attribute varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl Direction {
    pub fn symbol(self) -> char {
        match self {
            Direction::Increasing => '+',
            Direction::Decreasing => '-',
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        }
    }
}

/// An (attribute, direction) pair.
///
/// Ordering is by attribute index first, so sorted item lists read in
/// column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GradualItem {
    /// Column index in the dataset.
    pub attribute: usize,
    pub direction: Direction,
}

impl GradualItem {
    pub fn new(attribute: usize, direction: Direction) -> Self {
        Self {
            attribute,
            direction,
        }
    }

    pub fn increasing(attribute: usize) -> Self {
        Self::new(attribute, Direction::Increasing)
    }

    pub fn decreasing(attribute: usize) -> Self {
        Self::new(attribute, Direction::Decreasing)
    }

    /// The same attribute in the opposite direction.
    pub fn inverse(self) -> Self {
        Self::new(self.attribute, self.direction.inverse())
    }

    /// Render with a column title instead of the index, e.g. `Age+`.
    pub fn describe(&self, titles: &[String]) -> String {
        match titles.get(self.attribute) {
            Some(title) => format!("{title}{}", self.direction.symbol()),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for GradualItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.attribute, self.direction.symbol())
    }
}

impl FromStr for GradualItem {
    type Err = GradualError;

    /// Parse the `"2+"` / `"4-"` rendering.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let direction = match s.chars().last() {
            Some('+') => Direction::Increasing,
            Some('-') => Direction::Decreasing,
            _ => return Err(GradualError::InvalidItem(s.to_string())),
        };
        let attribute = s[..s.len() - 1]
            .parse::<usize>()
            .map_err(|_| GradualError::InvalidItem(s.to_string()))?;
        Ok(Self::new(attribute, direction))
    }
}

/// Round `value` to `decimals` decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Decimal rendering that always shows a fractional part (`3.0`, `0.62`).
fn fmt_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// A set of gradual items on distinct attributes, plus its support.
///
/// Items keep insertion order for display; set semantics (subset, inverse
/// equality) ignore order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradualPattern {
    items: Vec<GradualItem>,
    support: f64,
}

impl GradualPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern from items, skipping any item whose attribute is
    /// already present.
    pub fn from_items(items: impl IntoIterator<Item = GradualItem>) -> Self {
        let mut pattern = Self::new();
        for item in items {
            pattern.add_item(item);
        }
        pattern
    }

    pub fn with_support(mut self, support: f64) -> Self {
        self.set_support(support);
        self
    }

    /// Append `item` unless its attribute is already used. Returns whether it was added.
    pub fn add_item(&mut self, item: GradualItem) -> bool {
        if self.contains_attribute(item.attribute) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains_attribute(&self, attribute: usize) -> bool {
        self.items.iter().any(|gi| gi.attribute == attribute)
    }

    pub fn items(&self) -> &[GradualItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Support rounded to three decimals.
    pub fn support(&self) -> f64 {
        round_to(self.support, 3)
    }

    /// Unrounded support, used for threshold decisions.
    pub fn raw_support(&self) -> f64 {
        self.support
    }

    pub fn set_support(&mut self, support: f64) {
        self.support = support;
    }

    pub fn item_set(&self) -> BTreeSet<GradualItem> {
        self.items.iter().copied().collect()
    }

    pub fn inverse_item_set(&self) -> BTreeSet<GradualItem> {
        self.items.iter().map(|gi| gi.inverse()).collect()
    }

    /// Every item flipped. The inverse describes the same record pairs read
    /// in the opposite order, so it keeps the support.
    pub fn inverse(&self) -> GradualPattern {
        GradualPattern {
            items: self.items.iter().map(|gi| gi.inverse()).collect(),
            support: self.support,
        }
    }

    /// Items sorted by attribute and oriented so the first one is increasing.
    ///
    /// A pattern and its inverse share one canonical form.
    pub fn canonical_items(&self) -> Vec<GradualItem> {
        let mut items = self.items.clone();
        items.sort();
        if items
            .first()
            .is_some_and(|gi| gi.direction == Direction::Decreasing)
        {
            for gi in items.iter_mut() {
                *gi = gi.inverse();
            }
        }
        items
    }

    pub fn canonical(&self) -> GradualPattern {
        GradualPattern {
            items: self.canonical_items(),
            support: self.support,
        }
    }

    /// Same item set, directly or as a full inverse.
    pub fn same_items(&self, other: &GradualPattern) -> bool {
        let theirs = other.item_set();
        self.item_set() == theirs || self.inverse_item_set() == theirs
    }

    /// Item set (or its inverse) contained in `other`'s item set.
    pub fn is_subset_of(&self, other: &GradualPattern) -> bool {
        let theirs = other.item_set();
        self.item_set().is_subset(&theirs) || self.inverse_item_set().is_subset(&theirs)
    }

    /// Item set (or its inverse) containing `other`'s item set.
    pub fn is_superset_of(&self, other: &GradualPattern) -> bool {
        let theirs = other.item_set();
        self.item_set().is_superset(&theirs) || self.inverse_item_set().is_superset(&theirs)
    }

    /// Render with column titles, e.g. `["Age+","Salary-"]`.
    pub fn describe(&self, titles: &[String]) -> String {
        render_list(self.items.iter().map(|gi| gi.describe(titles)))
    }
}

impl fmt::Display for GradualPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_list(self.items.iter().map(|gi| gi.to_string())))
    }
}

fn render_list(parts: impl Iterator<Item = String>) -> String {
    let quoted: Vec<String> = parts.map(|p| format!("\"{p}\"")).collect();
    format!("[{}]", quoted.join(","))
}

const SECONDS_PER_YEAR: f64 = 3.154e7;
const SECONDS_PER_MONTH: f64 = 2.628e6;
const SECONDS_PER_WEEK: f64 = 604_800.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Estimated delay between co-varying attributes, with its fuzzy support.
///
/// A support of 0 is the "no lag found" sentinel: `timestamp` then holds the
/// best candidate the estimator saw and must not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeLag {
    /// Signed delay in seconds.
    pub timestamp: f64,
    /// Fuzzy support, unrounded so it compares exactly against a threshold.
    pub support: f64,
}

impl TimeLag {
    pub fn new(timestamp: f64, support: f64) -> Self {
        Self { timestamp, support }
    }

    /// Sentinel carrying the best-effort timestamp with support 0.
    pub fn invalid(timestamp: f64) -> Self {
        Self {
            timestamp,
            support: 0.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.support > 0.0
    }

    /// Absolute delay expressed in the largest unit that fits at least once.
    pub fn magnitude(&self) -> (f64, &'static str) {
        let seconds = self.timestamp.abs();
        let units = [
            (SECONDS_PER_YEAR, "years"),
            (SECONDS_PER_MONTH, "months"),
            (SECONDS_PER_WEEK, "weeks"),
            (SECONDS_PER_DAY, "days"),
            (SECONDS_PER_HOUR, "hours"),
            (SECONDS_PER_MINUTE, "minutes"),
        ];
        for (size, unit) in units {
            if seconds >= size {
                return (seconds / size, unit);
            }
        }
        (seconds, "seconds")
    }
}

impl fmt::Display for TimeLag {
    /// `~ +3.0 days : 0.62`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.timestamp < 0.0 { '-' } else { '+' };
        let (value, unit) = self.magnitude();
        write!(
            f,
            "~ {sign}{} {unit} : {}",
            fmt_decimal(round_to(value, 2)),
            fmt_decimal(round_to(self.support, 2))
        )
    }
}

/// A gradual pattern mined on a step-shifted table, with its time lag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalPattern {
    /// Item on the reference column, when the pattern includes it.
    pub reference: Option<GradualItem>,
    /// Items on the shifted columns.
    pub temporal_items: Vec<GradualItem>,
    pub time_lag: TimeLag,
    /// Support on the shifted table.
    pub support: f64,
    /// Row shift the pattern was mined at.
    pub step: usize,
}

impl TemporalPattern {
    /// Split `pattern` into its reference and temporal items.
    pub fn new(
        pattern: &GradualPattern,
        reference_col: usize,
        time_lag: TimeLag,
        step: usize,
    ) -> Self {
        let reference = pattern
            .items()
            .iter()
            .copied()
            .find(|gi| gi.attribute == reference_col);
        let temporal_items = pattern
            .items()
            .iter()
            .copied()
            .filter(|gi| gi.attribute != reference_col)
            .collect();
        Self {
            reference,
            temporal_items,
            time_lag,
            support: pattern.raw_support(),
            step,
        }
    }

    /// The plain gradual pattern, reference item first.
    pub fn pattern(&self) -> GradualPattern {
        let items = self
            .reference
            .into_iter()
            .chain(self.temporal_items.iter().copied());
        GradualPattern::from_items(items).with_support(self.support)
    }

    pub fn describe(&self, titles: &[String]) -> String {
        format!("{} {}", self.pattern().describe(titles), self.time_lag)
    }
}

impl fmt::Display for TemporalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pattern(), self.time_lag)
    }
}
