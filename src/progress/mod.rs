//! Body-fat progress history - period windows, chart scaling and milestones

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Axis bounds when there is no history yet
const DEFAULT_AXIS: (f64, f64) = (5.0, 40.0);

/// Hard limits for the body-fat axis
const AXIS_FLOOR: f64 = 0.0;
const AXIS_CEILING: f64 = 60.0;
/// Smallest range left after clamping
const MIN_AXIS_SPAN: f64 = 2.0;

const TICK_COUNT: usize = 7;

/// Body-fat drop (percentage points) since the first scan that counts as a milestone
pub const REDUCTION_MILESTONE: f64 = 5.0;

/// One body-fat measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub body_fat: f64,
    pub timestamp: DateTime<Utc>,
    /// Rationale returned by the analysis service
    pub analysis: Option<String>,
}

impl ProgressPoint {
    pub fn new(body_fat: f64, timestamp: DateTime<Utc>) -> Self {
        Self { body_fat, timestamp, analysis: None }
    }
}

/// Time window for browsing check-ins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
    #[default]
    All,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::ThreeMonths => "3months",
            Period::SixMonths => "6months",
            Period::Year => "year",
            Period::All => "all",
        }
    }

    /// Window length; `None` for all time
    pub fn days(&self) -> Option<i64> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::ThreeMonths => Some(90),
            Period::SixMonths => Some(180),
            Period::Year => Some(365),
            Period::All => None,
        }
    }

    /// Oldest timestamp still inside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }

    pub fn all() -> &'static [Period] {
        &[
            Period::Week,
            Period::Month,
            Period::ThreeMonths,
            Period::SixMonths,
            Period::Year,
            Period::All,
        ]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.label() == normalized)
            .ok_or_else(|| format!("unknown period: {} (week, month, 3months, 6months, year, all)", s))
    }
}

/// Points inside `period` as of `now`, for a history ordered oldest first
pub fn filter_since(history: &[ProgressPoint], period: Period, now: DateTime<Utc>) -> &[ProgressPoint] {
    match period.cutoff(now) {
        Some(cutoff) => {
            let start = history.partition_point(|p| p.timestamp < cutoff);
            &history[start..]
        }
        None => history,
    }
}

/// Newest body fat in a history ordered oldest first
pub fn latest_body_fat(history: &[ProgressPoint]) -> Option<f64> {
    history.last().map(|p| p.body_fat)
}

/// Y-axis range for the progress chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartAxis {
    pub min: f64,
    pub max: f64,
}

impl ChartAxis {
    /// Autoscale around the data with a 10% (at least 1 point) buffer
    pub fn for_history(history: &[ProgressPoint]) -> Self {
        if history.is_empty() {
            let (min, max) = DEFAULT_AXIS;
            return Self { min, max };
        }

        let lo = history.iter().map(|p| p.body_fat).fold(f64::INFINITY, f64::min);
        let hi = history.iter().map(|p| p.body_fat).fold(f64::NEG_INFINITY, f64::max);
        let buffer = ((hi - lo) * 0.1).max(1.0);

        let mut min = (lo - buffer).floor().max(AXIS_FLOOR);
        let max = (hi + buffer).ceil().clamp(AXIS_FLOOR + MIN_AXIS_SPAN, AXIS_CEILING);
        // Only reachable when clamping collapses the range
        if min >= max {
            min = max - MIN_AXIS_SPAN;
        }

        Self { min, max }
    }

    /// Evenly spaced ticks from max down to min, rounded to 0.1
    pub fn ticks(&self) -> Vec<f64> {
        let step = (self.max - self.min) / (TICK_COUNT - 1) as f64;
        (0..TICK_COUNT)
            .map(|i| ((self.max - i as f64 * step) * 10.0).round() / 10.0)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    /// Dropped at least [`REDUCTION_MILESTONE`] points since the first scan
    Reduction,
    /// Reached the target body fat
    Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    /// Index into the history
    pub index: usize,
    pub kind: MilestoneKind,
    /// Reduction amount for `Reduction`, body fat for `Goal`
    pub value: f64,
}

/// Milestones for a history ordered oldest first
pub fn find_milestones(history: &[ProgressPoint], target_body_fat: f64) -> Vec<Milestone> {
    let Some(first) = history.first() else {
        return Vec::new();
    };

    let mut milestones = Vec::new();
    for (index, point) in history.iter().enumerate().skip(1) {
        let reduction = first.body_fat - point.body_fat;
        if reduction >= REDUCTION_MILESTONE {
            milestones.push(Milestone { index, kind: MilestoneKind::Reduction, value: reduction });
        }
        if point.body_fat <= target_body_fat {
            milestones.push(Milestone { index, kind: MilestoneKind::Goal, value: point.body_fat });
        }
    }
    milestones
}

/// Everything the history view shows for one window
#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport<'a> {
    pub period: &'static str,
    pub points: &'a [ProgressPoint],
    pub axis: ChartAxis,
    pub milestones: Vec<Milestone>,
}

impl<'a> HistoryReport<'a> {
    pub fn new(history: &'a [ProgressPoint], period: Period, target_body_fat: f64, now: DateTime<Utc>) -> Self {
        let points = filter_since(history, period, now);
        Self {
            period: period.label(),
            points,
            axis: ChartAxis::for_history(points),
            milestones: find_milestones(points, target_body_fat),
        }
    }
}
