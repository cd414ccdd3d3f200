use super::domain::{Competitor, GridError, GridPoint, TOP_THREE_CUTOFF};
use serde::{Deserialize, Serialize};

/// Top-three appearance count reported alongside the total so consumers can
/// recompute ratios instead of trusting a pre-baked percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityScore {
    pub appearances: usize,
    pub total_points: usize,
}

impl VisibilityScore {
    pub fn ratio(self) -> f64 {
        if self.total_points == 0 {
            return 0.0;
        }
        self.appearances as f64 / self.total_points as f64
    }
}

/// SoLV benchmark buckets, evaluated highest-first with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBand {
    Excellent,
    Good,
    Average,
    BelowAverage,
    NeedsImprovement,
}

impl PercentileBand {
    pub fn from_solv(solv: f64) -> Self {
        if solv >= 80.0 {
            Self::Excellent
        } else if solv >= 60.0 {
            Self::Good
        } else if solv >= 40.0 {
            Self::Average
        } else if solv >= 20.0 {
            Self::BelowAverage
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "95th percentile - Excellent",
            Self::Good => "75th percentile - Good",
            Self::Average => "50th percentile - Average",
            Self::BelowAverage => "25th percentile - Below Average",
            Self::NeedsImprovement => "10th percentile - Needs Improvement",
        }
    }
}

/// Scalar metrics derived from one grid. Computed fresh per call; only ever
/// persisted inside a history snapshot or report payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Mean rank over visible points. `None` when no point is visible; an
    /// average over zero elements must never silently read as 0.
    pub average_map_rank: Option<f64>,
    /// Percentage of points ranking in the local pack, one decimal.
    pub share_of_local_voice: f64,
    pub visibility: VisibilityScore,
    pub percentile: PercentileBand,
}

/// Derives the metric snapshot for a grid. The grid must be non-empty;
/// `GridSampler` guarantees that for any grid it produced.
pub fn compute_metrics(grid: &[GridPoint]) -> Result<MetricsSnapshot, GridError> {
    if grid.is_empty() {
        return Err(GridError::EmptyGrid);
    }

    let visible: Vec<&GridPoint> = grid.iter().filter(|point| point.visible).collect();
    let average_map_rank = if visible.is_empty() {
        None
    } else {
        let total: u32 = visible.iter().map(|point| u32::from(point.rank)).sum();
        Some(f64::from(total) / visible.len() as f64)
    };

    let appearances = grid
        .iter()
        .filter(|point| point.rank <= TOP_THREE_CUTOFF)
        .count();
    let share_of_local_voice = round_one_decimal(appearances as f64 / grid.len() as f64 * 100.0);

    Ok(MetricsSnapshot {
        average_map_rank,
        share_of_local_voice,
        visibility: VisibilityScore {
            appearances,
            total_points: grid.len(),
        },
        percentile: PercentileBand::from_solv(share_of_local_voice),
    })
}

/// Mean rank across every point, visible or not. Used by the analytics
/// export, which reports blended rank rather than the visible-only average.
pub fn mean_rank(grid: &[GridPoint]) -> Option<f64> {
    if grid.is_empty() {
        return None;
    }
    let total: u32 = grid.iter().map(|point| u32::from(point.rank)).sum();
    Some(f64::from(total) / grid.len() as f64)
}

/// Aggregate standing of one competitor across the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorStanding {
    pub name: String,
    /// `None` when no point carries a sample for this name; a competitor the
    /// grid has never seen is an empty aggregate, not an error.
    pub average_rank: Option<f64>,
    /// Points where this competitor ranks in the local pack.
    pub visibility: usize,
}

pub fn competitor_standing(grid: &[GridPoint], name: &str) -> CompetitorStanding {
    let ranks: Vec<u8> = grid
        .iter()
        .flat_map(|point| &point.competitors)
        .filter(|sample| sample.name == name)
        .map(|sample| sample.rank)
        .collect();

    let average_rank = if ranks.is_empty() {
        None
    } else {
        let total: u32 = ranks.iter().map(|rank| u32::from(*rank)).sum();
        Some(f64::from(total) / ranks.len() as f64)
    };

    let visibility = grid
        .iter()
        .filter(|point| {
            point
                .competitors
                .iter()
                .any(|sample| sample.name == name && sample.rank <= TOP_THREE_CUTOFF)
        })
        .count();

    CompetitorStanding {
        name: name.to_owned(),
        average_rank,
        visibility,
    }
}

pub fn competitor_analysis(grid: &[GridPoint], competitors: &[Competitor]) -> Vec<CompetitorStanding> {
    competitors
        .iter()
        .map(|competitor| competitor_standing(grid, &competitor.name))
        .collect()
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
