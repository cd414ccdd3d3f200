use super::domain::{GridDimensions, GridPoint};
use super::grid::{point_position, DEFAULT_CENTER, DEFAULT_SPACING_DEG};
use super::metrics::{MetricsSnapshot, PercentileBand, VisibilityScore};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Snapshots inspected when deriving the trend direction.
const TREND_WINDOW: usize = 7;
/// Rank movement below this magnitude reads as stable.
const TREND_EPSILON: f64 = 0.5;

const SYNTHETIC_SIDE: usize = 5;
const SYNTHETIC_POINTS: usize = SYNTHETIC_SIDE * SYNTHETIC_SIDE;
const SYNTHETIC_DIMS: GridDimensions = GridDimensions::square_unchecked(SYNTHETIC_SIDE);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Declining => "Declining",
            Self::Stable => "Stable",
        }
    }
}

/// One day's grid and metrics. Appended in chronological order and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub date: NaiveDate,
    pub grid: Vec<GridPoint>,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("snapshot for {date} is not after the latest recorded day {latest}")]
    OutOfOrder { date: NaiveDate, latest: NaiveDate },
}

/// Rolling per-day record for one business profile. One tracker instance per
/// profile; the tracker itself does no locking, callers serialize mutations.
#[derive(Debug, Default)]
pub struct HistoryTracker {
    snapshots: Vec<HistorySnapshot>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot. Dates must strictly increase; a duplicate or
    /// backdated day is rejected rather than silently reordered.
    pub fn append(
        &mut self,
        date: NaiveDate,
        grid: Vec<GridPoint>,
        metrics: MetricsSnapshot,
    ) -> Result<(), HistoryError> {
        if let Some(last) = self.snapshots.last() {
            if date <= last.date {
                return Err(HistoryError::OutOfOrder {
                    date,
                    latest: last.date,
                });
            }
        }

        self.snapshots.push(HistorySnapshot {
            date,
            grid,
            metrics,
        });
        Ok(())
    }

    pub fn snapshots(&self) -> &[HistorySnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Metrics of the most recent day, if any day has been recorded.
    pub fn current_metrics(&self) -> Option<&MetricsSnapshot> {
        self.snapshots.last().map(|snapshot| &snapshot.metrics)
    }

    /// Compares average map rank across the recent window. Lower rank is
    /// better, so a drop reads as improvement. Fewer than two usable
    /// snapshots is stable, not an error.
    pub fn trend_direction(&self) -> TrendDirection {
        let start = self.snapshots.len().saturating_sub(TREND_WINDOW);
        let ranks: Vec<f64> = self.snapshots[start..]
            .iter()
            .filter_map(|snapshot| snapshot.metrics.average_map_rank)
            .collect();

        let (Some(first), Some(last)) = (ranks.first(), ranks.last()) else {
            return TrendDirection::Stable;
        };
        if ranks.len() < 2 {
            return TrendDirection::Stable;
        }

        let delta = last - first;
        if delta < -TREND_EPSILON {
            TrendDirection::Improving
        } else if delta > TREND_EPSILON {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }

    /// Day with the best (lowest) average map rank; ties resolve to the
    /// earliest day. `None` for an empty history.
    pub fn best_performing_day(&self) -> Option<NaiveDate> {
        let mut best: Option<(NaiveDate, f64)> = None;
        for snapshot in &self.snapshots {
            let Some(rank) = snapshot.metrics.average_map_rank else {
                continue;
            };
            match best {
                Some((_, best_rank)) if rank >= best_rank => {}
                _ => best = Some((snapshot.date, rank)),
            }
        }
        best.map(|(date, _)| date)
    }

    /// Backfills `days` synthetic snapshots ending on `today`, using a
    /// deterministic sinusoidal perturbation around a baseline so demo
    /// timelines look plausibly smooth. A demo stand-in: real deployments
    /// append genuinely observed snapshots instead.
    pub fn synthesize_series(&mut self, days: usize, today: NaiveDate) -> Result<(), HistoryError> {
        for day in 0..days {
            let date = today - Duration::days((days - 1 - day) as i64);
            let metrics = synthetic_metrics(day);
            let grid = synthetic_frame_grid(day);
            self.append(date, grid, metrics)?;
        }
        Ok(())
    }
}

fn synthetic_metrics(day: usize) -> MetricsSnapshot {
    let day = day as f64;
    let average_map_rank = 5.2 + (day * 0.2).sin() * 2.0;
    let visibility_pct = 65.0 + (day * 0.15).cos() * 15.0;
    let appearances = (12.0 + ((day * 0.1).sin() * 8.0).floor())
        .clamp(0.0, SYNTHETIC_POINTS as f64) as usize;
    let share_of_local_voice = super::metrics::round_one_decimal(visibility_pct);

    MetricsSnapshot {
        average_map_rank: Some(average_map_rank),
        share_of_local_voice,
        visibility: VisibilityScore {
            appearances,
            total_points: SYNTHETIC_POINTS,
        },
        percentile: PercentileBand::from_solv(share_of_local_voice),
    }
}

fn synthetic_frame_grid(day: usize) -> Vec<GridPoint> {
    (0..SYNTHETIC_POINTS)
        .map(|index| {
            let row = index / SYNTHETIC_SIDE;
            let col = index % SYNTHETIC_SIDE;
            let wave = 8.0 + (day as f64 * 0.1 + index as f64 * 0.5).sin() * 5.0;
            GridPoint {
                row,
                col,
                position: point_position(DEFAULT_CENTER, DEFAULT_SPACING_DEG, SYNTHETIC_DIMS, row, col),
                rank: wave.round().clamp(1.0, 20.0) as u8,
                visible: (day + index) % 4 != 0,
                competitors: Vec::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid base date") + Duration::days(offset)
    }

    fn metrics(average_map_rank: Option<f64>) -> MetricsSnapshot {
        MetricsSnapshot {
            average_map_rank,
            share_of_local_voice: 40.0,
            visibility: VisibilityScore {
                appearances: 10,
                total_points: 25,
            },
            percentile: PercentileBand::Average,
        }
    }

    fn tracker_with_ranks(ranks: &[f64]) -> HistoryTracker {
        let mut tracker = HistoryTracker::new();
        for (offset, rank) in ranks.iter().enumerate() {
            tracker
                .append(day(offset as i64), Vec::new(), metrics(Some(*rank)))
                .expect("dates strictly increase");
        }
        tracker
    }

    #[test]
    fn append_rejects_backdated_and_duplicate_days() {
        let mut tracker = HistoryTracker::new();
        tracker
            .append(day(1), Vec::new(), metrics(Some(5.0)))
            .expect("first snapshot");

        assert!(matches!(
            tracker.append(day(1), Vec::new(), metrics(Some(5.0))),
            Err(HistoryError::OutOfOrder { .. })
        ));
        assert!(matches!(
            tracker.append(day(0), Vec::new(), metrics(Some(5.0))),
            Err(HistoryError::OutOfOrder { .. })
        ));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn strictly_falling_ranks_read_as_improving() {
        let tracker = tracker_with_ranks(&[9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0]);
        assert_eq!(tracker.trend_direction(), TrendDirection::Improving);
    }

    #[test]
    fn strictly_rising_ranks_read_as_declining() {
        let tracker = tracker_with_ranks(&[3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(tracker.trend_direction(), TrendDirection::Declining);
    }

    #[test]
    fn flat_ranks_and_sparse_history_read_as_stable() {
        let tracker = tracker_with_ranks(&[5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(tracker.trend_direction(), TrendDirection::Stable);

        assert_eq!(
            HistoryTracker::new().trend_direction(),
            TrendDirection::Stable
        );
        assert_eq!(
            tracker_with_ranks(&[5.0]).trend_direction(),
            TrendDirection::Stable
        );
    }

    #[test]
    fn trend_only_considers_the_recent_window() {
        // Old snapshots improve sharply, recent window is flat.
        let tracker = tracker_with_ranks(&[19.0, 15.0, 11.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0]);
        assert_eq!(tracker.trend_direction(), TrendDirection::Stable);
    }

    #[test]
    fn best_day_takes_lowest_rank_with_first_occurrence_winning_ties() {
        let tracker = tracker_with_ranks(&[6.0, 3.5, 4.0, 3.5, 8.0]);
        assert_eq!(tracker.best_performing_day(), Some(day(1)));

        assert_eq!(HistoryTracker::new().best_performing_day(), None);
    }

    #[test]
    fn current_metrics_is_none_only_for_empty_history() {
        let tracker = tracker_with_ranks(&[6.0, 2.0]);
        let current = tracker.current_metrics().expect("history present");
        assert_relative_eq!(current.average_map_rank.expect("rank recorded"), 2.0);

        assert!(HistoryTracker::new().current_metrics().is_none());
    }

    #[test]
    fn synthetic_series_ends_today_with_baseline_first_frame() {
        let today = day(40);
        let mut tracker = HistoryTracker::new();
        tracker
            .synthesize_series(30, today)
            .expect("fresh tracker accepts the series");

        assert_eq!(tracker.len(), 30);
        let snapshots = tracker.snapshots();
        assert_eq!(snapshots.last().expect("non-empty").date, today);
        assert_eq!(snapshots[0].date, today - Duration::days(29));

        // Day zero sits exactly on the oscillation baseline.
        let first = &snapshots[0].metrics;
        assert_relative_eq!(first.average_map_rank.expect("synthetic rank"), 5.2);
        assert_relative_eq!(first.share_of_local_voice, 80.0);
        assert_eq!(first.visibility.total_points, 25);

        for snapshot in snapshots {
            assert_eq!(snapshot.grid.len(), 25);
            for point in &snapshot.grid {
                assert!((1..=20).contains(&point.rank));
            }
        }
    }

    #[test]
    fn synthetic_series_is_deterministic() {
        let today = day(40);
        let mut first = HistoryTracker::new();
        let mut second = HistoryTracker::new();
        first.synthesize_series(10, today).expect("series");
        second.synthesize_series(10, today).expect("series");
        assert_eq!(first.snapshots(), second.snapshots());
    }
}
