use super::super::domain::GridPoint;
use super::super::history::TrendDirection;
use super::super::metrics::{CompetitorStanding, MetricsSnapshot, PercentileBand};
use super::super::recommendations::{Priority, Recommendation, RecommendationCategory};
use chrono::NaiveDate;
use serde::Serialize;

/// Label used wherever a metric has no data to show.
pub const UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize)]
pub struct MetricsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_map_rank: Option<f64>,
    pub average_map_rank_label: String,
    pub share_of_local_voice: f64,
    pub appearances: usize,
    pub total_points: usize,
    pub percentile: PercentileBand,
    pub percentile_label: &'static str,
}

impl MetricsView {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            average_map_rank: snapshot.average_map_rank,
            average_map_rank_label: format_rank(snapshot.average_map_rank),
            share_of_local_voice: snapshot.share_of_local_voice,
            appearances: snapshot.visibility.appearances,
            total_points: snapshot.visibility.total_points,
            percentile: snapshot.percentile,
            percentile_label: snapshot.percentile.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitorStandingView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rank: Option<f64>,
    pub average_rank_label: String,
    pub visibility: usize,
}

impl CompetitorStandingView {
    pub fn from_standing(standing: &CompetitorStanding) -> Self {
        Self {
            name: standing.name.clone(),
            average_rank: standing.average_rank,
            average_rank_label: format_rank(standing.average_rank),
            visibility: standing.visibility,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub category: RecommendationCategory,
    pub category_label: &'static str,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub title: &'static str,
    pub description: String,
    pub impact: &'static str,
}

impl RecommendationView {
    pub fn from_recommendation(recommendation: &Recommendation) -> Self {
        Self {
            category: recommendation.category,
            category_label: recommendation.category.label(),
            priority: recommendation.priority,
            priority_label: recommendation.priority.label(),
            title: recommendation.title,
            description: recommendation.description.clone(),
            impact: recommendation.impact,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistorySummaryView {
    pub total_days: usize,
    pub trend: TrendDirection,
    pub trend_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_performing_day: Option<NaiveDate>,
    pub best_performing_day_label: String,
    pub improvement_opportunities: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridPointView {
    pub row: usize,
    pub col: usize,
    pub lat: f64,
    pub lng: f64,
    pub rank: u8,
    pub visible: bool,
}

impl GridPointView {
    pub fn from_point(point: &GridPoint) -> Self {
        Self {
            row: point.row,
            col: point.col,
            lat: point.position.lat,
            lng: point.position.lng,
            rank: point.rank,
            visible: point.visible,
        }
    }
}

pub fn format_rank(rank: Option<f64>) -> String {
    match rank {
        Some(rank) => format!("{rank:.1}"),
        None => UNAVAILABLE.to_owned(),
    }
}

pub fn format_day(day: Option<NaiveDate>) -> String {
    match day {
        Some(day) => day.to_string(),
        None => UNAVAILABLE.to_owned(),
    }
}
