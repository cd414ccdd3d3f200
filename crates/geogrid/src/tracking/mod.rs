pub mod domain;
pub mod grid;
pub mod history;
pub mod metrics;
pub mod recommendations;
pub mod report;
pub mod share;

pub use domain::{Competitor, GridDimensions, GridError, GridPoint, Keyword, LatLng};
pub use grid::{GridSampler, SampleSource, SeededSampler, SequenceSource};
pub use history::{HistoryError, HistorySnapshot, HistoryTracker, TrendDirection};
pub use metrics::{
    compute_metrics, competitor_analysis, CompetitorStanding, MetricsSnapshot, PercentileBand,
};
pub use recommendations::{generate_recommendations, Priority, Recommendation, RecommendationCategory};
