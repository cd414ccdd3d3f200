use super::super::domain::{GridDimensions, GridError, GridPoint, Keyword};
use super::super::metrics::{mean_rank, MetricsSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One grid point in the flat export shape, row-major order preserved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportPoint {
    pub lat: f64,
    pub lng: f64,
    pub rank: u8,
    pub visible: bool,
}

/// Flat payload for ingestion by an external BI/reporting consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsExport {
    pub generated_at: DateTime<Utc>,
    pub business_name: String,
    pub grid_size: String,
    pub share_of_local_voice: f64,
    /// Blended mean over every point, visible or not, unlike the
    /// visible-only average map rank.
    pub average_rank: f64,
    pub top_three_appearances: usize,
    pub keywords: Vec<Keyword>,
    pub grid_points: Vec<ExportPoint>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to render export rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export rows: {0}")]
    Io(#[from] std::io::Error),
    #[error("export rows were not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Assembles the analytics-export payload from already-computed metrics.
/// The point list mirrors the sampler's row-major order.
pub fn build_analytics_export(
    generated_at: DateTime<Utc>,
    business_name: &str,
    dims: GridDimensions,
    grid: &[GridPoint],
    metrics: &MetricsSnapshot,
    keywords: &[Keyword],
) -> Result<AnalyticsExport, GridError> {
    let average_rank = mean_rank(grid).ok_or(GridError::EmptyGrid)?;

    Ok(AnalyticsExport {
        generated_at,
        business_name: business_name.to_owned(),
        grid_size: dims.label(),
        share_of_local_voice: metrics.share_of_local_voice,
        average_rank,
        top_three_appearances: metrics.visibility.appearances,
        keywords: keywords.to_vec(),
        grid_points: grid
            .iter()
            .map(|point| ExportPoint {
                lat: point.position.lat,
                lng: point.position.lng,
                rank: point.rank,
                visible: point.visible,
            })
            .collect(),
    })
}

/// Renders the point list as CSV (`lat,lng,rank,visible` header row first).
pub fn render_points_csv(export: &AnalyticsExport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in &export.grid_points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::domain::Competitor;
    use crate::tracking::grid::{GridSampler, SequenceSource};
    use crate::tracking::metrics::compute_metrics;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn export_preserves_row_major_point_order() {
        let dims = GridDimensions::new(2, 3).expect("valid dims");
        let sampler = GridSampler::default();
        let mut source = SequenceSource::new(vec![0.1, 0.2]);
        let grid = sampler.generate(dims, &[], &mut source);
        let metrics = compute_metrics(&grid).expect("non-empty grid");

        let export = build_analytics_export(
            generated_at(),
            "Victory Cleaning Services",
            dims,
            &grid,
            &metrics,
            &[],
        )
        .expect("non-empty grid");

        assert_eq!(export.grid_points.len(), 6);
        assert_eq!(export.grid_size, "2x3");
        for (exported, sampled) in export.grid_points.iter().zip(&grid) {
            assert_relative_eq!(exported.lat, sampled.position.lat);
            assert_relative_eq!(exported.lng, sampled.position.lng);
            assert_eq!(exported.rank, sampled.rank);
        }
    }

    #[test]
    fn blended_average_covers_invisible_points() {
        let dims = GridDimensions::new(1, 2).expect("valid dims");
        let sampler = GridSampler::default();
        // Point one: rank 1, visible. Point two: rank 20, not visible.
        let mut source = SequenceSource::new(vec![0.0, 0.0, 0.99, 0.9]);
        let grid = sampler.generate(dims, &[], &mut source);
        let metrics = compute_metrics(&grid).expect("non-empty grid");

        let export =
            build_analytics_export(generated_at(), "Biz", dims, &grid, &metrics, &[])
                .expect("non-empty grid");

        assert_relative_eq!(export.average_rank, 10.5);
        assert_relative_eq!(
            metrics.average_map_rank.expect("one visible point"),
            1.0
        );
    }

    #[test]
    fn keywords_pass_through_unchanged() {
        let dims = GridDimensions::new(1, 1).expect("valid dims");
        let sampler = GridSampler::default();
        let mut source = SequenceSource::new(vec![0.5]);
        let grid = sampler.generate(dims, &[Competitor::new("Rival")], &mut source);
        let metrics = compute_metrics(&grid).expect("non-empty grid");
        let keywords = vec![Keyword {
            term: "office cleaning".to_owned(),
            average_rank: 4.2,
            visibility: 61.0,
        }];

        let export = build_analytics_export(
            generated_at(),
            "Biz",
            dims,
            &grid,
            &metrics,
            &keywords,
        )
        .expect("non-empty grid");

        assert_eq!(export.keywords, keywords);
    }

    #[test]
    fn csv_rendering_has_header_and_one_row_per_point() {
        let dims = GridDimensions::new(2, 2).expect("valid dims");
        let sampler = GridSampler::default();
        let mut source = SequenceSource::new(vec![0.3, 0.4]);
        let grid = sampler.generate(dims, &[], &mut source);
        let metrics = compute_metrics(&grid).expect("non-empty grid");
        let export =
            build_analytics_export(generated_at(), "Biz", dims, &grid, &metrics, &[])
                .expect("non-empty grid");

        let csv = render_points_csv(&export).expect("csv renders");
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "lat,lng,rank,visible");
        assert!(lines[1].ends_with("true") || lines[1].ends_with("false"));
    }
}
