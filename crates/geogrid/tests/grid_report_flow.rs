use chrono::{NaiveDate, TimeZone, Utc};
use geogrid::tracking::report::{
    build_analytics_export, build_white_label_report, render_points_csv, views::MetricsView,
    ClientBranding, ReportInputs,
};
use geogrid::tracking::share::{ShareLinkRegistry, WidgetOptions, WidgetRegistry};
use geogrid::tracking::{
    compute_metrics, competitor_analysis, generate_recommendations, Competitor, GridDimensions,
    GridSampler, HistoryTracker, Keyword, PercentileBand, RecommendationCategory, SeededSampler,
    SequenceSource,
};

fn report_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid report date")
}

/// Draw pair producing a visible rank-2 point.
const STRONG_POINT: [f64; 2] = [0.05, 0.0];
/// Draw pair producing an invisible rank-15 point.
const WEAK_POINT: [f64; 2] = [0.7, 0.9];

fn scripted_three_by_three() -> Vec<f64> {
    let mut draws = Vec::new();
    for _ in 0..3 {
        draws.extend_from_slice(&STRONG_POINT);
    }
    for _ in 0..6 {
        draws.extend_from_slice(&WEAK_POINT);
    }
    draws
}

#[test]
fn three_by_three_scenario_flows_through_every_engine() {
    let dims = GridDimensions::new(3, 3).expect("valid dims");
    let sampler = GridSampler::default();
    let mut source = SequenceSource::new(scripted_three_by_three());
    let grid = sampler.generate(dims, &[], &mut source);

    let metrics = compute_metrics(&grid).expect("non-empty grid");
    // Average map rank covers only the three visible points.
    assert_eq!(metrics.average_map_rank, Some(2.0));
    assert_eq!(metrics.share_of_local_voice, 33.3);
    assert_eq!(metrics.percentile, PercentileBand::BelowAverage);
    assert_eq!(
        metrics.percentile.label(),
        "25th percentile - Below Average"
    );

    // Six of nine points are weak, well past the 30% coverage threshold.
    let recommendations = generate_recommendations(&grid, &[], &[]);
    assert_eq!(recommendations.len(), 1);
    assert_eq!(
        recommendations[0].category,
        RecommendationCategory::Optimization
    );
    assert!(recommendations[0].description.starts_with("6 grid points"));
}

#[test]
fn seeded_run_produces_a_complete_white_label_report() {
    let dims = GridDimensions::new(5, 5).expect("valid dims");
    let sampler = GridSampler::default();
    let competitors = vec![
        Competitor::new("Sparkle Crew"),
        Competitor::new("Maid Marian"),
    ];
    let keywords = vec![Keyword {
        term: "house cleaning kansas city".to_owned(),
        average_rank: 9.0,
        visibility: 22.0,
    }];

    let grid = sampler.generate(dims, &competitors, &mut SeededSampler::from_seed(99));
    let metrics = compute_metrics(&grid).expect("non-empty grid");
    let standings = competitor_analysis(&grid, &competitors);
    assert_eq!(standings.len(), 2);
    for standing in &standings {
        assert!(standing.average_rank.is_some());
    }

    let mut history = HistoryTracker::new();
    history
        .synthesize_series(30, report_day())
        .expect("fresh tracker accepts the series");

    let mut shares = ShareLinkRegistry::new("https://heatmappro.com");
    let mut widgets = WidgetRegistry::new();
    let now = Utc
        .with_ymd_and_hms(2026, 8, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    let widget = widgets.create(WidgetOptions::default(), now);
    let link = shares.create(
        serde_json::json!({ "solv": metrics.share_of_local_voice }),
        None,
        now,
    );

    let report = build_white_label_report(ReportInputs {
        branding: &ClientBranding::default(),
        business_name: "Victory Cleaning Services",
        today: report_day(),
        dims,
        grid: &grid,
        metrics: &metrics,
        standings: &standings,
        keywords: &keywords,
        history: &history,
        share_url: Some(link.url.clone()),
        widget_id: Some(widget.id.clone()),
    });

    assert_eq!(report.grid_size, "5x5");
    assert_eq!(report.total_points, 25);
    assert_eq!(report.history.total_days, 30);
    assert_eq!(report.competitor_analysis.len(), 2);
    assert_eq!(report.share_url.as_deref(), Some(link.url.as_str()));
    assert_eq!(report.widget_id.as_deref(), Some(widget.id.as_str()));

    // The report serializes cleanly for the rendering layer.
    let value = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(value["business_name"], "Victory Cleaning Services");
    assert_eq!(value["export_formats"][1], "CSV");
}

#[test]
fn export_payload_matches_grid_and_renders_csv() {
    let dims = GridDimensions::new(4, 4).expect("valid dims");
    let sampler = GridSampler::default();
    let grid = sampler.generate(dims, &[], &mut SeededSampler::from_seed(7));
    let metrics = compute_metrics(&grid).expect("non-empty grid");

    let generated_at = Utc
        .with_ymd_and_hms(2026, 8, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp");
    let export = build_analytics_export(
        generated_at,
        "Victory Cleaning Services",
        dims,
        &grid,
        &metrics,
        &[],
    )
    .expect("non-empty grid");

    assert_eq!(export.grid_points.len(), 16);
    assert_eq!(export.top_three_appearances, metrics.visibility.appearances);
    assert!(export.average_rank >= 1.0 && export.average_rank <= 20.0);

    let csv = render_points_csv(&export).expect("csv renders");
    assert_eq!(csv.trim_end().lines().count(), 17);
}

#[test]
fn metrics_view_formats_the_unavailable_sentinel() {
    let dims = GridDimensions::new(2, 2).expect("valid dims");
    let sampler = GridSampler::default();
    // Every visibility draw misses the 0.7 rate.
    let mut source = SequenceSource::new(vec![0.5, 0.95]);
    let grid = sampler.generate(dims, &[], &mut source);

    let metrics = compute_metrics(&grid).expect("non-empty grid");
    assert_eq!(metrics.average_map_rank, None);

    let view = MetricsView::from_snapshot(&metrics);
    assert_eq!(view.average_map_rank_label, "N/A");
}
