use crate::infra::parse_date;
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use geogrid::error::AppError;
use geogrid::tracking::domain::{Competitor, GridDimensions, GridPoint, Keyword};
use geogrid::tracking::grid::{GridSampler, SampleSource, SeededSampler};
use geogrid::tracking::metrics::{CompetitorStanding, MetricsSnapshot};
use geogrid::tracking::recommendations::Recommendation;
use geogrid::tracking::report::views::format_rank;
use geogrid::tracking::report::{build_white_label_report, ClientBranding, ReportInputs};
use geogrid::tracking::share::{ShareLinkRegistry, WidgetOptions, WidgetRegistry};
use geogrid::tracking::{
    compute_metrics, competitor_analysis, generate_recommendations, HistoryTracker,
};

#[derive(Args, Debug, Default)]
pub(crate) struct GridReportArgs {
    /// Grid size as an RxC descriptor (defaults to 5x5)
    #[arg(long)]
    pub(crate) grid_size: Option<String>,
    /// Seed for the sample source; omitted means a fresh entropy draw
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Competitor to track; repeat the flag for several
    #[arg(long = "competitor")]
    pub(crate) competitors: Vec<String>,
    /// Include the full point list in the output
    #[arg(long)]
    pub(crate) list_points: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the sample source (defaults to 42 so runs are comparable)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Days of synthetic history to backfill
    #[arg(long, default_value_t = 30)]
    pub(crate) history_days: usize,
    /// Skip the share-link and widget portion of the demo
    #[arg(long)]
    pub(crate) skip_share: bool,
}

pub(crate) fn run_grid_report(args: GridReportArgs) -> Result<(), AppError> {
    let GridReportArgs {
        grid_size,
        seed,
        competitors,
        list_points,
    } = args;

    let dims: GridDimensions = grid_size.as_deref().unwrap_or("5x5").parse()?;
    let competitors: Vec<Competitor> = competitors.into_iter().map(Competitor::new).collect();

    let sampler = GridSampler::default();
    let mut source = seeded_source(seed);
    let grid = sampler.generate(dims, &competitors, source.as_mut());

    let metrics = compute_metrics(&grid)?;
    let standings = competitor_analysis(&grid, &competitors);
    let recommendations = generate_recommendations(&grid, &standings, &[]);

    render_grid_report(&sampler, dims, seed, &metrics, &standings, &recommendations);

    if list_points {
        render_point_list(&grid);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        today,
        history_days,
        skip_share,
    } = args;

    let seed = seed.or(Some(42));
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let dims: GridDimensions = "5x5".parse()?;

    let competitors = vec![
        Competitor::new("Sparkle Crew"),
        Competitor::new("Maid Marian"),
    ];
    let keywords = vec![
        Keyword {
            term: "house cleaning kansas city".to_owned(),
            average_rank: 9.0,
            visibility: 22.0,
        },
        Keyword {
            term: "office cleaning".to_owned(),
            average_rank: 4.5,
            visibility: 58.0,
        },
    ];

    println!("Geo-grid analytics demo");

    let sampler = GridSampler::default();
    let mut source = seeded_source(seed);
    let grid = sampler.generate(dims, &competitors, source.as_mut());
    let metrics = compute_metrics(&grid)?;
    let standings = competitor_analysis(&grid, &competitors);
    let recommendations = generate_recommendations(&grid, &standings, &keywords);

    render_grid_report(&sampler, dims, seed, &metrics, &standings, &recommendations);

    let mut history = HistoryTracker::new();
    history.synthesize_series(history_days, today)?;
    println!("\nHistory ({} synthetic days ending {today})", history.len());
    println!("- Trend: {}", history.trend_direction().label());
    match history.best_performing_day() {
        Some(day) => println!("- Best performing day: {day}"),
        None => println!("- Best performing day: N/A"),
    }
    if let Some(current) = history.current_metrics() {
        println!(
            "- Latest average map rank: {}",
            format_rank(current.average_map_rank)
        );
    }

    if skip_share {
        return Ok(());
    }

    println!("\nSharing");
    let now = Utc::now();
    let mut shares = ShareLinkRegistry::new("https://heatmappro.com");
    let mut widgets = WidgetRegistry::new();
    let widget = widgets.create(WidgetOptions::default(), now);
    println!(
        "- Widget {} ({} theme, refresh {})",
        widget.id,
        widget.styling.theme,
        widget.update_frequency.label()
    );

    let report = build_white_label_report(ReportInputs {
        branding: &ClientBranding::default(),
        business_name: "Victory Cleaning Services",
        today,
        dims,
        grid: &grid,
        metrics: &metrics,
        standings: &standings,
        keywords: &keywords,
        history: &history,
        share_url: None,
        widget_id: Some(widget.id.clone()),
    });

    let payload = match serde_json::to_value(&report) {
        Ok(payload) => payload,
        Err(err) => {
            println!("- Report payload unavailable: {err}");
            return Ok(());
        }
    };
    let link = shares.create(payload, None, now);
    println!("- Share link: {} (expires {})", link.url, link.expires_at.date_naive());

    let viewed = shares.record_view(&link.id, now)?;
    println!("- Views after first visit: {}", viewed.views);

    match serde_json::to_string_pretty(&report.current_metrics) {
        Ok(json) => println!("\nCurrent metrics payload:\n{json}"),
        Err(err) => println!("\nCurrent metrics payload unavailable: {err}"),
    }

    Ok(())
}

fn seeded_source(seed: Option<u64>) -> Box<dyn SampleSource> {
    match seed {
        Some(seed) => Box::new(SeededSampler::from_seed(seed)),
        None => Box::new(SeededSampler::from_entropy()),
    }
}

fn render_grid_report(
    sampler: &GridSampler,
    dims: GridDimensions,
    seed: Option<u64>,
    metrics: &MetricsSnapshot,
    standings: &[CompetitorStanding],
    recommendations: &[Recommendation],
) {
    let center = sampler.center();
    println!(
        "Grid {} ({} points), centered on {:.4},{:.4}",
        dims.label(),
        dims.point_count(),
        center.lat,
        center.lng
    );
    match seed {
        Some(seed) => println!("Sample source: seeded ({seed})"),
        None => println!("Sample source: entropy"),
    }

    println!("\nMetrics");
    println!(
        "- Average map rank: {}",
        format_rank(metrics.average_map_rank)
    );
    println!(
        "- Share of local voice: {}% ({}/{} in the local pack)",
        metrics.share_of_local_voice,
        metrics.visibility.appearances,
        metrics.visibility.total_points
    );
    println!("- Benchmark: {}", metrics.percentile.label());

    if standings.is_empty() {
        println!("\nCompetitor standings: none tracked");
    } else {
        println!("\nCompetitor standings");
        for standing in standings {
            println!(
                "- {}: avg rank {}, visible at {} point(s)",
                standing.name,
                format_rank(standing.average_rank),
                standing.visibility
            );
        }
    }

    if recommendations.is_empty() {
        println!("\nRecommendations: none");
    } else {
        println!("\nRecommendations");
        for recommendation in recommendations {
            println!(
                "- [{}] {}: {} ({})",
                recommendation.priority.label(),
                recommendation.title,
                recommendation.description,
                recommendation.impact
            );
        }
    }
}

fn render_point_list(grid: &[GridPoint]) {
    println!("\nPoint list (row-major)");
    for point in grid {
        println!(
            "- ({},{}) {:.4},{:.4} rank {} {}",
            point.row,
            point.col,
            point.position.lat,
            point.position.lng,
            point.rank,
            if point.visible { "visible" } else { "hidden" }
        );
    }
}
