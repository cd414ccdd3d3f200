use crate::infra::{deserialize_optional_date, sample_grid, AppState, GridSpecRequest};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate, Utc};
use geogrid::error::AppError;
use geogrid::tracking::report::views::{GridPointView, RecommendationView};
use geogrid::tracking::report::{
    build_analytics_export, build_white_label_report, render_points_csv, ClientBranding,
    ReportInputs, WhiteLabelReport,
};
use geogrid::tracking::share::{ShareLink, WidgetConfig, WidgetOptions};
use geogrid::tracking::{compute_metrics, competitor_analysis, generate_recommendations, HistoryTracker};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(crate) const DEFAULT_BUSINESS_NAME: &str = "Victory Cleaning Services";

#[derive(Debug, Deserialize)]
pub(crate) struct GridReportRequest {
    #[serde(flatten)]
    pub(crate) grid: GridSpecRequest,
    pub(crate) business_name: Option<String>,
    pub(crate) branding: Option<ClientBranding>,
    /// Number of synthetic history days to backfill for the trend section.
    pub(crate) history_days: Option<usize>,
    #[serde(default)]
    pub(crate) include_points: bool,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GridReportResponse {
    pub(crate) today: NaiveDate,
    pub(crate) report: WhiteLabelReport,
    pub(crate) recommendations: Vec<RecommendationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) points: Option<Vec<GridPointView>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GridExportRequest {
    #[serde(flatten)]
    pub(crate) grid: GridSpecRequest,
    pub(crate) business_name: Option<String>,
    #[serde(default)]
    pub(crate) format: ExportFormat,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareCreateRequest {
    pub(crate) report: serde_json::Value,
    pub(crate) expiration_days: Option<i64>,
}

pub(crate) fn router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/grid/report",
            axum::routing::post(grid_report_endpoint),
        )
        .route(
            "/api/v1/grid/export",
            axum::routing::post(grid_export_endpoint),
        )
        .route("/api/v1/share", axum::routing::post(create_share_endpoint))
        .route("/api/v1/share/:id", axum::routing::get(get_share_endpoint))
        .route("/api/v1/widget", axum::routing::post(create_widget_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn grid_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<GridReportRequest>,
) -> Result<Json<GridReportResponse>, AppError> {
    let GridReportRequest {
        grid: spec,
        business_name,
        branding,
        history_days,
        include_points,
        today,
    } = payload;

    let sampled = sample_grid(&spec, &state.grid_defaults)?;
    let metrics = compute_metrics(&sampled.grid)?;
    let standings = competitor_analysis(&sampled.grid, &sampled.competitors);
    let recommendations = generate_recommendations(&sampled.grid, &standings, &sampled.keywords);

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mut history = HistoryTracker::new();
    if let Some(days) = history_days {
        history.synthesize_series(days, today)?;
    }

    let now = Utc::now();
    let widget = state
        .widgets
        .lock()
        .expect("widget registry mutex poisoned")
        .create(WidgetOptions::default(), now);
    let share_link = state
        .shares
        .lock()
        .expect("share registry mutex poisoned")
        .create(
            json!({
                "grid_size": sampled.dims.label(),
                "share_of_local_voice": metrics.share_of_local_voice,
                "average_map_rank": metrics.average_map_rank,
            }),
            None,
            now,
        );

    let branding = branding.unwrap_or_default();
    let business_name = business_name.unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_owned());
    let report = build_white_label_report(ReportInputs {
        branding: &branding,
        business_name: &business_name,
        today,
        dims: sampled.dims,
        grid: &sampled.grid,
        metrics: &metrics,
        standings: &standings,
        keywords: &sampled.keywords,
        history: &history,
        share_url: Some(share_link.url),
        widget_id: Some(widget.id),
    });

    let points = if include_points {
        Some(sampled.grid.iter().map(GridPointView::from_point).collect())
    } else {
        None
    };

    Ok(Json(GridReportResponse {
        today,
        report,
        recommendations: recommendations
            .iter()
            .map(RecommendationView::from_recommendation)
            .collect(),
        points,
    }))
}

pub(crate) async fn grid_export_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<GridExportRequest>,
) -> Result<Response, AppError> {
    let GridExportRequest {
        grid: spec,
        business_name,
        format,
    } = payload;

    let sampled = sample_grid(&spec, &state.grid_defaults)?;
    let metrics = compute_metrics(&sampled.grid)?;
    let export = build_analytics_export(
        Utc::now(),
        &business_name.unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_owned()),
        sampled.dims,
        &sampled.grid,
        &metrics,
        &sampled.keywords,
    )?;

    match format {
        ExportFormat::Json => Ok(Json(export).into_response()),
        ExportFormat::Csv => {
            let body = render_points_csv(&export)?;
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv")],
                body,
            )
                .into_response())
        }
    }
}

pub(crate) async fn create_share_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ShareCreateRequest>,
) -> Json<ShareLink> {
    let link = state
        .shares
        .lock()
        .expect("share registry mutex poisoned")
        .create(payload.report, payload.expiration_days, Utc::now());
    Json(link)
}

pub(crate) async fn get_share_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShareLink>, AppError> {
    let mut shares = state.shares.lock().expect("share registry mutex poisoned");
    let link = shares.record_view(&id, Utc::now())?;
    Ok(Json(link.clone()))
}

pub(crate) async fn create_widget_endpoint(
    Extension(state): Extension<AppState>,
    Json(options): Json<WidgetOptions>,
) -> Json<WidgetConfig> {
    let widget = state
        .widgets
        .lock()
        .expect("widget registry mutex poisoned")
        .create(options, Utc::now());
    Json(widget)
}
