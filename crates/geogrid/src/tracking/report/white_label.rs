use super::super::domain::{GridDimensions, GridPoint, Keyword};
use super::super::history::HistoryTracker;
use super::super::metrics::{CompetitorStanding, MetricsSnapshot};
use super::views::{format_day, CompetitorStandingView, HistorySummaryView, MetricsView};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const DEFAULT_CLIENT_NAME: &str = "Client Name";
const DEFAULT_AGENCY_NAME: &str = "Your Agency";
const REPORT_PERIOD_DAYS: i64 = 30;

/// Export formats offered alongside every white-label report.
pub const EXPORT_FORMATS: [&str; 4] = ["PDF", "CSV", "PNG", "GIF"];

/// Advisory copy surfaced in the history summary until a real opportunity
/// miner exists.
const IMPROVEMENT_OPPORTUNITIES: [&str; 3] = [
    "Optimize for 3 underperforming grid points in the northwest area",
    "Increase local citation consistency across 5 directories",
    "Target competitor weak spots in the downtown district",
];

/// Agency branding applied to resalable reports. Every field is optional;
/// omitted values fall back to placeholder copy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientBranding {
    pub logo: Option<String>,
    pub name: Option<String>,
    pub agency: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything the assembler reads when composing a white-label report. All
/// values are already computed; assembly only shapes output.
pub struct ReportInputs<'a> {
    pub branding: &'a ClientBranding,
    pub business_name: &'a str,
    pub today: NaiveDate,
    pub dims: GridDimensions,
    pub grid: &'a [GridPoint],
    pub metrics: &'a MetricsSnapshot,
    pub standings: &'a [CompetitorStanding],
    pub keywords: &'a [Keyword],
    pub history: &'a HistoryTracker,
    pub share_url: Option<String>,
    pub widget_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhiteLabelReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_logo: Option<String>,
    pub client_name: String,
    pub agency_name: String,
    pub business_name: String,
    pub report_period: ReportPeriod,
    pub grid_size: String,
    pub total_points: usize,
    pub visible_points: usize,
    pub current_metrics: MetricsView,
    pub competitor_analysis: Vec<CompetitorStandingView>,
    pub keywords: Vec<Keyword>,
    pub history: HistorySummaryView,
    pub export_formats: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
}

pub fn build_white_label_report(inputs: ReportInputs<'_>) -> WhiteLabelReport {
    let ReportInputs {
        branding,
        business_name,
        today,
        dims,
        grid,
        metrics,
        standings,
        keywords,
        history,
        share_url,
        widget_id,
    } = inputs;

    let trend = history.trend_direction();
    let best_day = history.best_performing_day();

    WhiteLabelReport {
        client_logo: branding.logo.clone(),
        client_name: branding
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_owned()),
        agency_name: branding
            .agency
            .clone()
            .unwrap_or_else(|| DEFAULT_AGENCY_NAME.to_owned()),
        business_name: business_name.to_owned(),
        report_period: ReportPeriod {
            start: today - Duration::days(REPORT_PERIOD_DAYS),
            end: today,
        },
        grid_size: dims.label(),
        total_points: grid.len(),
        visible_points: grid.iter().filter(|point| point.visible).count(),
        current_metrics: MetricsView::from_snapshot(metrics),
        competitor_analysis: standings
            .iter()
            .map(CompetitorStandingView::from_standing)
            .collect(),
        keywords: keywords.to_vec(),
        history: HistorySummaryView {
            total_days: history.len(),
            trend,
            trend_label: trend.label(),
            best_performing_day: best_day,
            best_performing_day_label: format_day(best_day),
            improvement_opportunities: IMPROVEMENT_OPPORTUNITIES.to_vec(),
        },
        export_formats: EXPORT_FORMATS.to_vec(),
        share_url,
        widget_id,
    }
}
