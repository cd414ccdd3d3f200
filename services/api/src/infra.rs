use chrono::NaiveDate;
use geogrid::config::GridDefaults;
use geogrid::error::AppError;
use geogrid::tracking::domain::{Competitor, GridDimensions, GridPoint, Keyword, LatLng};
use geogrid::tracking::grid::{
    GridSampler, SampleSource, SeededSampler, DEFAULT_CENTER, DEFAULT_SPACING_DEG,
    DEFAULT_VISIBILITY_RATE,
};
use geogrid::tracking::share::{ShareLinkRegistry, WidgetRegistry};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) grid_defaults: GridDefaults,
    pub(crate) shares: Arc<Mutex<ShareLinkRegistry>>,
    pub(crate) widgets: Arc<Mutex<WidgetRegistry>>,
}

/// Grid geometry and sampling inputs shared by the report and export
/// endpoints. Explicit rows/cols win over the legacy "RxC" descriptor.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GridSpecRequest {
    pub(crate) grid_size: Option<String>,
    pub(crate) rows: Option<usize>,
    pub(crate) cols: Option<usize>,
    pub(crate) center_lat: Option<f64>,
    pub(crate) center_lng: Option<f64>,
    pub(crate) spacing_deg: Option<f64>,
    pub(crate) visibility_rate: Option<f64>,
    /// Fixes the sample source for reproducible runs; omitted means entropy.
    pub(crate) seed: Option<u64>,
    #[serde(default)]
    pub(crate) competitors: Vec<String>,
    #[serde(default)]
    pub(crate) keywords: Vec<KeywordRequest>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeywordRequest {
    pub(crate) term: String,
    pub(crate) average_rank: f64,
    pub(crate) visibility: f64,
}

pub(crate) struct SampledGrid {
    pub(crate) dims: GridDimensions,
    pub(crate) grid: Vec<GridPoint>,
    pub(crate) competitors: Vec<Competitor>,
    pub(crate) keywords: Vec<Keyword>,
}

pub(crate) fn sample_grid(
    spec: &GridSpecRequest,
    defaults: &GridDefaults,
) -> Result<SampledGrid, AppError> {
    let dims = match (spec.rows, spec.cols) {
        (Some(rows), Some(cols)) => GridDimensions::new(rows, cols)?,
        _ => match &spec.grid_size {
            Some(descriptor) => descriptor.parse()?,
            None => defaults.dimensions,
        },
    };

    let center = LatLng::new(
        spec.center_lat.unwrap_or(DEFAULT_CENTER.lat),
        spec.center_lng.unwrap_or(DEFAULT_CENTER.lng),
    );
    let sampler = GridSampler::new(
        center,
        spec.spacing_deg.unwrap_or(DEFAULT_SPACING_DEG),
        spec.visibility_rate.unwrap_or(DEFAULT_VISIBILITY_RATE),
    );

    let competitors: Vec<Competitor> = spec
        .competitors
        .iter()
        .map(|name| Competitor::new(name.clone()))
        .collect();
    let keywords: Vec<Keyword> = spec
        .keywords
        .iter()
        .map(|keyword| Keyword {
            term: keyword.term.clone(),
            average_rank: keyword.average_rank,
            visibility: keyword.visibility,
        })
        .collect();

    let mut source: Box<dyn SampleSource> = match spec.seed {
        Some(seed) => Box::new(SeededSampler::from_seed(seed)),
        None => Box::new(SeededSampler::from_entropy()),
    };
    let grid = sampler.generate(dims, &competitors, source.as_mut());

    Ok(SampledGrid {
        dims,
        grid,
        competitors,
        keywords,
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
