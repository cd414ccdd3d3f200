mod export;
mod white_label;
pub mod views;

pub use export::{build_analytics_export, render_points_csv, AnalyticsExport, ExportError, ExportPoint};
pub use white_label::{
    build_white_label_report, ClientBranding, ReportInputs, ReportPeriod, WhiteLabelReport,
    EXPORT_FORMATS,
};
