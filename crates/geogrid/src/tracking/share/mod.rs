mod domain;
mod registry;

pub use domain::{
    ShareLink, UpdateFrequency, WidgetConfig, WidgetOptions, WidgetStyling,
    DEFAULT_EXPIRATION_DAYS, DEFAULT_WIDGET_COLORS, DEFAULT_WIDGET_THEME,
};
pub use registry::{ShareError, ShareLinkRegistry, WidgetRegistry};
