// ── Runtime configuration ──
//
// These types describe how a controller behaves: cache tuning and display
// preferences. They never touch disk; `rota-config` (or a test) builds
// them and hands them in.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{CalendarFilters, ColorScheme, ViewType, WeekStart};

/// Cache and refresh tuning for a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Lifetime of a cached query result.
    pub cache_ttl: Duration,
    /// How often expired cache entries are swept.
    pub sweep_interval: Duration,
    /// Re-fetch the visible window on this interval. `None` disables it.
    pub refresh_interval: Option<Duration>,
    /// Filters applied before the first query.
    pub initial_filters: CalendarFilters,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(60),
            refresh_interval: None,
            initial_filters: CalendarFilters::default(),
        }
    }
}

/// User-facing display preferences. Persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub week_starts_on: WeekStart,
    pub timezone: Tz,
    pub default_view: ViewType,
    pub color_scheme: ColorScheme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            week_starts_on: WeekStart::Monday,
            timezone: Tz::UTC,
            default_view: ViewType::Month,
            color_scheme: ColorScheme::Default,
        }
    }
}
