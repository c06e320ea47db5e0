//! Window computation, offline.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use rota_config::Config;
use rota_core::{NavigationState, ViewType, WeekStart};

use crate::cli::{GlobalOpts, RangeArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowView {
    title: String,
    view: ViewType,
    week_start: WeekStart,
    timezone: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl From<&NavigationState> for WindowView {
    fn from(nav: &NavigationState) -> Self {
        let range = nav.range();
        Self {
            title: nav.title(),
            view: nav.view,
            week_start: nav.week_start,
            timezone: nav.timezone.name().to_owned(),
            start: range.start(),
            end: range.end(),
        }
    }
}

fn detail(w: &WindowView) -> String {
    let ts = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        "{}\n  View:       {}\n  Week start: {}\n  Timezone:   {}\n  Start:      {}\n  End:        {}",
        w.title,
        w.view,
        w.week_start,
        w.timezone,
        ts(w.start),
        ts(w.end),
    )
}

pub fn handle(args: &RangeArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let prefs = super::window_preferences(cfg, &args.window)?;
    let nav = NavigationState::new(
        super::anchor_date(&args.window, &prefs),
        prefs.default_view,
        prefs.week_starts_on,
        prefs.timezone,
    );

    let view = WindowView::from(&nav);
    let out = output::render_single(&global.output, &view, detail, |w| w.title.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
