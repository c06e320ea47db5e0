//! Command dispatch: bridges CLI args -> core queries -> output formatting.

pub mod config_cmd;
pub mod events;
pub mod range;

use chrono::{NaiveDate, Utc};

use rota_config::Config;
use rota_core::Preferences;
use rota_core::navigation::today_in;

use crate::cli::{Command, GlobalOpts, WindowArgs};
use crate::error::CliError;

/// Dispatch a calendar command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Events(args) => events::handle(args, cfg, global).await,
        Command::Range(args) => range::handle(&args, cfg, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Display preferences from the config file, overridden by window flags.
pub(crate) fn window_preferences(cfg: &Config, window: &WindowArgs) -> Result<Preferences, CliError> {
    let mut prefs = rota_config::to_preferences(cfg)?;
    if let Some(view) = window.view {
        prefs.default_view = view;
    }
    if let Some(week_start) = window.week_start {
        prefs.week_starts_on = week_start;
    }
    if let Some(ref tz) = window.timezone {
        prefs.timezone = rota_config::parse_timezone(tz).map_err(|_| CliError::Validation {
            field: "--timezone".into(),
            reason: format!("unknown timezone {tz:?}"),
        })?;
    }
    Ok(prefs)
}

/// The requested date, or today in the display timezone.
pub(crate) fn anchor_date(window: &WindowArgs, prefs: &Preferences) -> NaiveDate {
    window
        .date
        .unwrap_or_else(|| today_in(prefs.timezone, Utc::now()))
}
