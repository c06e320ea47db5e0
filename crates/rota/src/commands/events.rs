//! Event listing.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tabled::Tabled;

use rota_api::CalendarClient;
use rota_config::Config;
use rota_core::{
    Attr, CalendarEvent, ColorScheme, Controller, CoreError, EventKind, FileStore, FilterDelta,
};

use crate::cli::{EventsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Who")]
    who: String,
    #[tabled(rename = "Details")]
    details: String,
}

fn when(at: DateTime<Utc>, all_day: bool, tz: Tz) -> String {
    let local = at.with_timezone(&tz);
    if all_day {
        local.format("%a %d/%m").to_string()
    } else {
        local.format("%a %d/%m %H:%M").to_string()
    }
}

fn details(event: &CalendarEvent) -> String {
    let place = |r: Attr<&rota_core::NamedRef>| {
        r.value()
            .map(|r| r.name.clone().unwrap_or_else(|| r.id.clone()))
    };

    match event.kind {
        EventKind::Leave {
            ref leave_type,
            status,
            ..
        } => format!("{leave_type} · {status}"),
        EventKind::Holiday {
            is_national,
            ref regions,
        } => {
            if is_national {
                "national".into()
            } else {
                regions.join(", ")
            }
        }
        EventKind::Training { ref trainer, .. } => [place(event.kind.location()), trainer.clone()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · "),
        _ => [place(event.kind.location()), place(event.kind.team())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · "),
    }
}

fn to_row(event: &CalendarEvent, tz: Tz, scheme: ColorScheme, color: bool) -> EventRow {
    let event_type = event.event_type();
    EventRow {
        start: when(event.start, event.all_day, tz),
        end: when(event.end, event.all_day, tz),
        kind: output::paint_type(event_type.as_ref(), event_type, scheme, color),
        title: event.title.clone(),
        who: event
            .user
            .as_ref()
            .map(rota_core::UserRef::full_name)
            .unwrap_or_default(),
        details: details(event),
    }
}

fn filter_delta(args: &EventsArgs) -> FilterDelta {
    let mut delta = FilterDelta::none()
        .event_types(args.types.iter().copied())
        .user_ids(args.users.iter().cloned())
        .user_roles(args.roles.iter().cloned())
        .leave_types(args.leave_types.iter().cloned())
        .leave_statuses(args.statuses.iter().copied())
        .location_ids(args.locations.iter().cloned())
        .team_ids(args.teams.iter().cloned())
        .specialty_ids(args.specialties.iter().cloned());
    if let Some(ref term) = args.search {
        delta = delta.search(term.clone());
    }
    delta
}

// ── Controller setup ────────────────────────────────────────────────

fn build_controller(args: &EventsArgs, cfg: &Config, global: &GlobalOpts) -> Result<Controller, CliError> {
    let mut cfg = cfg.clone();
    if let Some(ref server) = global.server {
        cfg.data_source.url.clone_from(server);
    }

    let url = rota_config::base_url(&cfg)?;
    let mut transport = rota_config::to_transport_config(&cfg)?;
    if let Some(secs) = global.timeout {
        transport.timeout = Duration::from_secs(secs);
    }
    let client = CalendarClient::new(url.as_str(), &transport).map_err(CoreError::from)?;

    let prefs = super::window_preferences(&cfg, &args.window)?;
    let mut config = rota_config::to_controller_config(&cfg)?;
    config.refresh_interval = None;

    let mut builder = Controller::builder(Arc::new(client))
        .config(config)
        .preferences(prefs)
        .persist_preferences(false)
        .anchor(super::anchor_date(&args.window, &prefs));
    if cfg.cache.persist {
        builder = builder.persistence(Arc::new(FileStore::new(rota_config::state_dir())));
    }
    Ok(builder.build())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: EventsArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let controller = build_controller(&args, cfg, global)?;
    controller.start().await?;

    let mut snap = controller.query(filter_delta(&args)).await;
    if args.refresh && snap.as_ref().is_ok_and(|s| s.cache_hit) {
        snap = controller.refresh(false).await;
    }
    controller.shutdown().await;

    let snap = snap?;
    if let Some(ref err) = snap.error {
        return Err(err.clone().into());
    }
    tracing::debug!(
        events = snap.events.len(),
        shown = snap.filtered_events.len(),
        cache_hit = snap.cache_hit,
        "query complete"
    );

    let tz = snap.navigation.timezone;
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        snap.filtered_events.as_slice(),
        |e| to_row(e, tz, snap.color_scheme, color),
        |e| e.id.clone(),
    )?;

    if matches!(global.output, crate::cli::OutputFormat::Table) {
        if snap.filtered_events.is_empty() {
            output::print_output(&format!("No events in {}", snap.title()), global.quiet);
            return Ok(());
        }
        output::print_output(&snap.title(), global.quiet);
    }
    output::print_output(&out, global.quiet);
    Ok(())
}
