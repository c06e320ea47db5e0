// ── Calendar navigation ──
//
// Pure date arithmetic: given an anchor date, a view and the first day of
// the week, compute the visible window and step it forwards or backwards.
// Windows are computed on local calendar dates in the configured timezone
// and converted to UTC instants at the edges.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{DateRange, ViewType, WeekStart};

/// Compute the visible window for `anchor` in UTC.
pub fn compute_range(anchor: NaiveDate, view: ViewType, week_start: WeekStart) -> DateRange {
    compute_range_in(anchor, view, week_start, Tz::UTC)
}

/// Compute the visible window for `anchor`, with day boundaries taken in `tz`.
///
/// The window runs from local midnight on the first day of the period to
/// one millisecond before local midnight on the first day of the next.
pub fn compute_range_in(anchor: NaiveDate, view: ViewType, week_start: WeekStart, tz: Tz) -> DateRange {
    let (first, next_first) = period_bounds(anchor, view, week_start);
    let start = local_midnight(tz, first);
    let end = local_midnight(tz, next_first) - TimeDelta::milliseconds(1);
    DateRange::spanning(start, end)
}

/// Advance `anchor` by one view-specific unit.
pub fn step_forward(anchor: NaiveDate, view: ViewType) -> NaiveDate {
    match view {
        ViewType::Day => anchor.checked_add_days(Days::new(1)),
        ViewType::Week | ViewType::Timeline => anchor.checked_add_days(Days::new(7)),
        ViewType::Month | ViewType::List => anchor.checked_add_months(Months::new(1)),
    }
    .unwrap_or(anchor)
}

/// Move `anchor` back by one view-specific unit.
pub fn step_back(anchor: NaiveDate, view: ViewType) -> NaiveDate {
    match view {
        ViewType::Day => anchor.checked_sub_days(Days::new(1)),
        ViewType::Week | ViewType::Timeline => anchor.checked_sub_days(Days::new(7)),
        ViewType::Month | ViewType::List => anchor.checked_sub_months(Months::new(1)),
    }
    .unwrap_or(anchor)
}

/// The local calendar date of `now` in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// First day of the period containing `anchor`, and first day of the next.
fn period_bounds(anchor: NaiveDate, view: ViewType, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    match view {
        ViewType::Day => (anchor, step_forward(anchor, ViewType::Day)),
        ViewType::Week | ViewType::Timeline => {
            let offset = (anchor.weekday().num_days_from_monday() + 7
                - week_start.weekday().num_days_from_monday())
                % 7;
            let first = anchor
                .checked_sub_days(Days::new(u64::from(offset)))
                .unwrap_or(anchor);
            (first, step_forward(first, ViewType::Week))
        }
        ViewType::Month | ViewType::List => {
            let first = anchor.with_day(1).unwrap_or(anchor);
            (first, step_forward(first, ViewType::Month))
        }
    }
}

/// Midnight at the start of `date` in `tz`.
///
/// Ambiguous midnights (clocks going back) resolve to the earlier instant;
/// midnights skipped by a DST gap resolve to the first valid hour.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    for hour in 0..=3 {
        let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
            continue;
        };
        match tz.from_local_datetime(&date.and_time(time)) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => {
                return t.with_timezone(&Utc);
            }
            LocalResult::None => {}
        }
    }
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

// ── NavigationState ─────────────────────────────────────────────────

/// Where the calendar is looking: anchor date, view and week/timezone
/// preferences. Every transition returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub anchor: NaiveDate,
    pub view: ViewType,
    pub week_start: WeekStart,
    pub timezone: Tz,
}

impl NavigationState {
    pub fn new(anchor: NaiveDate, view: ViewType, week_start: WeekStart, timezone: Tz) -> Self {
        Self {
            anchor,
            view,
            week_start,
            timezone,
        }
    }

    /// The visible window.
    pub fn range(&self) -> DateRange {
        compute_range_in(self.anchor, self.view, self.week_start, self.timezone)
    }

    pub fn next(self) -> Self {
        Self {
            anchor: step_forward(self.anchor, self.view),
            ..self
        }
    }

    pub fn previous(self) -> Self {
        Self {
            anchor: step_back(self.anchor, self.view),
            ..self
        }
    }

    /// Jump to `today`, keeping the view.
    pub fn today(self, today: NaiveDate) -> Self {
        Self {
            anchor: today,
            ..self
        }
    }

    /// Switch view, holding the anchor.
    pub fn with_view(self, view: ViewType) -> Self {
        Self { view, ..self }
    }

    pub fn with_anchor(self, anchor: NaiveDate) -> Self {
        Self { anchor, ..self }
    }

    pub fn with_week_start(self, week_start: WeekStart) -> Self {
        Self { week_start, ..self }
    }

    pub fn with_timezone(self, timezone: Tz) -> Self {
        Self { timezone, ..self }
    }

    /// Human-readable label for the visible window.
    pub fn title(&self) -> String {
        let (first, next_first) = period_bounds(self.anchor, self.view, self.week_start);
        let last = next_first.pred_opt().unwrap_or(first);
        match self.view {
            ViewType::Month => first.format("%B %Y").to_string(),
            ViewType::Day => first.format("%A %-d %B %Y").to_string(),
            ViewType::Week => week_title(first, last),
            ViewType::List | ViewType::Timeline => {
                format!("{} - {}", first.format("%d/%m/%Y"), last.format("%d/%m/%Y"))
            }
        }
    }
}

fn week_title(first: NaiveDate, last: NaiveDate) -> String {
    if first.year() != last.year() {
        format!("{} - {}", first.format("%-d %B %Y"), last.format("%-d %B %Y"))
    } else if first.month() != last.month() {
        format!("{} - {}", first.format("%-d %B"), last.format("%-d %B %Y"))
    } else {
        format!("{} - {}", first.format("%-d"), last.format("%-d %B %Y"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn day_range_covers_whole_day() {
        let range = compute_range(date(2024, 3, 14), ViewType::Day, WeekStart::Monday);
        assert_eq!(range.start(), utc(2024, 3, 14));
        assert_eq!(range.end(), utc(2024, 3, 15) - TimeDelta::milliseconds(1));
    }

    #[test]
    fn week_range_respects_monday_start() {
        // 2024-03-14 is a Thursday.
        let range = compute_range(date(2024, 3, 14), ViewType::Week, WeekStart::Monday);
        assert_eq!(range.start(), utc(2024, 3, 11));
        assert_eq!(range.end(), utc(2024, 3, 18) - TimeDelta::milliseconds(1));
    }

    #[test]
    fn week_range_respects_sunday_start() {
        let range = compute_range(date(2024, 3, 14), ViewType::Week, WeekStart::Sunday);
        assert_eq!(range.start(), utc(2024, 3, 10));
        // A Sunday anchor starts its own week.
        let range = compute_range(date(2024, 3, 10), ViewType::Week, WeekStart::Sunday);
        assert_eq!(range.start(), utc(2024, 3, 10));
    }

    #[test]
    fn timeline_behaves_like_week() {
        let anchor = date(2024, 3, 14);
        assert_eq!(
            compute_range(anchor, ViewType::Timeline, WeekStart::Monday),
            compute_range(anchor, ViewType::Week, WeekStart::Monday)
        );
        assert_eq!(step_forward(anchor, ViewType::Timeline), date(2024, 3, 21));
    }

    #[test]
    fn month_and_list_cover_whole_month() {
        for view in [ViewType::Month, ViewType::List] {
            let range = compute_range(date(2024, 2, 10), view, WeekStart::Monday);
            assert_eq!(range.start(), utc(2024, 2, 1));
            assert_eq!(range.end(), utc(2024, 3, 1) - TimeDelta::milliseconds(1));
        }
    }

    #[test]
    fn next_month_from_january_31_lands_in_february() {
        assert_eq!(step_forward(date(2024, 1, 31), ViewType::Month), date(2024, 2, 29));
        assert_eq!(step_forward(date(2023, 1, 31), ViewType::Month), date(2023, 2, 28));
    }

    #[test]
    fn next_month_from_december_rolls_the_year() {
        assert_eq!(step_forward(date(2024, 12, 15), ViewType::Month), date(2025, 1, 15));
        assert_eq!(step_back(date(2024, 1, 15), ViewType::List), date(2023, 12, 15));
    }

    #[test]
    fn day_and_week_steps() {
        assert_eq!(step_forward(date(2024, 2, 28), ViewType::Day), date(2024, 2, 29));
        assert_eq!(step_back(date(2024, 3, 1), ViewType::Week), date(2024, 2, 23));
    }

    #[test]
    fn view_change_recomputes_from_anchor() {
        let nav = NavigationState::new(date(2024, 3, 14), ViewType::Month, WeekStart::Monday, Tz::UTC);
        let week = nav.with_view(ViewType::Week);
        assert_eq!(week.anchor, nav.anchor);
        assert_eq!(week.range().start(), utc(2024, 3, 11));
    }

    #[test]
    fn today_resets_anchor_and_keeps_view() {
        let nav = NavigationState::new(date(2020, 1, 1), ViewType::Day, WeekStart::Monday, Tz::UTC)
            .next()
            .next();
        let back = nav.today(date(2024, 3, 14));
        assert_eq!(back.anchor, date(2024, 3, 14));
        assert_eq!(back.view, ViewType::Day);
    }

    #[test]
    fn timezone_shifts_boundaries() {
        let paris: Tz = "Europe/Paris".parse().unwrap();
        let range = compute_range_in(date(2024, 3, 14), ViewType::Day, WeekStart::Monday, paris);
        assert_eq!(range.start(), Utc.with_ymd_and_hms(2024, 3, 13, 23, 0, 0).unwrap());
    }

    #[test]
    fn month_across_dst_change() {
        // Paris switches to CEST on 2024-03-31.
        let paris: Tz = "Europe/Paris".parse().unwrap();
        let range = compute_range_in(date(2024, 3, 5), ViewType::Month, WeekStart::Monday, paris);
        assert_eq!(range.start(), Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap());
        let end = range.end() + TimeDelta::milliseconds(1);
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 31, 22, 0, 0).unwrap());
    }

    #[test]
    fn skipped_midnight_resolves_to_first_valid_hour() {
        // Santiago skipped 00:00-01:00 on 2023-09-03.
        let santiago: Tz = "America/Santiago".parse().unwrap();
        let start = local_midnight(santiago, date(2023, 9, 3));
        assert_eq!(start.with_timezone(&santiago).hour(), 1);
    }

    #[test]
    fn titles_per_view() {
        let nav = NavigationState::new(date(2024, 3, 14), ViewType::Month, WeekStart::Monday, Tz::UTC);
        assert_eq!(nav.title(), "March 2024");
        assert_eq!(nav.with_view(ViewType::Week).title(), "11 - 17 March 2024");
        assert_eq!(nav.with_view(ViewType::Day).title(), "Thursday 14 March 2024");
        assert_eq!(nav.with_view(ViewType::List).title(), "01/03/2024 - 31/03/2024");
    }

    #[test]
    fn week_title_spanning_months_and_years() {
        let nav = NavigationState::new(date(2024, 2, 28), ViewType::Week, WeekStart::Monday, Tz::UTC);
        assert_eq!(nav.title(), "26 February - 3 March 2024");
        let nav = nav.with_anchor(date(2024, 12, 31));
        assert_eq!(nav.title(), "30 December 2024 - 5 January 2025");
    }
}
