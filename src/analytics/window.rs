use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Weekday,
};

/// Day-granularity view of instants in a particular time zone.
#[derive(Debug, Clone)]
pub(crate) struct Calendar<Tz: TimeZone> {
    tz: Tz,
    week_start: Weekday,
}

impl Calendar<chrono::Local> {
    pub(crate) fn local(week_start: Weekday) -> Self {
        Self::new(chrono::Local, week_start)
    }
}

impl<Tz: TimeZone> Calendar<Tz> {
    pub(crate) fn new(tz: Tz, week_start: Weekday) -> Self {
        Self { tz, week_start }
    }

    /// Local calendar date of an epoch-millisecond instant.
    pub(crate) fn date_of(&self, millis: i64) -> Option<NaiveDate> {
        match self.tz.timestamp_millis_opt(millis) {
            LocalResult::Single(dt) => Some(dt.date_naive()),
            _ => None,
        }
    }

    /// 00:00:00.000 of the instant's local day.
    pub(crate) fn day_start(&self, millis: i64) -> Option<i64> {
        self.date_of(millis).map(|d| self.start_of(d))
    }

    pub(crate) fn start_of(&self, date: NaiveDate) -> i64 {
        self.local_millis(date.and_time(NaiveTime::MIN))
    }

    /// 23:59:59.999 of the given local day: one millisecond before the next
    /// day starts.
    pub(crate) fn end_of(&self, date: NaiveDate) -> i64 {
        match date.succ_opt() {
            Some(next) => self.start_of(next) - 1,
            None => self.start_of(date) + MILLIS_PER_DAY - 1,
        }
    }

    pub(crate) fn year_month(&self, millis: i64) -> Option<(i32, u32)> {
        self.date_of(millis).map(|d| (d.year(), d.month()))
    }

    fn local_millis(&self, naive: NaiveDateTime) -> i64 {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.timestamp_millis(),
            LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
            // Wall-clock time skipped by a DST jump: the day starts where the
            // gap ends.
            LocalResult::None => {
                let mut candidate = naive;
                for _ in 0..GAP_SEARCH_STEPS {
                    candidate += Duration::minutes(15);
                    if let Some(dt) = self.tz.from_local_datetime(&candidate).earliest() {
                        return dt.timestamp_millis();
                    }
                }
                let offset = self.tz.offset_from_utc_datetime(&naive).fix();
                naive.and_utc().timestamp_millis()
                    - i64::from(offset.local_minus_utc()) * 1000
            }
        }
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
/// Quarter hours searched past a skipped midnight; no zone skips a whole day.
const GAP_SEARCH_STEPS: usize = 24 * 4;

/// Named time filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Preset {
    ThisWeek,
    ThisMonth,
    LastMonth,
    Last90Days,
    AllTime,
}

impl Preset {
    pub(crate) fn all() -> &'static [Preset] {
        &[
            Self::ThisWeek,
            Self::ThisMonth,
            Self::LastMonth,
            Self::Last90Days,
            Self::AllTime,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::LastMonth => "Last Month",
            Self::Last90Days => "Last 90 Days",
            Self::AllTime => "All Time",
        }
    }

    /// Short, command-line friendly name.
    pub(crate) fn key(&self) -> &'static str {
        match self {
            Self::ThisWeek => "this-week",
            Self::ThisMonth => "this-month",
            Self::LastMonth => "last-month",
            Self::Last90Days => "last-90-days",
            Self::AllTime => "all",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "this-week" | "week" | "w" => Some(Self::ThisWeek),
            "this-month" | "month" | "m" => Some(Self::ThisMonth),
            "last-month" | "lm" => Some(Self::LastMonth),
            "last-90-days" | "90-days" | "90d" | "90" => Some(Self::Last90Days),
            "all" | "all-time" | "a" => Some(Self::AllTime),
            _ => None,
        }
    }

    pub(crate) fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|p| p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub(crate) fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|p| p == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selector {
    Preset(Preset),
    /// Every expense on record, including ones dated after the reference.
    All,
    /// Explicit inclusive date range. The two ends are independent and may be
    /// given in either order; a reversed range resolves to a malformed window.
    Range { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset(p) => write!(f, "{p}"),
            Self::All => write!(f, "All Expenses"),
            Self::Range { start, end } => write!(f, "{start} → {end}"),
        }
    }
}

/// Inclusive `[start, end]` range in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) start: i64,
    pub(crate) end: i64,
}

impl Window {
    pub(crate) fn is_malformed(&self) -> bool {
        self.start > self.end
    }

    pub(crate) fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis <= self.end
    }
}

/// Turn a selector into concrete bounds relative to `reference`.
///
/// Start bounds land on 00:00:00.000 and end bounds on 23:59:59.999 of their
/// local day, except for [`Preset::AllTime`], which runs from the epoch to the
/// exact reference instant, and [`Selector::All`], which has no bounds.
pub(crate) fn resolve_window<Tz: TimeZone>(
    selector: Selector,
    reference: &DateTime<Tz>,
    calendar: &Calendar<Tz>,
) -> Window {
    let today = reference.with_timezone(&calendar.tz).date_naive();

    let (first, last) = match selector {
        Selector::All => {
            return Window {
                start: i64::MIN,
                end: i64::MAX,
            };
        }
        Selector::Range { start, end } => (start, end),
        Selector::Preset(Preset::ThisWeek) => {
            let back = days_since(today.weekday(), calendar.week_start);
            let first = today - Duration::days(back);
            (first, first + Duration::days(6))
        }
        Selector::Preset(Preset::ThisMonth) => month_bounds(today.year(), today.month()),
        Selector::Preset(Preset::LastMonth) => {
            let (year, month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            month_bounds(year, month)
        }
        Selector::Preset(Preset::Last90Days) => (today - Duration::days(90), today),
        Selector::Preset(Preset::AllTime) => {
            return Window {
                start: 0,
                end: reference.timestamp_millis(),
            };
        }
    };

    Window {
        start: calendar.start_of(first),
        end: calendar.end_of(last),
    }
}

fn days_since(day: Weekday, week_start: Weekday) -> i64 {
    let diff = i64::from(day.num_days_from_monday()) - i64::from(week_start.num_days_from_monday());
    diff.rem_euclid(7)
}

/// First and last calendar day of a month.
pub(crate) fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_first.and_then(|d| d.pred_opt()).unwrap_or(first);
    (first, last)
}
