//! Schedule Module
//!
//! Static 2024 calendar. Session times are published in Eastern European
//! local time and converted to UTC on load.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono::Weekday::{Fri, Sat, Sun, Thu};
use serde::Serialize;

pub const SCHEDULE_YEAR: i32 = 2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendFormat {
    Normal,
    Sprint,
}

impl WeekendFormat {
    /// Session order for the format.
    pub fn session_kinds(self) -> [SessionKind; 5] {
        match self {
            WeekendFormat::Normal => [
                SessionKind::Practice1,
                SessionKind::Practice2,
                SessionKind::Practice3,
                SessionKind::Qualifying,
                SessionKind::Race,
            ],
            WeekendFormat::Sprint => [
                SessionKind::Practice1,
                SessionKind::SprintQualifying,
                SessionKind::Sprint,
                SessionKind::Qualifying,
                SessionKind::Race,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Practice1,
    Practice2,
    Practice3,
    SprintQualifying,
    Sprint,
    Qualifying,
    Race,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledSession {
    pub kind: SessionKind,
    pub weekday: Weekday,
    pub date: NaiveDate,
    /// Eastern European wall-clock time.
    pub local_time: NaiveTime,
    starts_at: DateTime<Utc>,
}

impl ScheduledSession {
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceWeekend {
    pub round: u32,
    pub name: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub format: WeekendFormat,
    pub sessions: Vec<ScheduledSession>,
}

impl RaceWeekend {
    pub fn race(&self) -> Option<&ScheduledSession> {
        self.sessions.iter().find(|s| s.kind == SessionKind::Race)
    }
}

// == Calendar Data ==
type Slot = (Weekday, u32, u32);

struct Row {
    name: &'static str,
    start: (u32, u32),
    end: (u32, u32),
    format: WeekendFormat,
    slots: [Slot; 5],
}

const fn normal(name: &'static str, start: (u32, u32), end: (u32, u32), slots: [Slot; 5]) -> Row {
    Row {
        name,
        start,
        end,
        format: WeekendFormat::Normal,
        slots,
    }
}

const fn sprint(name: &'static str, start: (u32, u32), end: (u32, u32), slots: [Slot; 5]) -> Row {
    Row {
        name,
        start,
        end,
        format: WeekendFormat::Sprint,
        slots,
    }
}

const EUROPEAN: [Slot; 5] = [(Fri, 14, 30), (Fri, 18, 0), (Sat, 13, 30), (Sat, 17, 0), (Sun, 16, 0)];

const CALENDAR: [Row; 24] = [
    normal("Bahrain Grand Prix", (2, 29), (3, 2), [(Thu, 13, 30), (Thu, 17, 0), (Fri, 14, 30), (Fri, 18, 0), (Sat, 17, 0)]),
    normal("Saudi Arabian Grand Prix", (3, 7), (3, 9), [(Thu, 15, 30), (Thu, 19, 10), (Fri, 15, 30), (Fri, 19, 0), (Sat, 19, 0)]),
    normal("Australian Grand Prix", (3, 22), (3, 24), [(Fri, 3, 30), (Fri, 7, 0), (Sat, 3, 30), (Sat, 7, 0), (Sun, 6, 0)]),
    normal("Japanese Grand Prix", (4, 5), (4, 7), [(Fri, 5, 30), (Fri, 9, 0), (Sat, 5, 30), (Sat, 9, 0), (Sun, 8, 0)]),
    sprint("Chinese Grand Prix", (4, 19), (4, 21), [(Fri, 6, 30), (Fri, 10, 30), (Sat, 6, 0), (Sat, 10, 0), (Sun, 10, 0)]),
    sprint("Miami Grand Prix", (5, 3), (5, 5), [(Fri, 19, 30), (Fri, 23, 30), (Sat, 19, 0), (Sat, 23, 0), (Sun, 23, 0)]),
    normal("Emilia Romagna Grand Prix", (5, 17), (5, 19), EUROPEAN),
    normal("Monaco Grand Prix", (5, 24), (5, 26), EUROPEAN),
    normal("Canadian Grand Prix", (6, 7), (6, 9), [(Fri, 20, 30), (Sat, 0, 0), (Sat, 19, 30), (Sat, 23, 0), (Sun, 21, 0)]),
    normal("Spanish Grand Prix", (6, 21), (6, 23), EUROPEAN),
    sprint("Austrian Grand Prix", (6, 28), (6, 30), [(Fri, 13, 30), (Fri, 17, 30), (Sat, 13, 0), (Sat, 17, 0), (Sun, 16, 0)]),
    normal("British Grand Prix", (7, 5), (7, 7), [(Fri, 14, 30), (Fri, 18, 0), (Sat, 13, 30), (Sat, 17, 0), (Sun, 17, 0)]),
    normal("Hungarian Grand Prix", (7, 19), (7, 21), EUROPEAN),
    normal("Belgian Grand Prix", (7, 26), (7, 28), EUROPEAN),
    normal("Dutch Grand Prix", (8, 23), (8, 25), [(Fri, 13, 30), (Fri, 17, 0), (Sat, 12, 30), (Sat, 16, 0), (Sun, 16, 0)]),
    normal("Italian Grand Prix", (8, 30), (9, 1), EUROPEAN),
    normal("Azerbaijan Grand Prix", (9, 13), (9, 15), [(Fri, 12, 30), (Fri, 16, 0), (Sat, 11, 30), (Sat, 15, 0), (Sun, 14, 0)]),
    normal("Singapore Grand Prix", (9, 20), (9, 22), [(Fri, 12, 30), (Fri, 16, 0), (Sat, 12, 30), (Sat, 16, 0), (Sun, 15, 0)]),
    sprint("United States Grand Prix", (10, 18), (10, 20), [(Fri, 20, 30), (Sat, 0, 30), (Sat, 21, 0), (Sun, 1, 0), (Sun, 22, 0)]),
    normal("Mexico City Grand Prix", (10, 25), (10, 27), [(Fri, 21, 30), (Sat, 1, 0), (Sat, 20, 30), (Sun, 0, 0), (Sun, 22, 0)]),
    sprint("Brazilian Grand Prix", (11, 1), (11, 3), [(Fri, 16, 30), (Fri, 20, 30), (Sat, 16, 0), (Sat, 20, 0), (Sun, 19, 0)]),
    normal("Las Vegas Grand Prix", (11, 22), (11, 24), [(Fri, 4, 30), (Fri, 8, 0), (Sat, 4, 30), (Sat, 8, 0), (Sun, 8, 0)]),
    sprint("Qatar Grand Prix", (11, 29), (12, 1), [(Fri, 15, 30), (Fri, 19, 30), (Sat, 16, 0), (Sat, 20, 0), (Sun, 18, 0)]),
    normal("Abu Dhabi Grand Prix", (12, 6), (12, 8), [(Fri, 11, 30), (Fri, 15, 0), (Sat, 12, 30), (Sat, 16, 0), (Sun, 15, 0)]),
];

// == Time Zone ==
fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let mut day = NaiveDate::from_ymd_opt(year, month + 1, 1)? - Duration::days(1);
    while day.weekday() != Sun {
        day -= Duration::days(1);
    }
    Some(day)
}

/// UTC offset of Eastern European time at a local wall-clock moment:
/// +3 (EEST) from 03:00 on the last Sunday of March until 04:00 on the
/// last Sunday of October, +2 (EET) otherwise.
pub fn eastern_european_offset(date: NaiveDate, time: NaiveTime) -> Option<FixedOffset> {
    let summer_start = last_sunday(date.year(), 3)?.and_hms_opt(3, 0, 0)?;
    let summer_end = last_sunday(date.year(), 10)?.and_hms_opt(4, 0, 0)?;
    let local = date.and_time(time);

    let hours = if local >= summer_start && local < summer_end { 3 } else { 2 };
    FixedOffset::east_opt(hours * 3600)
}

/// First date on or after `from` that falls on `weekday`.
fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(i64::from(ahead))
}

fn build_session(start: NaiveDate, kind: SessionKind, (weekday, hour, minute): Slot) -> Option<ScheduledSession> {
    let date = next_weekday(start, weekday);
    let local_time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let offset = eastern_european_offset(date, local_time)?;
    let starts_at = offset
        .from_local_datetime(&date.and_time(local_time))
        .single()?
        .with_timezone(&Utc);

    Some(ScheduledSession {
        kind,
        weekday,
        date,
        local_time,
        starts_at,
    })
}

fn build_weekend(round: u32, row: &Row) -> Option<RaceWeekend> {
    let start_date = NaiveDate::from_ymd_opt(SCHEDULE_YEAR, row.start.0, row.start.1)?;
    let end_date = NaiveDate::from_ymd_opt(SCHEDULE_YEAR, row.end.0, row.end.1)?;

    let mut sessions = row
        .format
        .session_kinds()
        .into_iter()
        .zip(row.slots)
        .map(|(kind, slot)| build_session(start_date, kind, slot))
        .collect::<Option<Vec<_>>>()?;
    sessions.sort_by_key(|s| s.starts_at);

    Some(RaceWeekend {
        round,
        name: row.name,
        start_date,
        end_date,
        format: row.format,
        sessions,
    })
}

// == Lookups ==
/// The full calendar, ordered by round.
pub fn calendar() -> &'static [RaceWeekend] {
    static WEEKENDS: OnceLock<Vec<RaceWeekend>> = OnceLock::new();
    WEEKENDS.get_or_init(|| {
        CALENDAR
            .iter()
            .zip(1..)
            .filter_map(|(row, round)| build_weekend(round, row))
            .collect()
    })
}

pub fn by_round(round: u32) -> Option<&'static RaceWeekend> {
    calendar().iter().find(|w| w.round == round)
}

/// First weekend whose race has not started by `now`.
pub fn next_after(now: DateTime<Utc>) -> Option<&'static RaceWeekend> {
    calendar()
        .iter()
        .find(|w| w.race().is_some_and(|race| race.starts_at > now))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_calendar_is_complete() {
        let weekends = calendar();
        assert_eq!(weekends.len(), 24);
        for (i, weekend) in weekends.iter().enumerate() {
            assert_eq!(weekend.round as usize, i + 1);
            assert_eq!(weekend.sessions.len(), 5, "{}", weekend.name);
            assert!(weekend.start_date <= weekend.end_date);
        }
        let sprints = weekends
            .iter()
            .filter(|w| w.format == WeekendFormat::Sprint)
            .count();
        assert_eq!(sprints, 6);
    }

    #[test]
    fn test_winter_time_is_utc_plus_two() {
        let bahrain = by_round(1).unwrap();
        let race = bahrain.race().unwrap();
        assert_eq!(race.weekday, Sat);
        assert_eq!(race.starts_at(), utc(2024, 3, 2, 15, 0));

        // Thursday practice lands on the first day of the weekend
        assert_eq!(bahrain.sessions[0].starts_at(), utc(2024, 2, 29, 11, 30));
    }

    #[test]
    fn test_summer_time_is_utc_plus_three() {
        let spain = by_round(10).unwrap();
        assert_eq!(spain.race().unwrap().starts_at(), utc(2024, 6, 23, 13, 0));
    }

    #[test]
    fn test_october_changeover() {
        let mexico = by_round(20).unwrap();
        let qualifying = mexico
            .sessions
            .iter()
            .find(|s| s.kind == SessionKind::Qualifying)
            .unwrap();
        // Midnight Sunday is still summer time
        assert_eq!(qualifying.starts_at(), utc(2024, 10, 26, 21, 0));
        assert_eq!(mexico.race().unwrap().starts_at(), utc(2024, 10, 27, 20, 0));
    }

    #[test]
    fn test_sessions_sorted_and_sprint_order() {
        let usa = by_round(19).unwrap();
        let kinds: Vec<SessionKind> = usa.sessions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SessionKind::Practice1,
                SessionKind::SprintQualifying,
                SessionKind::Sprint,
                SessionKind::Qualifying,
                SessionKind::Race,
            ]
        );
        assert!(usa.sessions.windows(2).all(|w| w[0].starts_at() <= w[1].starts_at()));
    }

    #[test]
    fn test_last_sunday() {
        assert_eq!(last_sunday(2024, 3), NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(last_sunday(2024, 10), NaiveDate::from_ymd_opt(2024, 10, 27));
    }

    #[test]
    fn test_next_after() {
        assert_eq!(next_after(utc(2024, 1, 1, 0, 0)).unwrap().round, 1);
        assert_eq!(next_after(utc(2024, 3, 2, 15, 0)).unwrap().round, 2);
        assert_eq!(next_after(utc(2024, 6, 23, 12, 0)).unwrap().round, 10);
        assert!(next_after(utc(2025, 1, 1, 0, 0)).is_none());
    }

    #[test]
    fn test_by_round_out_of_range() {
        assert!(by_round(0).is_none());
        assert!(by_round(25).is_none());
    }
}
