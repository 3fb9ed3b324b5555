//! Week bucketing, manual list order and report titles for the log list.
//!
//! All times here are local wall-clock times. Callers convert stored UTC
//! timestamps before grouping.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

use crate::model::entry::LogEntry;

// ---------------------------------------------------------------------------
// Week keys and labels
// ---------------------------------------------------------------------------

/// Calendar week within a month: `{year}-{month}-W{week}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-W{}", self.year, self.month, self.week)
    }
}

/// Week number within the month, counting the partial first week as 1.
///
/// `ceil((day + first_weekday - 1) / 7)` where `first_weekday` is the
/// weekday of the 1st with Monday = 1 and Sunday = 7.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first_weekday = date
        .with_day(1)
        .map(|first| first.weekday().number_from_monday())
        .unwrap_or(1);
    (date.day() + first_weekday - 1).div_ceil(7)
}

pub fn week_key(ts: NaiveDateTime) -> WeekKey {
    let date = ts.date();
    WeekKey {
        year: date.year(),
        month: date.month(),
        week: week_of_month(date),
    }
}

/// Midnight on the Monday of `now`'s week
fn start_of_week(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN)
}

/// True when `ts` falls in `[Monday 00:00, next Monday 00:00)` of `now`'s week
pub fn is_this_week(ts: NaiveDateTime, now: NaiveDateTime) -> bool {
    let start = start_of_week(now);
    ts >= start && ts < start + Duration::days(7)
}

/// Display label for the week group containing `ts`
pub fn week_label(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    if is_this_week(ts, now) {
        return "this week".to_string();
    }
    if ts >= now - Duration::days(7) && ts <= now - Duration::days(1) {
        return "last week".to_string();
    }
    let key = week_key(ts);
    format!("month {} week {}", key.month, key.week)
}

// ---------------------------------------------------------------------------
// Manual order
// ---------------------------------------------------------------------------

/// Sort log entries by the user's manual order.
///
/// Entries missing from `order` come first, newest first; the rest follow
/// their position in `order`.
pub fn sort_by_manual_order<E: Borrow<LogEntry>>(entries: &mut [E], order: &[u64]) {
    let rank = |id: u64| order.iter().position(|&o| o == id);
    entries.sort_by(|a, b| {
        let (a, b) = (a.borrow(), b.borrow());
        match (rank(a.id), rank(b.id)) {
            (None, None) => b.create_time.cmp(&a.create_time),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        }
    });
}

/// New manual order after dropping `dragged` onto `target`.
///
/// The dragged id is spliced out and reinserted at the target's former
/// index. Unknown or equal ids return `current` unchanged.
pub fn move_in_order(current: &[u64], dragged: u64, target: u64) -> Vec<u64> {
    let mut order = current.to_vec();
    if dragged == target {
        return order;
    }
    let (Some(from), Some(to)) = (
        order.iter().position(|&id| id == dragged),
        order.iter().position(|&id| id == target),
    ) else {
        return order;
    };
    order.remove(from);
    order.insert(to, dragged);
    order
}

// ---------------------------------------------------------------------------
// Week groups
// ---------------------------------------------------------------------------

/// One week bucket of the log list
#[derive(Debug, Clone)]
pub struct WeekGroup<T> {
    pub key: WeekKey,
    pub label: String,
    pub this_week: bool,
    pub items: Vec<T>,
}

/// Bucket already-sorted items by week.
///
/// Items keep their order inside a bucket. The current week comes first,
/// then the other weeks newest first.
pub fn group_by_week<T>(
    items: impl IntoIterator<Item = T>,
    now: NaiveDateTime,
    time_of: impl Fn(&T) -> NaiveDateTime,
) -> Vec<WeekGroup<T>> {
    let mut groups: IndexMap<WeekKey, WeekGroup<T>> = IndexMap::new();
    for item in items {
        let ts = time_of(&item);
        let key = week_key(ts);
        groups
            .entry(key)
            .or_insert_with(|| WeekGroup {
                key,
                label: week_label(ts, now),
                this_week: is_this_week(ts, now),
                items: Vec::new(),
            })
            .items
            .push(item);
    }

    let mut groups: Vec<_> = groups.into_values().collect();
    groups.sort_by(|a, b| b.this_week.cmp(&a.this_week).then(b.key.cmp(&a.key)));
    groups
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

/// `yyyyMMdd`, the default title of a new log
pub fn date_title(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Default title for a report covering logs created on `dates`
pub fn summary_title(dates: &[NaiveDate], today: NaiveDate) -> String {
    let (Some(start), Some(end)) = (dates.iter().min(), dates.iter().max()) else {
        return format!("{} weekly report", date_title(today));
    };
    if start == end {
        format!("{} weekly report", date_title(*start))
    } else {
        format!("{}-{} weekly report", date_title(*start), date_title(*end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::Status;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    fn entry(id: u64, day: u32) -> LogEntry {
        let time = Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
        LogEntry {
            id,
            creator_id: 1,
            status: Status::Active,
            create_time: time,
            update_time: time,
            title: format!("log {}", id),
            content: String::new(),
        }
    }

    #[test]
    fn week_of_month_counts_partial_first_week() {
        // 2024-05-01 is a Wednesday
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        assert_eq!(week_of_month(d(1)), 1);
        assert_eq!(week_of_month(d(5)), 1);
        assert_eq!(week_of_month(d(6)), 2);
        assert_eq!(week_of_month(d(31)), 5);
        // 2024-09-01 is a Sunday
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()), 1);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()), 2);
    }

    #[test]
    fn week_key_format() {
        assert_eq!(week_key(at(2024, 5, 15, 10)).to_string(), "2024-5-W3");
    }

    #[test]
    fn week_key_changes_at_monday_midnight() {
        // 2024-05-12 is a Sunday
        let sunday_night = NaiveDate::from_ymd_opt(2024, 5, 12)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap();
        let monday = at(2024, 5, 13, 0);
        assert_eq!(week_key(sunday_night).to_string(), "2024-5-W2");
        assert_eq!(week_key(monday).to_string(), "2024-5-W3");
        assert!(week_key(monday) > week_key(sunday_night));
    }

    #[test]
    fn this_week_runs_monday_to_monday() {
        // Wednesday 2024-05-15
        let now = at(2024, 5, 15, 12);
        assert!(is_this_week(at(2024, 5, 13, 0), now));
        assert!(is_this_week(at(2024, 5, 19, 23), now));
        assert!(!is_this_week(at(2024, 5, 12, 23), now));
        assert!(!is_this_week(at(2024, 5, 20, 0), now));
    }

    #[test]
    fn labels() {
        let now = at(2024, 5, 15, 12);
        assert_eq!(week_label(at(2024, 5, 14, 9), now), "this week");
        assert_eq!(week_label(at(2024, 5, 10, 9), now), "last week");
        assert_eq!(week_label(at(2024, 5, 8, 12), now), "last week");
        assert_eq!(week_label(at(2024, 5, 8, 11), now), "month 5 week 2");
        assert_eq!(week_label(at(2024, 4, 2, 9), now), "month 4 week 1");
    }

    #[test]
    fn unordered_entries_come_first_newest_first() {
        let mut entries = vec![entry(1, 1), entry(2, 2), entry(3, 3), entry(4, 4)];
        sort_by_manual_order(&mut entries, &[3, 1]);
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn sort_works_on_borrowed_entries() {
        let entries = [entry(1, 1), entry(2, 2)];
        let mut refs: Vec<&LogEntry> = entries.iter().collect();
        sort_by_manual_order(&mut refs, &[]);
        assert_eq!(refs[0].id, 2);
    }

    #[test]
    fn move_in_order_splices() {
        assert_eq!(move_in_order(&[1, 2, 3, 4], 1, 3), vec![2, 3, 1, 4]);
        assert_eq!(move_in_order(&[1, 2, 3, 4], 4, 2), vec![1, 4, 2, 3]);
        assert_eq!(move_in_order(&[1, 2], 1, 1), vec![1, 2]);
        assert_eq!(move_in_order(&[1, 2], 1, 9), vec![1, 2]);
    }

    #[test]
    fn groups_put_current_week_first_then_newest() {
        let now = at(2024, 5, 15, 12);
        let times = [at(2024, 4, 2, 9), at(2024, 5, 14, 9), at(2024, 5, 8, 9), at(2024, 5, 13, 9)];
        let groups = group_by_week(times, now, |t| *t);
        let keys: Vec<_> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["2024-5-W3", "2024-5-W2", "2024-4-W1"]);
        assert!(groups[0].this_week);
        assert_eq!(groups[0].items, vec![at(2024, 5, 14, 9), at(2024, 5, 13, 9)]);
    }

    #[test]
    fn week_keys_compare_numerically() {
        let now = at(2024, 12, 30, 12);
        let groups = group_by_week([at(2024, 9, 20, 9), at(2024, 10, 20, 9)], now, |t| *t);
        assert_eq!(groups[0].key.month, 10);
    }

    #[test]
    fn summary_titles() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        assert_eq!(summary_title(&[], d(20)), "20240520 weekly report");
        assert_eq!(summary_title(&[d(3), d(3)], d(20)), "20240503 weekly report");
        assert_eq!(
            summary_title(&[d(7), d(3), d(5)], d(20)),
            "20240503-20240507 weekly report"
        );
    }
}
