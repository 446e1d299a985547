use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};

/// First day of the scoring week. Training ordinals and week windows all
/// derive from this one constant.
pub const WEEK_STARTS_ON: Weekday = Weekday::Sun;

pub const DAYS_PER_WEEK: i64 = 7;

/// Canonicalize an arbitrary client-supplied date value into a UTC calendar
/// day. Accepts RFC 3339 date-times in any offset (converted to UTC first),
/// naive date-times (read as UTC), and bare `YYYY-MM-DD` dates. Anything
/// unparseable resolves to `fallback`; callers pass the current server day,
/// so this module itself never reads the clock.
pub fn canonical_day(raw: Option<&str>, fallback: NaiveDate) -> NaiveDate {
    let Some(raw) = raw else { return fallback };
    let raw = raw.trim();
    if raw.is_empty() {
        return fallback;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc).date_naive();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date();
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day;
    }

    fallback
}

/// The week window containing `day`: `[week start, week start + 7 days)`,
/// start inclusive, end exclusive.
pub fn week_window(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = day.weekday().days_since(WEEK_STARTS_ON);
    let start = day - Duration::days(i64::from(offset));
    (start, start + Duration::days(DAYS_PER_WEEK))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fallback() -> NaiveDate {
        day(2026, 1, 15)
    }

    // ── canonical_day ────────────────────────────────────────────────────

    #[test]
    fn test_rfc3339_utc_input() {
        assert_eq!(
            canonical_day(Some("2026-03-02T10:00:00Z"), fallback()),
            day(2026, 3, 2)
        );
    }

    #[test]
    fn test_negative_offset_rolls_into_next_utc_day() {
        // 23:30 in UTC-3 is 02:30 UTC the next day
        assert_eq!(
            canonical_day(Some("2026-03-01T23:30:00-03:00"), fallback()),
            day(2026, 3, 2)
        );
    }

    #[test]
    fn test_positive_offset_rolls_into_previous_utc_day() {
        assert_eq!(
            canonical_day(Some("2026-03-02T00:30:00+02:00"), fallback()),
            day(2026, 3, 1)
        );
    }

    #[test]
    fn test_naive_datetime_is_read_as_utc() {
        assert_eq!(
            canonical_day(Some("2026-03-02T18:45:00"), fallback()),
            day(2026, 3, 2)
        );
    }

    #[test]
    fn test_bare_date() {
        assert_eq!(
            canonical_day(Some("2026-03-02"), fallback()),
            day(2026, 3, 2)
        );
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(
            canonical_day(Some("2026-03-02T10:00:00.123Z"), fallback()),
            day(2026, 3, 2)
        );
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(canonical_day(Some("not-a-date"), fallback()), fallback());
        assert_eq!(canonical_day(Some("2026-13-40"), fallback()), fallback());
    }

    #[test]
    fn test_empty_and_missing_fall_back() {
        assert_eq!(canonical_day(Some(""), fallback()), fallback());
        assert_eq!(canonical_day(Some("   "), fallback()), fallback());
        assert_eq!(canonical_day(None, fallback()), fallback());
    }

    #[test]
    fn test_same_instant_different_offsets_agree() {
        let a = canonical_day(Some("2026-03-02T03:00:00Z"), fallback());
        let b = canonical_day(Some("2026-03-02T00:00:00-03:00"), fallback());
        assert_eq!(a, b);
    }

    // ── week_window ──────────────────────────────────────────────────────

    #[test]
    fn test_week_window_midweek() {
        // 2026-03-04 is a Wednesday; its week runs Sun 03-01 .. Sun 03-08
        let (start, end) = week_window(day(2026, 3, 4));
        assert_eq!(start, day(2026, 3, 1));
        assert_eq!(end, day(2026, 3, 8));
    }

    #[test]
    fn test_week_window_on_week_start_day() {
        let (start, end) = week_window(day(2026, 3, 1)); // Sunday
        assert_eq!(start, day(2026, 3, 1));
        assert_eq!(end, day(2026, 3, 8));
    }

    #[test]
    fn test_week_window_on_last_day_of_week() {
        let (start, end) = week_window(day(2026, 3, 7)); // Saturday
        assert_eq!(start, day(2026, 3, 1));
        assert_eq!(end, day(2026, 3, 8));
    }

    #[test]
    fn test_next_week_starts_a_fresh_window() {
        let (start, _) = week_window(day(2026, 3, 8)); // following Sunday
        assert_eq!(start, day(2026, 3, 8));
    }

    #[test]
    fn test_window_is_seven_days() {
        let (start, end) = week_window(day(2026, 3, 4));
        assert_eq!((end - start).num_days(), DAYS_PER_WEEK);
    }
}
