//! Run-date helpers in Korea Standard Time.
//!
//! There is no holiday calendar: only weekends and the Monday pre-open
//! window are mapped back to the previous Friday.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc, Weekday};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Hour (KST) at which the Monday session opens.
const MARKET_OPEN_HOUR: u32 = 9;

pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

/// The session the briefing refers to.
///
/// Saturday and Sunday map back to Friday, as does Monday before the open.
pub fn last_trading_day(ts: &DateTime<FixedOffset>) -> NaiveDate {
    let date = ts.date_naive();
    let back = match ts.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        Weekday::Mon if ts.hour() < MARKET_OPEN_HOUR => 3,
        _ => 0,
    };
    date - Duration::days(back)
}

pub fn is_weekend(ts: &DateTime<FixedOffset>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `2024-05-17 08:30:00 UTC+09:00`
pub fn format_generated_at(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC%:z").to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        kst().with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-05-17 is a Friday.

    #[test]
    fn weekday_is_its_own_trading_day() {
        assert_eq!(last_trading_day(&at(2024, 5, 15, 7)), ymd(2024, 5, 15));
        assert_eq!(last_trading_day(&at(2024, 5, 17, 18)), ymd(2024, 5, 17));
    }

    #[test]
    fn weekend_maps_to_friday() {
        assert_eq!(last_trading_day(&at(2024, 5, 18, 10)), ymd(2024, 5, 17));
        assert_eq!(last_trading_day(&at(2024, 5, 19, 23)), ymd(2024, 5, 17));
    }

    #[test]
    fn monday_before_open_maps_to_friday() {
        assert_eq!(last_trading_day(&at(2024, 5, 20, 8)), ymd(2024, 5, 17));
        assert_eq!(last_trading_day(&at(2024, 5, 20, 9)), ymd(2024, 5, 20));
    }

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(&at(2024, 5, 18, 0)));
        assert!(is_weekend(&at(2024, 5, 19, 0)));
        assert!(!is_weekend(&at(2024, 5, 20, 0)));
    }

    #[test]
    fn generated_at_renders_zone() {
        assert_eq!(
            format_generated_at(&at(2024, 5, 17, 8)),
            "2024-05-17 08:30:00 UTC+09:00"
        );
    }

    #[test]
    fn now_is_in_kst() {
        assert_eq!(now_kst().offset().local_minus_utc(), KST_OFFSET_SECS);
    }
}
