use crate::domain::series::Granularity;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

/// Converts a provider unix timestamp to the trading date on the exchange's local clock.
///
/// Daily bars are stamped at the session open in exchange time; reading them as UTC would
/// shift NSE bars (UTC+5:30) onto the previous calendar day.
pub fn exchange_local_date(unix_secs: i64, gmtoffset_secs: i32) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(gmtoffset_secs)?;
    let utc = DateTime::from_timestamp(unix_secs, 0)?;
    Some(utc.with_timezone(&offset).date_naive())
}

/// Label of the calendar bucket containing `date`: the last day of its month, quarter or year.
pub fn period_end(date: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Daily => Some(date),
        Granularity::Monthly => last_day_of_month(date.year(), date.month()),
        Granularity::Quarterly => {
            let quarter_end_month = ((date.month() - 1) / 3 + 1) * 3;
            last_day_of_month(date.year(), quarter_end_month)
        }
        Granularity::Yearly => NaiveDate::from_ymd_opt(date.year(), 12, 31),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
