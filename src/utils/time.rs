use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc, Weekday};

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT).ok()
}

/// Format a date as YYYY-MM-DD
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Join dates into the comma separated form the booking endpoint expects
pub fn join_dates(dates: &[NaiveDate]) -> String {
    dates.iter().map(format_date).collect::<Vec<_>>().join(",")
}

/// Saturday or Sunday
pub fn is_weekend(date: &NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Same day next month, clamped to the last day of a shorter month
pub fn one_month_after(date: &NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
}

/// Every day from `start` through `end`, inclusive
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Current calendar date in the given timezone
pub fn today_in<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    today_at(Utc::now(), tz)
}

/// Calendar date of `now` as seen from the given timezone
pub fn today_at<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}
