//! Plain-text rendering of sun reports and error messages.
//!
//! Every function here is pure: all display values arrive as parameters.

use chrono::NaiveDate;

use crate::{
    LookupError,
    model::{DaySunData, SunReport},
};

/// How an error should be surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking prompt the user has to acknowledge; the dashboard is left alone.
    Alert(String),
    /// Replaces the dashboard contents.
    DashboardError(String),
}

pub fn notice_for(err: &LookupError) -> Notice {
    match err {
        LookupError::NoMatchFound(_) => Notice::Alert(err.user_message()),
        _ => Notice::DashboardError(err.user_message()),
    }
}

/// Long US-style date, e.g. "Monday, January 1, 2024".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn render_day(
    label: &str,
    date: NaiveDate,
    data: &DaySunData,
    place_label: Option<&str>,
) -> String {
    let timezone = match place_label {
        Some(place) => format!("Time Zone of {place}"),
        None => "Time Zone".to_string(),
    };

    format!(
        "{label}\n{date}\n  \
         Sunrise {label}: {sunrise}\n  \
         Dawn {label}: {dawn}\n  \
         Day Length {label}: {day_length}\n  \
         Solar Noon {label}: {solar_noon}\n  \
         {timezone}: {tz}\n  \
         Sunset {label}: {sunset}\n  \
         Dusk {label}: {dusk}",
        date = format_long_date(date),
        sunrise = data.sunrise,
        dawn = data.dawn,
        day_length = data.day_length,
        solar_noon = data.solar_noon,
        tz = data.timezone,
        sunset = data.sunset,
        dusk = data.dusk,
    )
}

/// Section shown when a day's data could not be fetched.
pub fn render_missing_day(label: &str, date: NaiveDate) -> String {
    format!("{label}\n{}\n  Sun data unavailable.", format_long_date(date))
}

pub fn render_report(report: &SunReport) -> String {
    let place = report.place.label.as_deref();
    let today = render_day("Today", report.date, &report.today, place);
    let tomorrow = match &report.tomorrow {
        Some(data) => render_day("Tomorrow", report.tomorrow_date(), data, place),
        None => render_missing_day("Tomorrow", report.tomorrow_date()),
    };

    format!("{today}\n\n{tomorrow}\n")
}

pub fn render_error(message: &str) -> String {
    format!("{message}\n")
}
