//! Booking pricing and initial lifecycle status.
//!
//! Everything here is a pure function of its arguments. "Today" is always
//! passed in by the caller, see [`crate::domain::Clock`].

use std::fmt;

use thiserror::Error;
use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use tracing::warn;

use super::entities::{BookingStatus, Cabin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Start => f.write_str("start"),
            DateField::End => f.write_str("end"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("invalid {field} date: {value:?}")]
    InvalidDate { field: DateField, value: String },
    #[error("end date {end} must be at least one night after start date {start}")]
    InvalidRange { start: Date, end: Date },
}

/// The stay being priced, with dates as supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StayRequest<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub num_guests: u32,
    pub has_breakfast: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StayPricing {
    pub cabin_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
}

impl StayPricing {
    pub fn new(cabin_price: f64, extras_price: f64) -> Self {
        Self {
            cabin_price,
            extras_price,
            total_price: cabin_price + extras_price,
        }
    }
}

/// Derived fields persisted alongside a new booking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BookingQuote {
    pub num_nights: u32,
    pub cabin_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
    pub status: BookingStatus,
}

/// Parses a booking date, accepting date-only strings (`2026-10-19`),
/// RFC 3339 / ISO 8601 timestamps with or without an offset, and the
/// `YYYY-MM-DD HH:MM:SS` form. Timestamps with an offset are converted to UTC
/// before the time of day is dropped.
pub fn parse_booking_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();

    if let Ok(stamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(stamp.to_offset(UtcOffset::UTC).date());
    }
    if let Ok(stamp) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(stamp.to_offset(UtcOffset::UTC).date());
    }
    if let Ok(stamp) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(stamp.date());
    }
    if let Ok(stamp) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Some(stamp.date());
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

fn parse_field(raw: &str, field: DateField) -> Result<Date, QuoteError> {
    parse_booking_date(raw).ok_or_else(|| QuoteError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Whole calendar days from `start` to `end`; negative when `end` is earlier.
pub fn days_between(end: Date, start: Date) -> i64 {
    (end - start).whole_days()
}

pub fn cabin_price(num_nights: u32, cabin: &Cabin) -> f64 {
    num_nights as f64 * cabin.nightly_rate()
}

pub fn extras_price(
    num_nights: u32,
    has_breakfast: bool,
    num_guests: u32,
    breakfast_price: f64,
) -> f64 {
    if has_breakfast {
        num_nights as f64 * breakfast_price * num_guests as f64
    } else {
        0.0
    }
}

pub fn price_stay(
    num_nights: u32,
    cabin: &Cabin,
    has_breakfast: bool,
    num_guests: u32,
    breakfast_price: f64,
) -> StayPricing {
    StayPricing::new(
        cabin_price(num_nights, cabin),
        extras_price(num_nights, has_breakfast, num_guests, breakfast_price),
    )
}

/// Initial lifecycle status of a stay relative to `today`.
///
/// A same-day stay on today (`start == end == today`) counts as checked in.
pub fn derive_status(start: Date, end: Date, today: Date) -> BookingStatus {
    if end < today {
        BookingStatus::CheckedOut
    } else if start == today && end == today {
        BookingStatus::CheckedIn
    } else if start >= today {
        BookingStatus::Unconfirmed
    } else if start <= today && end >= today {
        BookingStatus::CheckedIn
    } else {
        warn!(%start, %end, %today, "booking dates fell through status derivation");
        BookingStatus::Unconfirmed
    }
}

/// Prices a new booking and derives its initial status.
pub fn quote_booking(
    request: &StayRequest<'_>,
    cabin: &Cabin,
    breakfast_price: f64,
    today: Date,
) -> Result<BookingQuote, QuoteError> {
    let start = parse_field(request.start_date, DateField::Start)?;
    let end = parse_field(request.end_date, DateField::End)?;

    let nights = days_between(end, start);
    if nights < 1 {
        return Err(QuoteError::InvalidRange { start, end });
    }
    let num_nights = u32::try_from(nights).map_err(|_| QuoteError::InvalidRange { start, end })?;

    let pricing = price_stay(
        num_nights,
        cabin,
        request.has_breakfast,
        request.num_guests,
        breakfast_price,
    );

    Ok(BookingQuote {
        num_nights,
        cabin_price: pricing.cabin_price,
        extras_price: pricing.extras_price,
        total_price: pricing.total_price,
        status: derive_status(start, end, today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Duration};

    const TODAY: Date = date!(2026 - 10 - 19);

    fn cabin(regular_price: f64, discount: f64) -> Cabin {
        Cabin {
            id: Some(1),
            name: "Lakeside Retreat".into(),
            max_capacity: 6,
            regular_price,
            discount,
            description: String::new(),
            image: None,
        }
    }

    fn iso(offset_days: i64) -> String {
        (TODAY + Duration::days(offset_days)).to_string()
    }

    fn quote(
        start: &str,
        end: &str,
        has_breakfast: bool,
        num_guests: u32,
    ) -> Result<BookingQuote, QuoteError> {
        let request = StayRequest {
            start_date: start,
            end_date: end,
            num_guests,
            has_breakfast,
        };
        quote_booking(&request, &cabin(300.0, 50.0), 15.0, TODAY)
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(parse_booking_date("2026-10-19"), Some(TODAY));
        assert_eq!(parse_booking_date("2026-10-19T00:00:00"), Some(TODAY));
        assert_eq!(parse_booking_date("2026-10-19T18:45:10.123"), Some(TODAY));
        assert_eq!(parse_booking_date("2026-10-19T08:00:00+00:00"), Some(TODAY));
        assert_eq!(parse_booking_date("2026-10-19T08:00:00Z"), Some(TODAY));
        assert_eq!(parse_booking_date("2026-10-19 23:59:59"), Some(TODAY));
        // 23:30 at UTC-05:00 is already the next day in UTC.
        assert_eq!(
            parse_booking_date("2026-10-18T23:30:00-05:00"),
            Some(date!(2026 - 10 - 19))
        );
        assert_eq!(parse_booking_date("not a date"), None);
        assert_eq!(parse_booking_date("2026-13-40"), None);
    }

    #[test]
    fn days_between_ignores_time_of_day() {
        let start = parse_booking_date("2026-10-19T22:00:00").unwrap();
        let end = parse_booking_date("2026-10-22T01:00:00").unwrap();
        assert_eq!(days_between(end, start), 3);
        assert_eq!(days_between(start, end), -3);
    }

    #[test]
    fn future_stay_is_unconfirmed() {
        let quote = quote(&iso(5), &iso(8), false, 2).unwrap();
        assert_eq!(quote.num_nights, 3);
        assert_eq!(quote.status, BookingStatus::Unconfirmed);
    }

    #[test]
    fn ongoing_stay_is_checked_in() {
        let quote = quote(&iso(-3), &iso(2), false, 2).unwrap();
        assert_eq!(quote.num_nights, 5);
        assert_eq!(quote.status, BookingStatus::CheckedIn);
    }

    #[test]
    fn finished_stay_is_checked_out() {
        let quote = quote(&iso(-10), &iso(-2), false, 2).unwrap();
        assert_eq!(quote.num_nights, 8);
        assert_eq!(quote.status, BookingStatus::CheckedOut);
    }

    #[test]
    fn same_day_stay_today_is_checked_in() {
        assert_eq!(derive_status(TODAY, TODAY, TODAY), BookingStatus::CheckedIn);
    }

    #[test]
    fn status_boundaries() {
        let yesterday = TODAY - Duration::days(1);
        let tomorrow = TODAY + Duration::days(1);

        // Arriving today: not yet checked in.
        assert_eq!(derive_status(TODAY, tomorrow, TODAY), BookingStatus::Unconfirmed);
        // Departing today: still in the cabin.
        assert_eq!(derive_status(yesterday, TODAY, TODAY), BookingStatus::CheckedIn);
        // Departed yesterday.
        assert_eq!(
            derive_status(yesterday - Duration::days(2), yesterday, TODAY),
            BookingStatus::CheckedOut
        );
        // Same-day stay in the past or future follows the ordinary rules.
        assert_eq!(derive_status(yesterday, yesterday, TODAY), BookingStatus::CheckedOut);
        assert_eq!(derive_status(tomorrow, tomorrow, TODAY), BookingStatus::Unconfirmed);
    }

    #[test]
    fn prices_discounted_stay_with_breakfast() {
        let quote = quote(&iso(5), &iso(8), true, 2).unwrap();
        assert_eq!(quote.num_nights, 3);
        assert_eq!(quote.cabin_price, 750.0);
        assert_eq!(quote.extras_price, 90.0);
        assert_eq!(quote.total_price, 840.0);
    }

    #[test]
    fn no_breakfast_means_no_extras() {
        let quote = quote(&iso(1), &iso(4), false, 4).unwrap();
        assert_eq!(quote.extras_price, 0.0);
        assert_eq!(quote.total_price, quote.cabin_price + quote.extras_price);
    }

    #[test]
    fn total_is_always_cabin_plus_extras() {
        for nights in 1..=30 {
            for guests in 1..=6 {
                let breakfast = guests % 2 == 0;
                let pricing = price_stay(nights, &cabin(450.0, 50.0), breakfast, guests, 15.0);
                assert_eq!(pricing.total_price, pricing.cabin_price + pricing.extras_price);
                assert!(pricing.cabin_price >= 0.0 && pricing.extras_price >= 0.0);
            }
        }
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = quote(&iso(4), &iso(1), true, 2).unwrap_err();
        assert_eq!(
            err,
            QuoteError::InvalidRange {
                start: TODAY + Duration::days(4),
                end: TODAY + Duration::days(1),
            }
        );
    }

    #[test]
    fn zero_night_stay_is_rejected() {
        let err = quote(&iso(0), &iso(0), false, 1).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidRange { .. }));
    }

    #[test]
    fn unparsable_date_is_reported_not_defaulted() {
        let err = quote("soon", &iso(3), false, 1).unwrap_err();
        assert_eq!(
            err,
            QuoteError::InvalidDate {
                field: DateField::Start,
                value: "soon".into(),
            }
        );

        let err = quote(&iso(3), "", false, 1).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidDate { field: DateField::End, .. }));
    }
}
