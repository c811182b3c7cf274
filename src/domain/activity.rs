use time::Date;

use super::entities::{Booking, BookingStatus};
use super::pricing::parse_booking_date;

/// Kind of movement a booking has today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Arriving,
    Departing,
    /// Same-day stay: arrives and leaves today.
    ArrivingDeparting,
}

/// Operator action offered for a today activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityAction {
    CheckIn,
    CheckOut,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TodayActivity<'a> {
    pub booking: &'a Booking,
    pub kind: ActivityKind,
}

pub fn classify_activity(booking: &Booking, today: Date) -> Option<ActivityKind> {
    let starts_today = parse_booking_date(&booking.start_date) == Some(today);
    let ends_today = parse_booking_date(&booking.end_date) == Some(today);

    match (starts_today, ends_today) {
        (true, true) => Some(ActivityKind::ArrivingDeparting),
        (true, false) => Some(ActivityKind::Arriving),
        (false, true) => Some(ActivityKind::Departing),
        (false, false) => None,
    }
}

/// Bookings that start or end today, ordered by start date.
pub fn today_activities(bookings: &[Booking], today: Date) -> Vec<TodayActivity<'_>> {
    let mut activities: Vec<_> = bookings
        .iter()
        .filter_map(|booking| {
            classify_activity(booking, today).map(|kind| TodayActivity { booking, kind })
        })
        .collect();

    activities.sort_by_key(|activity| parse_booking_date(&activity.booking.start_date));
    activities
}

impl TodayActivity<'_> {
    pub fn action(&self) -> Option<ActivityAction> {
        match (self.kind, self.booking.status) {
            // A departing booking that never checked in is still an arrival.
            (ActivityKind::Departing, BookingStatus::Unconfirmed)
            | (ActivityKind::Arriving, BookingStatus::Unconfirmed)
            | (ActivityKind::ArrivingDeparting, BookingStatus::Unconfirmed) => {
                Some(ActivityAction::CheckIn)
            }
            (ActivityKind::Departing, BookingStatus::CheckedIn)
            | (ActivityKind::ArrivingDeparting, BookingStatus::CheckedIn) => {
                Some(ActivityAction::CheckOut)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match (self.kind, self.booking.status) {
            (ActivityKind::Arriving, BookingStatus::Unconfirmed)
            | (ActivityKind::Departing, BookingStatus::Unconfirmed) => "Arriving",
            (ActivityKind::Arriving, BookingStatus::CheckedIn) => "Checked in today",
            (ActivityKind::Departing, BookingStatus::CheckedIn) => "Departing",
            (ActivityKind::Departing, BookingStatus::CheckedOut) => "Checked out today",
            (ActivityKind::ArrivingDeparting, BookingStatus::Unconfirmed) => {
                "Day trip - Arriving"
            }
            (ActivityKind::ArrivingDeparting, BookingStatus::CheckedIn) => {
                "Day trip - Departing"
            }
            (ActivityKind::ArrivingDeparting, BookingStatus::CheckedOut) => {
                "Day trip - Completed"
            }
            (ActivityKind::Arriving, BookingStatus::CheckedOut) => "Checked out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 19);

    fn booking(id: i64, start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id,
            created_at: None,
            start_date: start.into(),
            end_date: end.into(),
            num_nights: 1,
            num_guests: 1,
            cabin_price: 200.0,
            extras_price: 0.0,
            total_price: 200.0,
            status,
            has_breakfast: false,
            is_paid: false,
            observations: None,
            cabin_id: None,
            guest_id: None,
            guests: None,
            cabins: None,
        }
    }

    #[test]
    fn classifies_by_start_and_end() {
        let arriving = booking(
            1,
            "2026-10-19T00:00:00",
            "2026-10-22",
            BookingStatus::Unconfirmed,
        );
        let departing = booking(
            2,
            "2026-10-15",
            "2026-10-19T00:00:00+00:00",
            BookingStatus::CheckedIn,
        );
        let day_trip = booking(3, "2026-10-19", "2026-10-19", BookingStatus::CheckedIn);
        let other = booking(4, "2026-10-20", "2026-10-25", BookingStatus::Unconfirmed);

        assert_eq!(classify_activity(&arriving, TODAY), Some(ActivityKind::Arriving));
        assert_eq!(classify_activity(&departing, TODAY), Some(ActivityKind::Departing));
        assert_eq!(
            classify_activity(&day_trip, TODAY),
            Some(ActivityKind::ArrivingDeparting)
        );
        assert_eq!(classify_activity(&other, TODAY), None);
    }

    #[test]
    fn lists_today_activities_in_start_order() {
        let bookings = vec![
            booking(1, "2026-10-19", "2026-10-23", BookingStatus::Unconfirmed),
            booking(2, "2026-10-20", "2026-10-25", BookingStatus::Unconfirmed),
            booking(3, "2026-10-12", "2026-10-19", BookingStatus::CheckedIn),
            booking(4, "not a date", "2026-10-19", BookingStatus::CheckedIn),
        ];

        let ids: Vec<_> = today_activities(&bookings, TODAY)
            .iter()
            .map(|activity| activity.booking.id)
            .collect();
        assert_eq!(ids, vec![4, 3, 1]);
    }

    #[test]
    fn offers_the_matching_operator_action() {
        use ActivityAction::{CheckIn, CheckOut};
        use ActivityKind::{Arriving, ArrivingDeparting, Departing};
        use BookingStatus::{CheckedIn, CheckedOut, Unconfirmed};

        let cases = [
            (Arriving, Unconfirmed, Some(CheckIn), "Arriving"),
            (Arriving, CheckedIn, None, "Checked in today"),
            (Departing, Unconfirmed, Some(CheckIn), "Arriving"),
            (Departing, CheckedIn, Some(CheckOut), "Departing"),
            (Departing, CheckedOut, None, "Checked out today"),
            (ArrivingDeparting, Unconfirmed, Some(CheckIn), "Day trip - Arriving"),
            (ArrivingDeparting, CheckedIn, Some(CheckOut), "Day trip - Departing"),
            (ArrivingDeparting, CheckedOut, None, "Day trip - Completed"),
        ];

        for (kind, status, action, label) in cases {
            let stored = booking(9, "2026-10-19", "2026-10-19", status);
            let activity = TodayActivity {
                booking: &stored,
                kind,
            };
            assert_eq!(activity.action(), action, "{kind:?} / {status}");
            assert_eq!(activity.label(), label, "{kind:?} / {status}");
        }
    }
}
