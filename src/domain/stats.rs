use time::{Date, Month};

use super::entities::{Booking, BookingSales, BookingStatus};
use super::pricing::parse_booking_date;

/// Headline figures for the dashboard over the last `num_days`.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardStats {
    pub num_bookings: usize,
    pub sales: f64,
    pub checkins: usize,
    /// Whole percent of cabin-nights occupied.
    pub occupancy: u32,
}

impl DashboardStats {
    pub fn compute(
        bookings: &[BookingSales],
        confirmed_stays: &[&Booking],
        num_days: u32,
        cabin_count: usize,
    ) -> Self {
        let num_bookings = bookings.len();
        let sales = bookings.iter().map(|booking| booking.total_price).sum();
        let checkins = confirmed_stays.len();

        let capacity = cabin_count as f64 * num_days as f64;
        let occupancy = if capacity > 0.0 {
            (checkins as f64 / capacity * 100.0).round() as u32
        } else {
            0
        };

        Self {
            num_bookings,
            sales,
            checkins,
            occupancy,
        }
    }
}

/// Stays where the guest actually showed up.
pub fn confirmed_stays(stays: &[Booking]) -> Vec<&Booking> {
    stays
        .iter()
        .filter(|stay| {
            matches!(
                stay.status,
                BookingStatus::CheckedIn | BookingStatus::CheckedOut
            )
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlySales {
    /// e.g. "Oct 2026".
    pub label: String,
    pub total_sales: f64,
    pub extras_sales: f64,
}

fn month_index(date: Date) -> i64 {
    date.year() as i64 * 12 + (date.month() as i64 - 1)
}

/// Sales per calendar month from the month of `since` through the month of
/// `until`, bucketed by booking creation date. Rows created outside
/// `since..=until`, or without a readable creation date, are left out.
pub fn monthly_sales(sales: &[BookingSales], since: Date, until: Date) -> Vec<MonthlySales> {
    if until < since {
        return Vec::new();
    }

    let first = month_index(since);
    let months = (month_index(until) - first + 1) as usize;
    let mut series: Vec<MonthlySales> = Vec::with_capacity(months);
    let (mut year, mut month) = (since.year(), since.month());

    for _ in 0..months {
        let name = month.to_string();
        series.push(MonthlySales {
            label: format!("{} {year}", &name[..3]),
            total_sales: 0.0,
            extras_sales: 0.0,
        });
        if month == Month::December {
            year += 1;
        }
        month = month.next();
    }

    for row in sales {
        let Some(created) = row.created_at.as_deref().and_then(parse_booking_date) else {
            continue;
        };
        if created < since || created > until {
            continue;
        }
        let entry = &mut series[(month_index(created) - first) as usize];
        entry.total_sales += row.total_price;
        entry.extras_sales += row.extras_price;
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn stay(status: BookingStatus) -> Booking {
        Booking {
            id: 1,
            created_at: None,
            start_date: "2026-10-01".into(),
            end_date: "2026-10-04".into(),
            num_nights: 3,
            num_guests: 2,
            cabin_price: 600.0,
            extras_price: 0.0,
            total_price: 600.0,
            status,
            has_breakfast: false,
            is_paid: true,
            observations: None,
            cabin_id: None,
            guest_id: None,
            guests: None,
            cabins: None,
        }
    }

    fn sale(created_at: Option<&str>, total: f64, extras: f64) -> BookingSales {
        BookingSales {
            created_at: created_at.map(str::to_string),
            total_price: total,
            extras_price: extras,
        }
    }

    #[test]
    fn computes_dashboard_figures() {
        let bookings = vec![
            sale(None, 840.0, 90.0),
            sale(None, 600.0, 0.0),
            sale(None, 300.0, 0.0),
        ];
        let stays = vec![
            stay(BookingStatus::CheckedIn),
            stay(BookingStatus::CheckedOut),
            stay(BookingStatus::Unconfirmed),
        ];
        let confirmed = confirmed_stays(&stays);
        assert_eq!(confirmed.len(), 2);

        let stats = DashboardStats::compute(&bookings, &confirmed, 7, 8);
        assert_eq!(stats.num_bookings, 3);
        assert_eq!(stats.sales, 1740.0);
        assert_eq!(stats.checkins, 2);
        // 2 / 56 = 3.57%
        assert_eq!(stats.occupancy, 4);
    }

    #[test]
    fn occupancy_is_zero_without_capacity() {
        let bookings = vec![sale(None, 100.0, 0.0)];
        let stays = vec![stay(BookingStatus::CheckedIn)];
        let confirmed = confirmed_stays(&stays);
        assert_eq!(DashboardStats::compute(&bookings, &confirmed, 7, 0).occupancy, 0);
        assert_eq!(DashboardStats::compute(&bookings, &confirmed, 0, 4).occupancy, 0);
    }

    #[test]
    fn buckets_sales_over_a_trailing_range() {
        let sales = vec![
            sale(Some("2026-10-02T10:00:00+00:00"), 840.0, 90.0),
            sale(Some("2026-10-18"), 500.0, 0.0),
            sale(Some("2026-01-31T23:00:00"), 250.0, 45.0),
            sale(Some("2025-12-02"), 120.0, 30.0),
            sale(Some("2025-11-14"), 999.0, 0.0),
            sale(Some("2026-10-20"), 999.0, 0.0),
            sale(None, 999.0, 0.0),
        ];

        let series = monthly_sales(&sales, date!(2025 - 11 - 19), date!(2026 - 10 - 19));
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].label, "Nov 2025");
        assert_eq!(series[0].total_sales, 0.0);
        assert_eq!(series[1].label, "Dec 2025");
        assert_eq!(series[1].total_sales, 120.0);
        assert_eq!(series[2].label, "Jan 2026");
        assert_eq!(series[2].total_sales, 250.0);
        assert_eq!(series[2].extras_sales, 45.0);
        assert_eq!(series[11].label, "Oct 2026");
        assert_eq!(series[11].total_sales, 1340.0);
        assert_eq!(series[11].extras_sales, 90.0);
    }

    #[test]
    fn single_month_and_reversed_ranges() {
        let sales = vec![sale(Some("2026-10-05"), 100.0, 0.0)];

        let series = monthly_sales(&sales, date!(2026 - 10 - 01), date!(2026 - 10 - 19));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "Oct 2026");
        assert_eq!(series[0].total_sales, 100.0);

        let reversed = monthly_sales(&sales, date!(2026 - 10 - 19), date!(2026 - 10 - 01));
        assert!(reversed.is_empty());
    }

    #[test]
    fn sales_rows_mirror_stored_bookings() {
        let row = BookingSales::from(&stay(BookingStatus::CheckedOut));
        assert_eq!(row.total_price, 600.0);
        assert_eq!(row.created_at, None);
    }
}
