//! Operator-driven check-in and check-out.
//!
//! Once a booking exists its stored status is authoritative; it moves only
//! through the transitions below and is never re-derived from its dates.

use thiserror::Error;

use super::entities::{Booking, BookingStatus, BookingUpdate};
use super::pricing::{extras_price, StayPricing};
use super::settings::BookingSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} booking #{id} while it is {status}")]
    InvalidStatus {
        id: i64,
        action: &'static str,
        status: BookingStatus,
    },
    #[error("payment for booking #{0} has not been confirmed")]
    PaymentNotConfirmed(i64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckinOptions {
    /// Operator confirmed the guest paid the (possibly updated) total.
    pub confirm_paid: bool,
    /// Add breakfast for the whole stay at check-in.
    pub add_breakfast: bool,
}

/// Price of adding breakfast to the whole stay.
pub fn optional_breakfast_price(booking: &Booking, settings: &BookingSettings) -> f64 {
    extras_price(
        booking.num_nights,
        true,
        booking.num_guests,
        settings.breakfast_price,
    )
}

/// Amount the guest owes at check-in given the chosen options.
pub fn amount_due(booking: &Booking, options: CheckinOptions, settings: &BookingSettings) -> f64 {
    if options.add_breakfast && !booking.has_breakfast {
        StayPricing::new(
            booking.cabin_price,
            optional_breakfast_price(booking, settings),
        )
        .total_price
    } else {
        booking.total_price
    }
}

pub fn check_in(
    booking: &Booking,
    options: CheckinOptions,
    settings: &BookingSettings,
) -> Result<BookingUpdate, TransitionError> {
    if booking.status != BookingStatus::Unconfirmed {
        return Err(TransitionError::InvalidStatus {
            id: booking.id,
            action: "check in",
            status: booking.status,
        });
    }
    if !options.confirm_paid {
        return Err(TransitionError::PaymentNotConfirmed(booking.id));
    }

    let mut update = BookingUpdate {
        status: Some(BookingStatus::CheckedIn),
        is_paid: Some(true),
        ..Default::default()
    };

    if options.add_breakfast && !booking.has_breakfast {
        let pricing = StayPricing::new(
            booking.cabin_price,
            optional_breakfast_price(booking, settings),
        );
        update.has_breakfast = Some(true);
        update.extras_price = Some(pricing.extras_price);
        update.total_price = Some(pricing.total_price);
    }

    Ok(update)
}

pub fn check_out(booking: &Booking) -> Result<BookingUpdate, TransitionError> {
    if booking.status != BookingStatus::CheckedIn {
        return Err(TransitionError::InvalidStatus {
            id: booking.id,
            action: "check out",
            status: booking.status,
        });
    }

    Ok(BookingUpdate {
        status: Some(BookingStatus::CheckedOut),
        ..Default::default()
    })
}
