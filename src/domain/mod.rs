//! Booking domain rules: pricing, lifecycle and reporting.

pub mod activity;
pub mod clock;
pub mod entities;
pub mod lifecycle;
pub mod pricing;
pub mod settings;
pub mod stats;

pub use activity::{
    classify_activity, today_activities, ActivityAction, ActivityKind, TodayActivity,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entities::{
    Booking, BookingSales, BookingStatus, BookingUpdate, Cabin, CabinSummary, Guest, GuestSummary,
    NewBooking, RawBooking, RecordId,
};
pub use lifecycle::{
    amount_due, check_in, check_out, optional_breakfast_price, CheckinOptions, TransitionError,
};
pub use pricing::{
    derive_status, parse_booking_date, price_stay, quote_booking, BookingQuote, DateField,
    QuoteError, StayPricing, StayRequest,
};
pub use settings::{BookingSettings, SettingsError};
pub use stats::{confirmed_stays, monthly_sales, DashboardStats, MonthlySales};
