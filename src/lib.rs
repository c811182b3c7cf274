//! Booking administration for a cabin-rental business: pricing and initial
//! status of new bookings, check-in/check-out, today's arrivals and
//! departures, dashboard figures and sample-data seeding against the hosted
//! backing store.

pub mod domain;
pub mod infra;
pub mod seed;
pub mod util;
