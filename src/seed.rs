//! Sample-data seeding: wipes and refills the cabins, guests and bookings
//! tables. Every booking is priced and given its initial status here, once.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;
use time::Date;
use tracing::{info, warn};

use crate::domain::{
    quote_booking, BookingSettings, Cabin, Clock, Guest, NewBooking, QuoteError, RawBooking,
    RecordId, StayRequest,
};
use crate::infra::{StoreClient, StoreError, Table};
use crate::util::format::format_currency;

const CABINS_FILE: &str = "cabins.json";
const GUESTS_FILE: &str = "guests.json";
const BOOKINGS_FILE: &str = "bookings.json";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RejectReason {
    #[error("cabin {0} not found")]
    UnknownCabin(i64),
    #[error("guest {0} not found")]
    UnknownGuest(i64),
    #[error("cabin {0:?} has invalid pricing")]
    InvalidCabinPricing(String),
    #[error("booking has no guests")]
    NoGuests,
    #[error("{num_guests} guests exceeds the limit of {limit}")]
    TooManyGuests { num_guests: u32, limit: u32 },
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RejectedBooking {
    /// Position in the seed bookings list.
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreparedBookings {
    pub bookings: Vec<NewBooking>,
    pub rejected: Vec<RejectedBooking>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeedReport {
    pub inserted: usize,
    pub rejected: Vec<RejectedBooking>,
    pub total_sales: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeedData {
    pub cabins: Vec<Cabin>,
    pub guests: Vec<Guest>,
    pub bookings: Vec<RawBooking>,
}

impl SeedData {
    /// Reads `cabins.json`, `guests.json` and `bookings.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, SeedError> {
        Ok(Self {
            cabins: read_json(&dir.join(CABINS_FILE))?,
            guests: read_json(&dir.join(GUESTS_FILE))?,
            bookings: read_json(&dir.join(BOOKINGS_FILE))?,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    let data = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves seed references and prices every booking.
///
/// `cabin_id` / `guest_id` in the raw records are 1-based positions; they map
/// onto `cabins`/`cabin_ids` and `guest_ids` by index. Records that cannot be
/// resolved or priced are returned in `rejected` rather than defaulted.
pub fn prepare_bookings(
    raw: &[RawBooking],
    cabins: &[Cabin],
    cabin_ids: &[RecordId],
    guest_ids: &[RecordId],
    settings: &BookingSettings,
    today: Date,
) -> PreparedBookings {
    let mut prepared = PreparedBookings::default();

    for (index, booking) in raw.iter().enumerate() {
        match prepare_one(booking, cabins, cabin_ids, guest_ids, settings, today) {
            Ok(new_booking) => prepared.bookings.push(new_booking),
            Err(reason) => {
                warn!(index, %reason, "skipping seed booking");
                prepared.rejected.push(RejectedBooking { index, reason });
            }
        }
    }

    prepared
}

fn position(reference: i64) -> Option<usize> {
    usize::try_from(reference).ok()?.checked_sub(1)
}

fn prepare_one(
    booking: &RawBooking,
    cabins: &[Cabin],
    cabin_ids: &[RecordId],
    guest_ids: &[RecordId],
    settings: &BookingSettings,
    today: Date,
) -> Result<NewBooking, RejectReason> {
    let cabin_index = position(booking.cabin_id);
    let (cabin, cabin_id) = cabin_index
        .and_then(|i| Some((cabins.get(i)?, *cabin_ids.get(i)?)))
        .ok_or(RejectReason::UnknownCabin(booking.cabin_id))?;
    let guest_id = position(booking.guest_id)
        .and_then(|i| guest_ids.get(i).copied())
        .ok_or(RejectReason::UnknownGuest(booking.guest_id))?;

    if !cabin.has_valid_pricing() {
        return Err(RejectReason::InvalidCabinPricing(cabin.name.clone()));
    }
    if booking.num_guests == 0 {
        return Err(RejectReason::NoGuests);
    }
    let limit = settings.max_guests_per_booking.min(cabin.max_capacity);
    if booking.num_guests > limit {
        return Err(RejectReason::TooManyGuests {
            num_guests: booking.num_guests,
            limit,
        });
    }

    let request = StayRequest {
        start_date: &booking.start_date,
        end_date: &booking.end_date,
        num_guests: booking.num_guests,
        has_breakfast: booking.has_breakfast,
    };
    let quote = quote_booking(&request, cabin, settings.breakfast_price, today)?;

    if !settings.allows_length(quote.num_nights) {
        warn!(
            nights = quote.num_nights,
            min = settings.min_booking_length,
            max = settings.max_booking_length,
            "seed booking length outside configured limits"
        );
    }

    Ok(NewBooking {
        start_date: booking.start_date.clone(),
        end_date: booking.end_date.clone(),
        num_nights: quote.num_nights,
        num_guests: booking.num_guests,
        cabin_price: quote.cabin_price,
        extras_price: quote.extras_price,
        total_price: quote.total_price,
        status: quote.status,
        has_breakfast: booking.has_breakfast,
        is_paid: booking.is_paid,
        observations: booking.observations.clone(),
        cabin_id,
        guest_id,
    })
}

/// Replaces all cabins, guests and bookings with the seed data.
pub async fn upload_all(
    client: &StoreClient,
    data: &SeedData,
    settings: &BookingSettings,
    clock: &impl Clock,
) -> Result<SeedReport, SeedError> {
    // Bookings reference guests and cabins, so they go first.
    client.delete_all(Table::Bookings).await?;
    client.delete_all(Table::Guests).await?;
    client.delete_all(Table::Cabins).await?;

    client.insert(Table::Guests, &data.guests).await?;
    client.insert(Table::Cabins, &data.cabins).await?;
    create_bookings(client, data, settings, clock).await
}

/// Replaces only the bookings, keeping existing cabins and guests.
pub async fn upload_bookings(
    client: &StoreClient,
    data: &SeedData,
    settings: &BookingSettings,
    clock: &impl Clock,
) -> Result<SeedReport, SeedError> {
    client.delete_all(Table::Bookings).await?;
    create_bookings(client, data, settings, clock).await
}

async fn create_bookings(
    client: &StoreClient,
    data: &SeedData,
    settings: &BookingSettings,
    clock: &impl Clock,
) -> Result<SeedReport, SeedError> {
    let guest_ids = client.list_ids(Table::Guests).await?;
    let cabin_ids = client.list_ids(Table::Cabins).await?;

    let prepared = prepare_bookings(
        &data.bookings,
        &data.cabins,
        &cabin_ids,
        &guest_ids,
        settings,
        clock.today(),
    );
    client.insert(Table::Bookings, &prepared.bookings).await?;

    let total_sales = prepared.bookings.iter().map(|b| b.total_price).sum();
    info!(
        inserted = prepared.bookings.len(),
        rejected = prepared.rejected.len(),
        sales = %format_currency(total_sales),
        "seeded bookings"
    );

    Ok(SeedReport {
        inserted: prepared.bookings.len(),
        rejected: prepared.rejected,
        total_sales,
    })
}
