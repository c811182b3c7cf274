use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the backing store.
pub type RecordId = i64;

/// Lifecycle status of a booking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Not yet arrived.
    #[default]
    Unconfirmed,
    /// Currently staying.
    CheckedIn,
    /// Stay completed.
    CheckedOut,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Unconfirmed => "unconfirmed",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::CheckedOut => "checked-out",
        }
    }

    /// Human-readable label, e.g. "checked in".
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cabin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub max_capacity: u32,
    pub regular_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Cabin {
    /// Nightly rate after the discount.
    pub fn nightly_rate(&self) -> f64 {
        self.regular_price - self.discount
    }

    /// Pricing inputs are usable when both amounts are finite, non-negative
    /// and the discount does not exceed the regular price.
    pub fn has_valid_pricing(&self) -> bool {
        self.regular_price.is_finite()
            && self.discount.is_finite()
            && self.regular_price >= 0.0
            && self.discount >= 0.0
            && self.discount <= self.regular_price
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(rename = "nationalID", default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub country_flag: Option<String>,
}

/// A booking as supplied by the seed data, before pricing and reference
/// resolution. `cabin_id` / `guest_id` are 1-based positions in the seed
/// cabin and guest lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBooking {
    pub start_date: String,
    pub end_date: String,
    pub cabin_id: i64,
    pub guest_id: i64,
    pub num_guests: u32,
    #[serde(default)]
    pub has_breakfast: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub observations: Option<String>,
}

/// A priced booking ready to be inserted into the backing store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub start_date: String,
    pub end_date: String,
    pub num_nights: u32,
    pub num_guests: u32,
    pub cabin_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub has_breakfast: bool,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub cabin_id: RecordId,
    pub guest_id: RecordId,
}

/// A booking as stored in the backing store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: RecordId,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub num_nights: u32,
    pub num_guests: u32,
    pub cabin_price: f64,
    #[serde(default)]
    pub extras_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub has_breakfast: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub cabin_id: Option<RecordId>,
    #[serde(default)]
    pub guest_id: Option<RecordId>,
    /// Embedded guest row, when the query selected it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<GuestSummary>,
    /// Embedded cabin row, when the query selected it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabins: Option<CabinSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub country_flag: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CabinSummary {
    #[serde(default)]
    pub name: String,
}

/// Sales columns of a booking, as loaded for the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSales {
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    pub total_price: f64,
    #[serde(default)]
    pub extras_price: f64,
}

impl From<&Booking> for BookingSales {
    fn from(booking: &Booking) -> Self {
        Self {
            created_at: booking.created_at.clone(),
            total_price: booking.total_price,
            extras_price: booking.extras_price,
        }
    }
}

/// Partial update issued against a stored booking.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_breakfast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

impl BookingUpdate {
    /// Applies the update to a local copy of the booking.
    pub fn apply_to(&self, booking: &mut Booking) {
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(is_paid) = self.is_paid {
            booking.is_paid = is_paid;
        }
        if let Some(has_breakfast) = self.has_breakfast {
            booking.has_breakfast = has_breakfast;
        }
        if let Some(extras_price) = self.extras_price {
            booking.extras_price = extras_price;
        }
        if let Some(total_price) = self.total_price {
            booking.total_price = total_price;
        }
    }
}
