use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hotel-wide booking settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSettings {
    pub min_booking_length: u32,
    pub max_booking_length: u32,
    pub max_guests_per_booking: u32,
    /// Breakfast price per guest per night.
    pub breakfast_price: f64,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            min_booking_length: 3,
            max_booking_length: 30,
            max_guests_per_booking: 10,
            breakfast_price: 15.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("breakfast price must be a non-negative amount, got {0}")]
    InvalidBreakfastPrice(f64),
    #[error("maximum guests per booking must be at least 1")]
    NoGuestsAllowed,
    #[error("minimum booking length {min} exceeds maximum {max}")]
    InvertedLengthLimits { min: u32, max: u32 },
}

impl BookingSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.breakfast_price.is_finite() || self.breakfast_price < 0.0 {
            return Err(SettingsError::InvalidBreakfastPrice(self.breakfast_price));
        }
        if self.max_guests_per_booking == 0 {
            return Err(SettingsError::NoGuestsAllowed);
        }
        if self.min_booking_length > self.max_booking_length {
            return Err(SettingsError::InvertedLengthLimits {
                min: self.min_booking_length,
                max: self.max_booking_length,
            });
        }
        Ok(())
    }

    pub fn allows_length(&self, num_nights: u32) -> bool {
        (self.min_booking_length..=self.max_booking_length).contains(&num_nights)
    }
}
