use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9+\-() ]*$").unwrap();
}

pub const MAX_PARTY_SIZE: u32 = 8;
pub const DEFAULT_PARTY_SIZE: u32 = 2;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const RESERVATION_ERROR_FALLBACK: &str = "An error occurred while making your reservation";

/// A bookable half-hour start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub value: DateTime<Utc>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReservationRequest {
    #[validate(length(min = 1, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_REGEX, message = "phone is invalid"))]
    pub phone: Option<String>,
    pub time_slot: DateTime<Utc>,
    #[validate(range(min = 1, max = 8, message = "number_of_guests must be between 1 and 8"))]
    pub number_of_guests: u32,
    #[serde(default)]
    pub newsletter_signup: bool,
}

/// Success body of `POST /api/reservations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationConfirmation {
    pub message: String,
    pub table_number: u32,
    // The backend answers with a naive ISO string, so keep it verbatim.
    pub time_slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationResult {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ReservationResult {
    pub fn confirmed(confirmation: ReservationConfirmation) -> Self {
        let details = format!(
            "Table {} has been reserved for {}",
            confirmation.table_number, confirmation.time_slot
        );
        Self {
            outcome: Outcome::Success,
            table_number: Some(confirmation.table_number),
            message: confirmation.message,
            details: Some(details),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Error,
            table_number: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterResult {
    pub outcome: Outcome,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub hours: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tables: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub starters: Vec<MenuItem>,
    pub main_courses: Vec<MenuItem>,
    pub desserts: Vec<MenuItem>,
    pub beverages: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub time_slot: DateTime<Utc>,
    pub available_tables: u32,
    pub total_tables: u32,
    pub is_available: bool,
}
