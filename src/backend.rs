use crate::types::{
    Availability, Menu, NewsletterRequest, ReservationConfirmation, ReservationRequest,
    RestaurantInfo,
};
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status.
    #[error(
        "backend rejected request ({status}): {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Rejected { status: u16, message: Option<String> },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// The reservation backend: the service of record that assigns tables.
pub trait ReservationBackend: Clone + Send + Sync + 'static {
    fn restaurant_info(&self) -> impl Future<Output = Result<RestaurantInfo, BackendError>> + Send;

    fn menu(&self) -> impl Future<Output = Result<Menu, BackendError>> + Send;

    fn submit_reservation(
        &self,
        request: &ReservationRequest,
    ) -> impl Future<Output = Result<ReservationConfirmation, BackendError>> + Send;

    /// Returns the backend's confirmation message.
    fn subscribe_newsletter(
        &self,
        request: &NewsletterRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    fn check_availability(
        &self,
        time_slot: DateTime<Utc>,
    ) -> impl Future<Output = Result<Availability, BackendError>> + Send;
}
