use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use crate::{
    backend::{BackendError, ReservationBackend},
    configuration::Configuration,
    local_backend::{fallback_menu, restaurant_info},
    types::{
        Availability, Menu, NewsletterRequest, ReservationConfirmation, ReservationRequest,
        RestaurantInfo,
    },
};

#[derive(Debug, Clone)]
pub enum MockResponse {
    Success,
    Rejected(Option<String>),
    NetworkFailure,
    Malformed,
}

pub struct MockReservationBackendInner {
    pub response: Mutex<MockResponse>,
    /// While set, reservation submissions wait for a permit on `release`.
    pub hold_submissions: AtomicBool,
    pub release: Semaphore,
    pub calls_to_restaurant_info: AtomicU64,
    pub calls_to_menu: AtomicU64,
    pub calls_to_submit_reservation: AtomicU64,
    pub calls_to_subscribe_newsletter: AtomicU64,
    pub calls_to_check_availability: AtomicU64,
}

#[derive(Clone)]
pub struct MockReservationBackend(pub Arc<MockReservationBackendInner>);

impl MockReservationBackendInner {
    fn new() -> Self {
        Self {
            response: Mutex::new(MockResponse::Success),
            hold_submissions: AtomicBool::new(false),
            release: Semaphore::new(0),
            calls_to_restaurant_info: AtomicU64::default(),
            calls_to_menu: AtomicU64::default(),
            calls_to_submit_reservation: AtomicU64::default(),
            calls_to_subscribe_newsletter: AtomicU64::default(),
            calls_to_check_availability: AtomicU64::default(),
        }
    }
}

impl MockReservationBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockReservationBackendInner::new()))
    }

    fn result(&self) -> Result<(), BackendError> {
        let response = self.0.response.lock().unwrap().clone();
        match response {
            MockResponse::Success => Ok(()),
            MockResponse::Rejected(message) => Err(BackendError::Rejected {
                status: 400,
                message,
            }),
            MockResponse::NetworkFailure => Err(transport_error()),
            MockResponse::Malformed => {
                Err(BackendError::MalformedResponse("Supposed to fail".into()))
            }
        }
    }
}

/// A genuine `reqwest::Error`, produced without touching the network.
fn transport_error() -> BackendError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    BackendError::Transport(err)
}

impl ReservationBackend for MockReservationBackend {
    async fn restaurant_info(&self) -> Result<RestaurantInfo, BackendError> {
        self.0.calls_to_restaurant_info.fetch_add(1, Ordering::SeqCst);
        self.result().map(|_| restaurant_info())
    }

    async fn menu(&self) -> Result<Menu, BackendError> {
        self.0.calls_to_menu.fetch_add(1, Ordering::SeqCst);
        self.result().map(|_| fallback_menu())
    }

    async fn submit_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BackendError> {
        self.0
            .calls_to_submit_reservation
            .fetch_add(1, Ordering::SeqCst);
        if self.0.hold_submissions.load(Ordering::SeqCst) {
            self.0.release.acquire().await.unwrap().forget();
        }
        self.result().map(|_| ReservationConfirmation {
            message: "Reservation confirmed successfully!".into(),
            table_number: 1,
            time_slot: request.time_slot.to_rfc3339(),
            reservation_id: Some(1),
        })
    }

    async fn subscribe_newsletter(
        &self,
        _request: &NewsletterRequest,
    ) -> Result<String, BackendError> {
        self.0
            .calls_to_subscribe_newsletter
            .fetch_add(1, Ordering::SeqCst);
        self.result()
            .map(|_| "Successfully subscribed to newsletter".into())
    }

    async fn check_availability(
        &self,
        time_slot: DateTime<Utc>,
    ) -> Result<Availability, BackendError> {
        self.0
            .calls_to_check_availability
            .fetch_add(1, Ordering::SeqCst);
        self.result().map(|_| Availability {
            time_slot,
            available_tables: 30,
            total_tables: 30,
            is_available: true,
        })
    }
}

#[derive(Clone)]
pub struct TestConfiguration {
    pub frontend_path: PathBuf,
}

impl Configuration for TestConfiguration {
    fn website_title(&self) -> String {
        "Test Bistro".into()
    }

    fn frontend_path(&self) -> PathBuf {
        self.frontend_path.clone()
    }

    fn port(&self) -> String {
        "0".into()
    }

    fn backend_url(&self) -> Option<String> {
        None
    }

    fn request_timeout(&self) -> Option<Duration> {
        None
    }
}
