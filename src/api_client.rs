use crate::backend::{BackendError, ReservationBackend};
use crate::types::{
    Availability, Menu, NewsletterRequest, ReservationConfirmation, ReservationRequest,
    RestaurantInfo,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Response;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// HTTP client for the reservation backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Without `request_timeout` the transport's default applies.
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.client.get(self.url(path)).send().await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let error_body: ErrorBody = serde_json::from_slice(&body).map_err(|err| {
            error!(?err, %status, "Backend error response is not JSON");
            BackendError::MalformedResponse(err.to_string())
        })?;
        return Err(BackendError::Rejected {
            status: status.as_u16(),
            message: error_body.error,
        });
    }

    serde_json::from_slice(&body).map_err(|err| {
        error!(?err, "Failed to parse backend response");
        BackendError::MalformedResponse(err.to_string())
    })
}

impl ReservationBackend for ApiClient {
    async fn restaurant_info(&self) -> Result<RestaurantInfo, BackendError> {
        self.get("/api/restaurant-info").await
    }

    async fn menu(&self) -> Result<Menu, BackendError> {
        self.get("/api/menu").await
    }

    async fn submit_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BackendError> {
        debug!(time_slot = %request.time_slot, "Submitting reservation");
        let response = self
            .client
            .post(self.url("/api/reservations"))
            .json(request)
            .send()
            .await?;
        parse(response).await
    }

    async fn subscribe_newsletter(&self, request: &NewsletterRequest) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.url("/api/newsletter"))
            .json(request)
            .send()
            .await?;
        let body: MessageBody = parse(response).await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Successfully subscribed to newsletter".into()))
    }

    async fn check_availability(&self, time_slot: DateTime<Utc>) -> Result<Availability, BackendError> {
        let time_slot = time_slot.to_rfc3339_opts(SecondsFormat::Secs, true);
        let response = self
            .client
            .get(self.url("/api/reservations/check"))
            .query(&[("time_slot", time_slot)])
            .send()
            .await?;
        parse(response).await
    }
}
