use crate::backend::{BackendError, ReservationBackend};
use crate::types::{
    NewsletterRequest, NewsletterResult, Outcome, ReservationRequest, ReservationResult,
    NETWORK_ERROR_MESSAGE, RESERVATION_ERROR_FALLBACK,
};
use tracing::{error, info, warn};

/// Sends reservation requests to the backend and turns every answer, including
/// transport failures, into a `ReservationResult`. One call per submission,
/// never retried.
#[derive(Clone)]
pub struct ReservationSubmitter<T: ReservationBackend> {
    backend: T,
}

impl<T: ReservationBackend> ReservationSubmitter<T> {
    pub fn new(backend: T) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &T {
        &self.backend
    }

    pub async fn submit(&self, request: &ReservationRequest) -> ReservationResult {
        match self.backend.submit_reservation(request).await {
            Ok(confirmation) => {
                info!(
                    table_number = confirmation.table_number,
                    time_slot = %request.time_slot,
                    "Reservation confirmed"
                );
                ReservationResult::confirmed(confirmation)
            }
            Err(err) => reservation_error(err),
        }
    }

    pub async fn subscribe(&self, email: &str) -> NewsletterResult {
        if email.trim().is_empty() {
            return NewsletterResult {
                outcome: Outcome::Error,
                message: "Email is required".into(),
            };
        }

        let request = NewsletterRequest {
            email: email.trim().to_string(),
        };
        match self.backend.subscribe_newsletter(&request).await {
            Ok(message) => NewsletterResult {
                outcome: Outcome::Success,
                message,
            },
            Err(err) => NewsletterResult {
                outcome: Outcome::Error,
                message: error_message(err, "An error occurred while subscribing"),
            },
        }
    }
}

fn reservation_error(err: BackendError) -> ReservationResult {
    ReservationResult::error(error_message(err, RESERVATION_ERROR_FALLBACK))
}

fn error_message(err: BackendError, fallback: &str) -> String {
    match err {
        BackendError::Rejected { status, message } => {
            warn!(status, ?message, "Backend rejected request");
            message.unwrap_or_else(|| fallback.to_string())
        }
        err @ (BackendError::Transport(_) | BackendError::MalformedResponse(_)) => {
            error!(?err, "Backend unreachable");
            NETWORK_ERROR_MESSAGE.to_string()
        }
    }
}
