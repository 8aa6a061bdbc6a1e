use crate::backend::{BackendError, ReservationBackend};
use crate::configuration::Configuration;
use crate::form::{DraftEdit, Effect, FormEvent, ReservationForm};
use crate::form_registry::FormRegistry;
use crate::local_backend::fallback_menu;
use crate::slot_generator::SlotGenerator;
use crate::submitter::ReservationSubmitter;
use crate::types::{Outcome, ReservationRequest, NETWORK_ERROR_MESSAGE};
use axum::extract::{Path, Query};
use axum::response::Html;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use axum_valid::Valid;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState<T: ReservationBackend, C: Configuration> {
    submitter: ReservationSubmitter<T>,
    configuration: C,
    forms: FormRegistry,
    slot_generator: SlotGenerator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormResponse {
    id: Uuid,
    form: ReservationForm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NewsletterBody {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityQuery {
    time_slot: Option<DateTime<Utc>>,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn error_reply(status: StatusCode, error: impl Into<String>) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn form_not_found(id: Uuid) -> ErrorReply {
    warn!(%id, "Unknown reservation form");
    error_reply(StatusCode::NOT_FOUND, "Reservation form does not exist")
}

/// Maps a failed proxy call onto the response for the site's client.
fn backend_failure(err: BackendError) -> ErrorReply {
    match err {
        BackendError::Rejected { status, message } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            error_reply(
                status,
                message.unwrap_or_else(|| "The reservation backend rejected the request".into()),
            )
        }
        err => {
            error!(?err, "Reservation backend unavailable");
            error_reply(StatusCode::BAD_GATEWAY, NETWORK_ERROR_MESSAGE)
        }
    }
}

pub fn create_app<T: ReservationBackend, C: Configuration>(backend: T, configuration: C) -> Router {
    let state = AppState {
        submitter: ReservationSubmitter::new(backend),
        configuration,
        forms: FormRegistry::default(),
        slot_generator: SlotGenerator::default(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let site = Router::new()
        .route("/frontend", get(get_frontend::<T, C>))
        .route("/health", get(get_health::<T, C>))
        .route("/api/slots", get(get_slots::<T, C>))
        .route("/api/restaurant-info", get(get_restaurant_info::<T, C>))
        .route("/api/menu", get(get_menu::<T, C>))
        .route("/api/newsletter", post(subscribe_newsletter::<T, C>));

    let reservations = Router::new()
        .route("/api/reservations", post(submit_reservation::<T, C>))
        .route("/api/reservations/check", get(check_availability::<T, C>))
        .route("/api/forms", post(create_form::<T, C>))
        .route(
            "/api/forms/{id}",
            get(get_form::<T, C>).put(edit_form::<T, C>).delete(remove_form::<T, C>),
        )
        .route("/api/forms/{id}/submit", post(submit_form::<T, C>));

    Router::new()
        .merge(site)
        .merge(reservations)
        .with_state(state)
        .layer(cors)
}

async fn get_frontend<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let path = state.configuration.frontend_path();

    match fs::read_to_string(&path).await {
        Ok(contents) => Ok(Html(
            contents.replace("{{website_title}}", &state.configuration.website_title()),
        )),
        Err(err) => {
            error!(?err, ?path, "Failed to read frontend file");
            let error_message = format!("Failed to read frontend file: {}", err);
            Err((StatusCode::INTERNAL_SERVER_ERROR, error_message))
        }
    }
}

async fn get_health<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "message": format!("{} is running", state.configuration.website_title()),
    }))
}

async fn get_slots<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> impl IntoResponse {
    Json(state.slot_generator.generate(&Local::now()))
}

async fn get_restaurant_info<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> impl IntoResponse {
    state
        .submitter
        .backend()
        .restaurant_info()
        .await
        .map(Json)
        .map_err(backend_failure)
}

async fn get_menu<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> impl IntoResponse {
    match state.submitter.backend().menu().await {
        Ok(menu) => Json(menu),
        Err(err) => {
            warn!(?err, "Failed to load menu, serving fallback menu");
            Json(fallback_menu())
        }
    }
}

async fn check_availability<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Query(query): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    let Some(time_slot) = query.time_slot else {
        return Err(error_reply(
            StatusCode::BAD_REQUEST,
            "time_slot parameter is required",
        ));
    };
    state
        .submitter
        .backend()
        .check_availability(time_slot)
        .await
        .map(Json)
        .map_err(backend_failure)
}

async fn submit_reservation<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Valid(Json(request)): Valid<Json<ReservationRequest>>,
) -> impl IntoResponse {
    let result = state.submitter.submit(&request).await;
    let status = match result.outcome {
        Outcome::Success => StatusCode::CREATED,
        Outcome::Error => StatusCode::BAD_REQUEST,
    };
    (status, Json(result))
}

async fn subscribe_newsletter<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Json(body): Json<NewsletterBody>,
) -> impl IntoResponse {
    let result = state.submitter.subscribe(&body.email).await;
    let status = match result.outcome {
        Outcome::Success => StatusCode::OK,
        Outcome::Error => StatusCode::BAD_REQUEST,
    };
    (status, Json(result))
}

async fn create_form<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> impl IntoResponse {
    let (id, form) = state.forms.create();
    (StatusCode::CREATED, Json(FormResponse { id, form }))
}

async fn get_form<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.forms.form(id) {
        Some(form) => Ok(Json(FormResponse { id, form })),
        None => Err(form_not_found(id)),
    }
}

async fn edit_form<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Path(id): Path<Uuid>,
    Json(edit): Json<DraftEdit>,
) -> impl IntoResponse {
    match state.forms.dispatch(id, FormEvent::Edit(edit)) {
        Ok((form, _)) => Ok(Json(FormResponse { id, form })),
        Err(_) => Err(form_not_found(id)),
    }
}

async fn remove_form<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.forms.remove(id) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(_) => Err(form_not_found(id)),
    }
}

async fn submit_form<T: ReservationBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<FormResponse>), ErrorReply> {
    let (form, effect) = state
        .forms
        .dispatch(id, FormEvent::Submit)
        .map_err(|_| form_not_found(id))?;

    let request = match effect {
        Effect::Send(request) => request,
        Effect::Busy => {
            info!(%id, "Submit ignored, reservation already being submitted");
            return Err(error_reply(
                StatusCode::CONFLICT,
                "A reservation is already being submitted",
            ));
        }
        Effect::None => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(FormResponse { id, form }),
            ))
        }
    };

    // Runs detached from the request, so a client that hangs up still gets
    // its form out of `Submitting`.
    let submitter = state.submitter.clone();
    let forms = state.forms.clone();
    let submission = tokio::spawn(async move {
        let result = submitter.submit(&request).await;
        match forms.dispatch(id, FormEvent::Finished(result.clone())) {
            Ok((form, _)) => form,
            Err(_) => {
                warn!(%id, outcome = ?result.outcome, "Reservation form removed while submitting");
                form.apply(FormEvent::Finished(result)).0
            }
        }
    });

    let form = submission.await.map_err(|err| {
        error!(?err, %id, "Reservation submission task failed");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Reservation submission failed",
        )
    })?;
    Ok((StatusCode::OK, Json(FormResponse { id, form })))
}
