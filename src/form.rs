//! Reservation form state.
//!
//! A form moves `Idle -> Submitting -> Success | Error -> Idle`. Transitions
//! are computed by [`ReservationForm::apply`], which never performs I/O: a
//! submit that passes validation yields [`Effect::Send`] and the caller makes
//! the backend call, then feeds the outcome back as [`FormEvent::Finished`].

use crate::types::{ReservationRequest, ReservationResult, DEFAULT_PARTY_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub time_slot: Option<DateTime<Utc>>,
    pub number_of_guests: Option<u32>,
    pub newsletter_signup: bool,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            email: String::new(),
            phone: String::new(),
            time_slot: None,
            number_of_guests: Some(DEFAULT_PARTY_SIZE),
            newsletter_signup: false,
        }
    }
}

impl ReservationDraft {
    pub fn to_request(&self) -> Result<ReservationRequest, String> {
        let mut missing = Vec::new();
        if self.customer_name.trim().is_empty() {
            missing.push("customer_name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.time_slot.is_none() {
            missing.push("time_slot");
        }
        if self.number_of_guests.is_none() {
            missing.push("number_of_guests");
        }
        let (Some(time_slot), Some(number_of_guests), true) =
            (self.time_slot, self.number_of_guests, missing.is_empty())
        else {
            return Err(format!("{} is required", missing.join(", ")));
        };

        let phone = self.phone.trim();
        let request = ReservationRequest {
            customer_name: self.customer_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            time_slot,
            number_of_guests,
            newsletter_signup: self.newsletter_signup,
        };
        request.validate().map_err(|err| validation_message(&err))?;
        Ok(request)
    }

    fn apply_edit(&mut self, edit: DraftEdit) {
        if let Some(customer_name) = edit.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(email) = edit.email {
            self.email = email;
        }
        if let Some(phone) = edit.phone {
            self.phone = phone;
        }
        if let Some(time_slot) = edit.time_slot {
            self.time_slot = Some(time_slot);
        }
        if let Some(number_of_guests) = edit.number_of_guests {
            self.number_of_guests = Some(number_of_guests);
        }
        if let Some(newsletter_signup) = edit.newsletter_signup {
            self.newsletter_signup = newsletter_signup;
        }
    }
}

/// Joins all field messages, sorted by field name for stable output.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Partial update of a draft; absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftEdit {
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub time_slot: Option<DateTime<Utc>>,
    pub number_of_guests: Option<u32>,
    pub newsletter_signup: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    Submitting,
    Success { result: ReservationResult },
    Error { result: ReservationResult },
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    Edit(DraftEdit),
    Submit,
    Finished(ReservationResult),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Send(ReservationRequest),
    /// Submit arrived while a submission was still pending.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationForm {
    pub draft: ReservationDraft,
    #[serde(flatten)]
    pub phase: FormPhase,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            draft: ReservationDraft::default(),
            phase: FormPhase::Idle,
        }
    }
}

impl ReservationForm {
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn apply(&self, event: FormEvent) -> (ReservationForm, Effect) {
        let mut next = self.clone();
        match event {
            FormEvent::Edit(edit) => {
                next.draft.apply_edit(edit);
                if !self.is_submitting() {
                    next.phase = FormPhase::Idle;
                }
                (next, Effect::None)
            }
            FormEvent::Submit if self.is_submitting() => (next, Effect::Busy),
            FormEvent::Submit => match self.draft.to_request() {
                Ok(request) => {
                    next.phase = FormPhase::Submitting;
                    (next, Effect::Send(request))
                }
                Err(message) => {
                    next.phase = FormPhase::Error {
                        result: ReservationResult::error(message),
                    };
                    (next, Effect::None)
                }
            },
            FormEvent::Finished(result) if self.is_submitting() => {
                if result.is_success() {
                    next.draft = ReservationDraft::default();
                    next.phase = FormPhase::Success { result };
                } else {
                    next.phase = FormPhase::Error { result };
                }
                (next, Effect::None)
            }
            FormEvent::Finished(_) => (next, Effect::None),
        }
    }
}
