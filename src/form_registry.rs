use crate::form::{Effect, FormEvent, ReservationForm};
use chrono::{DateTime, Duration, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::{debug, error};
use uuid::Uuid;

/// Forms untouched for longer than this are dropped on the next `create`.
pub const FORM_MAX_AGE_MINUTES: i64 = 120;

#[derive(Debug, Clone)]
struct OpenForm {
    form: ReservationForm,
    last_touched: DateTime<Utc>,
}

/// Open reservation forms, one state object per form instance.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: Arc<Mutex<HashMap<Uuid, OpenForm>>>,
}

impl FormRegistry {
    pub fn create(&self) -> (Uuid, ReservationForm) {
        self.cleanup_outdated_forms(Duration::minutes(FORM_MAX_AGE_MINUTES));

        let id = Uuid::new_v4();
        let form = ReservationForm::default();
        let mut forms = self.forms.lock().unwrap();
        forms.insert(
            id,
            OpenForm {
                form: form.clone(),
                last_touched: Utc::now(),
            },
        );
        debug!(%id, open_forms = forms.len(), "Reservation form created");
        (id, form)
    }

    /// Pending submissions are kept regardless of age, their result still
    /// has to land in the form.
    fn cleanup_outdated_forms(&self, max_age: Duration) {
        let cutoff_time = Utc::now() - max_age;
        let mut forms = self.forms.lock().unwrap();
        let before = forms.len();

        forms.retain(|_, open| open.last_touched >= cutoff_time || open.form.is_submitting());

        let evicted = before - forms.len();
        if evicted > 0 {
            debug!(evicted, "Outdated reservation forms removed");
        }
    }

    pub fn form(&self, id: Uuid) -> Option<ReservationForm> {
        self.forms
            .lock()
            .unwrap()
            .get(&id)
            .map(|open| open.form.clone())
    }

    /// Applies `event` under the lock, so the switch to `Submitting` and the
    /// `Busy` answer to a concurrent submit cannot interleave.
    pub fn dispatch(&self, id: Uuid, event: FormEvent) -> Result<(ReservationForm, Effect), String> {
        let mut forms = self.forms.lock().unwrap();
        let Some(open) = forms.get_mut(&id) else {
            let err = "Reservation form does not exist";
            error!(%id, err);
            return Err(err.into());
        };
        let (next, effect) = open.form.apply(event);
        open.form = next.clone();
        open.last_touched = Utc::now();
        Ok((next, effect))
    }

    pub fn remove(&self, id: Uuid) -> Result<(), String> {
        if self.forms.lock().unwrap().remove(&id).is_none() {
            let err = "Reservation form does not exist and therefore can't be removed";
            error!(%id, err);
            return Err(err.into());
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.forms.lock().unwrap().len()
    }

    #[cfg(test)]
    fn backdate(&self, id: Uuid, age: Duration) {
        if let Some(open) = self.forms.lock().unwrap().get_mut(&id) {
            open.last_touched = Utc::now() - age;
        }
    }
}
