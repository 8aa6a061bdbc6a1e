use crate::backend::{BackendError, ReservationBackend};
use crate::business_hours::BusinessHours;
use crate::types::{
    Availability, Menu, MenuItem, NewsletterRequest, ReservationConfirmation,
    ReservationRequest, RestaurantInfo, MAX_PARTY_SIZE,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};
use tracing::{error, info};

pub const TOTAL_TABLES: u32 = 30;

#[derive(Debug, Default)]
struct Book {
    // email -> newsletter signup
    customers: HashMap<String, bool>,
    // time slot -> booked table numbers
    tables: HashMap<DateTime<Utc>, BTreeSet<u32>>,
    next_booking_id: u64,
}

/// In-memory reservation backend, used when no backend URL is configured.
/// Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct LocalReservations {
    book: Arc<Mutex<Book>>,
    business_hours: BusinessHours,
}

fn rejected(message: impl Into<String>) -> BackendError {
    let message = message.into();
    error!(%message, "Reservation backend rejected request");
    BackendError::Rejected {
        status: 400,
        message: Some(message),
    }
}

impl LocalReservations {
    fn book_table(&self, request: &ReservationRequest) -> Result<ReservationConfirmation, BackendError> {
        for (field, missing) in [
            ("customer_name", request.customer_name.trim().is_empty()),
            ("email", request.email.trim().is_empty()),
            ("number_of_guests", request.number_of_guests == 0),
        ] {
            if missing {
                return Err(rejected(format!("{field} is required")));
            }
        }
        if request.number_of_guests > MAX_PARTY_SIZE {
            return Err(rejected("Large parties (8+ guests) should call us directly"));
        }

        let mut book = self.book.lock().unwrap();
        let booked = book.tables.entry(request.time_slot).or_default();
        let Some(table_number) = (1..=TOTAL_TABLES).find(|table| !booked.contains(table)) else {
            return Err(rejected(
                "This time slot is fully booked. Please choose another time.",
            ));
        };

        booked.insert(table_number);

        // Existing customers keep their newsletter choice.
        book.customers
            .entry(request.email.clone())
            .or_insert(request.newsletter_signup);

        book.next_booking_id += 1;
        let id = book.next_booking_id;

        info!(id, table_number, time_slot = %request.time_slot, "Table booked");
        Ok(ReservationConfirmation {
            message: "Reservation confirmed successfully!".into(),
            table_number,
            time_slot: request.time_slot.to_rfc3339_opts(SecondsFormat::Secs, true),
            reservation_id: Some(id),
        })
    }

    fn subscribe(&self, email: &str) -> Result<String, BackendError> {
        if email.trim().is_empty() {
            return Err(rejected("Email is required"));
        }

        let mut book = self.book.lock().unwrap();
        match book.customers.insert(email.to_string(), true) {
            Some(_) => Ok("Email updated for newsletter subscription".into()),
            None => Ok("Successfully subscribed to newsletter".into()),
        }
    }

    fn availability(&self, time_slot: DateTime<Utc>) -> Availability {
        let reserved = self
            .book
            .lock()
            .unwrap()
            .tables
            .get(&time_slot)
            .map_or(0, |tables| tables.len() as u32);
        Availability {
            time_slot,
            available_tables: TOTAL_TABLES - reserved,
            total_tables: TOTAL_TABLES,
            is_available: reserved < TOTAL_TABLES,
        }
    }

    #[cfg(test)]
    fn is_subscribed(&self, email: &str) -> bool {
        self.book
            .lock()
            .unwrap()
            .customers
            .get(email)
            .copied()
            .unwrap_or(false)
    }
}

impl ReservationBackend for LocalReservations {
    async fn restaurant_info(&self) -> Result<RestaurantInfo, BackendError> {
        Ok(RestaurantInfo {
            hours: self.business_hours.hours_summary(),
            ..restaurant_info()
        })
    }

    async fn menu(&self) -> Result<Menu, BackendError> {
        Ok(fallback_menu())
    }

    async fn submit_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BackendError> {
        self.book_table(request)
    }

    async fn subscribe_newsletter(&self, request: &NewsletterRequest) -> Result<String, BackendError> {
        self.subscribe(&request.email)
    }

    async fn check_availability(&self, time_slot: DateTime<Utc>) -> Result<Availability, BackendError> {
        Ok(self.availability(time_slot))
    }
}

pub fn restaurant_info() -> RestaurantInfo {
    RestaurantInfo {
        name: "Café Fausse".into(),
        address: "1234 Culinary Ave, Suite 100, Washington, DC 20002".into(),
        phone: "(202) 555-4567".into(),
        hours: BusinessHours::default().hours_summary(),
        total_tables: Some(TOTAL_TABLES),
    }
}

fn item(name: &str, description: &str, price: f64) -> MenuItem {
    MenuItem {
        name: name.into(),
        description: description.into(),
        price,
    }
}

/// Menu shown when the backend cannot deliver one.
pub fn fallback_menu() -> Menu {
    Menu {
        starters: vec![
            item(
                "Bruschetta",
                "Fresh tomatoes, basil, olive oil, and toasted baguette slices",
                8.50,
            ),
            item("Caesar Salad", "Crisp romaine with homemade Caesar dressing", 9.00),
        ],
        main_courses: vec![
            item(
                "Grilled Salmon",
                "Served with lemon butter sauce and seasonal vegetables",
                22.00,
            ),
            item("Ribeye Steak", "12 oz prime cut with garlic mashed potatoes", 28.00),
            item("Vegetable Risotto", "Creamy Arborio rice with wild mushrooms", 18.00),
        ],
        desserts: vec![
            item("Tiramisu", "Classic Italian dessert with mascarpone", 7.50),
            item("Cheesecake", "Creamy cheesecake with berry compote", 7.00),
        ],
        beverages: vec![
            item("Red Wine (Glass)", "A selection of Italian reds", 10.00),
            item("White Wine (Glass)", "Crisp and refreshing", 9.00),
            item("Craft Beer", "Local artisan brews", 6.00),
            item("Espresso", "Strong and aromatic", 3.00),
        ],
    }
}
