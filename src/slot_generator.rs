use crate::{business_hours::BusinessHours, types::TimeSlot};
use chrono::{DateTime, Datelike, Days, NaiveDateTime, TimeZone, Utc};

pub const RESERVATION_WINDOW_DAYS: u64 = 30;
pub const SLOT_MINUTES: u32 = 30;

const LABEL_FORMAT: &str = "%a, %b %-d, %-I:%M %p";

#[derive(Debug, Clone)]
pub struct SlotGenerator {
    business_hours: BusinessHours,
    days: u64,
}

impl Default for SlotGenerator {
    fn default() -> Self {
        Self::new(BusinessHours::default(), RESERVATION_WINDOW_DAYS)
    }
}

impl SlotGenerator {
    pub fn new(business_hours: BusinessHours, days: u64) -> Self {
        Self {
            business_hours,
            days,
        }
    }

    /// Enumerates every half-hour start within business hours for the next
    /// `days` calendar days, today included, in chronological order.
    ///
    /// Enumeration starts at today's calendar date, so slots of the current
    /// day that already lie before `now` are still part of the result.
    pub fn generate<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TimeSlot> {
        let timezone = now.timezone();
        let today = now.date_naive();
        let mut slots = Vec::new();

        for offset in 0..self.days {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };

            let window = self.business_hours.window(date.weekday());
            for hour in window.open_hour..window.close_hour {
                for minute in (0..60).step_by(SLOT_MINUTES as usize) {
                    let Some(local) = date.and_hms_opt(hour, minute, 0) else {
                        continue;
                    };
                    if let Some(slot) = slot_at(&timezone, local) {
                        slots.push(slot);
                    }
                }
            }
        }
        slots
    }
}

// Local times swallowed by a DST gap yield no slot, repeated ones resolve to
// the earlier instant.
fn slot_at<Tz: TimeZone>(timezone: &Tz, local: NaiveDateTime) -> Option<TimeSlot> {
    let instant = timezone.from_local_datetime(&local).earliest()?;
    Some(TimeSlot {
        value: instant.with_timezone(&Utc),
        label: local.format(LABEL_FORMAT).to_string(),
    })
}
