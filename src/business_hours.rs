use chrono::Weekday;
use std::collections::BTreeMap;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Opening window of a single day. `close_hour` is exclusive: the last slot
/// starts half an hour before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    pub open_hour: u32,
    pub close_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    // Indexed by `Weekday::num_days_from_monday`.
    windows: [OpeningWindow; 7],
}

impl Default for BusinessHours {
    fn default() -> Self {
        let evening = OpeningWindow {
            open_hour: 17,
            close_hour: 23,
        };
        let sunday = OpeningWindow {
            open_hour: 17,
            close_hour: 21,
        };
        Self {
            windows: [evening, evening, evening, evening, evening, evening, sunday],
        }
    }
}

impl BusinessHours {
    /// `windows` run Monday through Sunday.
    pub fn new(windows: [OpeningWindow; 7]) -> Self {
        Self { windows }
    }

    pub fn window(&self, weekday: Weekday) -> OpeningWindow {
        self.windows[weekday.num_days_from_monday() as usize]
    }

    /// Human readable opening hours, consecutive days with the same window
    /// folded together (`monday_saturday`, `sunday`).
    pub fn hours_summary(&self) -> BTreeMap<String, String> {
        let mut summary = BTreeMap::new();
        let mut start = 0;
        while start < WEEK.len() {
            let window = self.windows[start];
            let mut end = start;
            while end + 1 < WEEK.len() && self.windows[end + 1] == window {
                end += 1;
            }

            let key = if start == end {
                day_name(WEEK[start]).to_string()
            } else {
                format!("{}_{}", day_name(WEEK[start]), day_name(WEEK[end]))
            };
            let value = format!(
                "{} – {}",
                twelve_hour(window.open_hour),
                twelve_hour(window.close_hour)
            );
            summary.insert(key, value);
            start = end + 1;
        }
        summary
    }
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn twelve_hour(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let hour = match hour % 12 {
        0 => 12,
        hour => hour,
    };
    format!("{hour}:00 {suffix}")
}
