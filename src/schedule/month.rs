use crate::schedule::event::Event;
use chrono::Datelike;

/// Events dated in exactly `year`-`month`, in their original order.
pub fn filter_month(events: &[Event], year: i32, month: u32) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .cloned()
        .collect()
}
