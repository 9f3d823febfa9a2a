use chrono::NaiveTime;
use chrono::Timelike;

use super::domain::InterviewSlot;

const CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";
const CALENDAR_TIMEZONE: &str = "Asia%2FKolkata";

/// Percent-encode a query value the way `encodeURIComponent` does: ASCII
/// letters, digits, and `-_.!~*'()` pass through, everything else is encoded
/// byte-wise.
fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => encoded.push(byte as char),
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                encoded.push(byte as char)
            }
            other => {
                encoded.push('%');
                encoded.push_str(&format!("{other:02X}"));
            }
        }
    }
    encoded
}

/// 12-hour clock rendering, e.g. `14:05` becomes `2:05 PM` and `00:30`
/// becomes `12:30 AM`.
pub fn format_time_12h(time: NaiveTime) -> String {
    let hour = time.hour();
    let display_hour = match hour {
        0 => 12,
        1..=12 => hour,
        _ => hour - 12,
    };
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    format!("{display_hour}:{:02} {meridiem}", time.minute())
}

/// Pre-filled Google Calendar event link for a slot. Times are rendered in
/// the slot's local wall-clock and pinned to the Asia/Kolkata zone.
pub fn calendar_link(slot: &InterviewSlot) -> String {
    let event_name = if slot.drive_name.is_empty() {
        "Interview \u{2013} Campus Placement".to_string()
    } else {
        format!("Interview \u{2013} {}", slot.drive_name)
    };

    let day = slot.date.format("%Y%m%d");
    let window = format!(
        "{day}T{}00%2F{day}T{}00",
        slot.start_time.format("%H%M"),
        slot.end_time.format("%H%M"),
    );

    let mut details = format!("Interview via Placement Cell\nDrive: {}", slot.drive_name);
    if let Some(location) = slot.location.as_deref().filter(|value| !value.is_empty()) {
        details.push_str("\nVenue: ");
        details.push_str(location);
    }
    if let Some(notes) = slot.notes.as_deref().filter(|value| !value.is_empty()) {
        details.push_str("\nNotes: ");
        details.push_str(notes);
    }

    let venue = slot
        .location
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or("Campus");

    format!(
        "{CALENDAR_BASE}&text={}&dates={window}&details={}&location={}&ctz={CALENDAR_TIMEZONE}",
        percent_encode(&event_name),
        percent_encode(&details),
        percent_encode(venue),
    )
}

fn mode_suffix(slot: &InterviewSlot) -> String {
    let mut suffix = format!("Mode: {}", slot.mode.label());
    if let Some(location) = slot.location.as_deref().filter(|value| !value.is_empty()) {
        suffix.push_str(" | Venue: ");
        suffix.push_str(location);
    }
    if let Some(notes) = slot.notes.as_deref().filter(|value| !value.is_empty()) {
        suffix.push_str(" | Note: ");
        suffix.push_str(notes);
    }
    suffix
}

/// Full-sentence reminder used when an operator notifies one slot.
pub fn notification_message(slot: &InterviewSlot) -> String {
    format!(
        "Your interview for {} is scheduled on {} from {} to {}. {}. Add to Google Calendar: {}",
        slot.drive_name,
        slot.date.format("%A, %-d %B %Y"),
        format_time_12h(slot.start_time),
        format_time_12h(slot.end_time),
        mode_suffix(slot),
        calendar_link(slot),
    )
}

/// Compact reminder used in bulk notification runs.
pub fn bulk_notification_message(slot: &InterviewSlot) -> String {
    format!(
        "Interview for {}: {}, {}\u{2013}{}. {}. Add to Calendar: {}",
        slot.drive_name,
        slot.date.format("%a, %-d %b"),
        format_time_12h(slot.start_time),
        format_time_12h(slot.end_time),
        mode_suffix(slot),
        calendar_link(slot),
    )
}
