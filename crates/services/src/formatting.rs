//! Display formats shared by the listing endpoints.

use chrono::{DateTime, Utc};

/// Value shown for pets without an approved applicant.
pub const NOT_ADOPTED: &str = "Not Adopted";

/// `October 09, 2026`, used for pet and listing dates.
pub fn display_date(at: &DateTime<Utc>) -> String {
    at.format("%B %d, %Y").to_string()
}

/// `October 9, 2026, 3:04 PM`, used for report timestamps.
pub fn display_datetime(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %-I:%M %p").to_string()
}
