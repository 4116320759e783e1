use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PhotoList, ReportId, UserId};

/// Status every new report starts in.
pub const REPORT_STATUS_OPEN: &str = "Open";

/// A lost/found report. Owned by its reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub reporter_id: UserId,
    pub report_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub photos: PhotoList,
    pub status: String,
    pub date_reported: DateTime<Utc>,
    /// Joined from `users` on reads; absent on freshly built values.
    pub reporter_full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub reporter_id: UserId,
    pub report_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub photos: PhotoList,
}

/// Partial update. `None` leaves a column untouched; `photos` always
/// carries the full merged list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportChanges {
    pub report_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub photos: PhotoList,
}

impl Report {
    /// Applies `changes` the way the store does, for adapters without SQL.
    pub fn apply(&mut self, changes: ReportChanges) {
        if let Some(report_type) = changes.report_type {
            self.report_type = report_type;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.location.is_some() {
            self.location = changes.location;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.photos = changes.photos;
    }
}
