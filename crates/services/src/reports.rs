//! Lost/found reports and their mutation guard.

use std::sync::Arc;

use domains::{
    ensure_owner_or_admin, DomainError, NewReport, PhotoList, Principal, Report, ReportChanges,
    ReportId, ReportRepository,
};
use tracing::{info, instrument};

/// Photos a single report may carry on creation.
pub const MAX_REPORT_PHOTOS: usize = 4;

/// Checks a new report before any of its photos are stored.
pub fn check_report_fields(report_type: &str, photos: usize) -> Result<(), DomainError> {
    if photos == 0 {
        return Err(DomainError::Validation(
            "at least one photo is required for the report".into(),
        ));
    }
    if photos > MAX_REPORT_PHOTOS {
        return Err(DomainError::Validation(format!(
            "at most {MAX_REPORT_PHOTOS} photos per report"
        )));
    }
    if report_type.trim().is_empty() {
        return Err(DomainError::Validation("reportType is required".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct CreateReport {
    pub report_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub photos: Vec<String>,
}

/// Fields a report update may carry; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ReportUpdate {
    pub report_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// Path of a freshly uploaded photo, appended to the stored list.
    pub new_photo: Option<String>,
}

#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    #[instrument(skip_all, fields(reporter = %principal.user_id))]
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateReport,
    ) -> Result<ReportId, DomainError> {
        check_report_fields(&input.report_type, input.photos.len())?;

        let id = self
            .reports
            .create(NewReport {
                reporter_id: principal.user_id,
                report_type: input.report_type,
                description: input.description,
                location: input.location,
                contact_info: input.contact_info,
                photos: PhotoList::new(input.photos),
            })
            .await?;
        info!(report_id = %id, "report added");
        Ok(id)
    }

    pub async fn get(&self, id: ReportId) -> Result<Report, DomainError> {
        self.reports
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("report", id))
    }

    /// The requester's own reports; an empty result is `NotFound`.
    pub async fn mine(&self, principal: &Principal) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.list_by_reporter(principal.user_id).await?;
        if reports.is_empty() {
            return Err(DomainError::NotFound(
                "reports for user",
                principal.user_id.to_string(),
            ));
        }
        Ok(reports)
    }

    /// The report, if `principal` may modify it. Callers holding uploads
    /// check this before storing them.
    pub async fn editable(&self, principal: &Principal, id: ReportId) -> Result<Report, DomainError> {
        let report = self.get(id).await?;
        ensure_owner_or_admin(report.reporter_id, principal, "report")?;
        Ok(report)
    }

    /// fetch -> owner-or-admin -> append photo -> persist.
    #[instrument(skip_all, fields(report_id = %id, requester = %principal.user_id))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: ReportId,
        update: ReportUpdate,
    ) -> Result<(), DomainError> {
        let report = self.editable(principal, id).await?;

        let changes = ReportChanges {
            report_type: update.report_type,
            description: update.description,
            location: update.location,
            status: update.status,
            photos: report.photos.merged_with(update.new_photo),
        };
        self.reports.update(id, changes).await?;
        info!("report updated");
        Ok(())
    }

    #[instrument(skip_all, fields(report_id = %id, requester = %principal.user_id))]
    pub async fn delete(&self, principal: &Principal, id: ReportId) -> Result<(), DomainError> {
        self.editable(principal, id).await?;

        if !self.reports.delete(id).await? {
            return Err(DomainError::not_found("report", id));
        }
        info!("report deleted");
        Ok(())
    }
}
