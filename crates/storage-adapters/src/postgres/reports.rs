use async_trait::async_trait;
use domains::{
    DomainError, NewReport, Report, ReportChanges, ReportId, ReportRepository, UserId,
    REPORT_STATUS_OPEN,
};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{decode_photos, storage, PgStore};

const REPORT_SELECT: &str = "
    SELECT r.report_id, r.reporter_id, r.report_type, r.description, r.location,
           r.contact_info, r.photo, r.status, r.date_reported,
           u.full_name AS reporter_full_name
    FROM lost_found_reports r
    LEFT JOIN users u ON r.reporter_id = u.user_id";

fn report_from_row(row: &PgRow) -> Result<Report, sqlx::Error> {
    let id: i64 = row.try_get("report_id")?;
    Ok(Report {
        id: ReportId(id),
        reporter_id: UserId(row.try_get("reporter_id")?),
        report_type: row.try_get("report_type")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        contact_info: row.try_get("contact_info")?,
        photos: decode_photos(row.try_get("photo")?, "report", id),
        status: row.try_get("status")?,
        date_reported: row.try_get("date_reported")?,
        reporter_full_name: row.try_get("reporter_full_name")?,
    })
}

#[async_trait]
impl ReportRepository for PgStore {
    async fn create(&self, report: NewReport) -> Result<ReportId, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO lost_found_reports
                 (reporter_id, report_type, description, location, contact_info, photo, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING report_id",
        )
        .bind(report.reporter_id.0)
        .bind(report.report_type)
        .bind(report.description)
        .bind(report.location)
        .bind(report.contact_info)
        .bind(report.photos.to_json())
        .bind(REPORT_STATUS_OPEN)
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;
        Ok(ReportId(id))
    }

    async fn find(&self, id: ReportId) -> Result<Option<Report>, DomainError> {
        let sql = format!("{REPORT_SELECT} WHERE r.report_id = $1");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.pool())
            .await
            .map_err(storage)?;

        row.as_ref()
            .map(report_from_row)
            .transpose()
            .map_err(storage)
    }

    async fn list_by_reporter(&self, reporter: UserId) -> Result<Vec<Report>, DomainError> {
        let sql = format!(
            "{REPORT_SELECT} WHERE r.reporter_id = $1
             ORDER BY r.date_reported DESC, r.report_id DESC"
        );
        sqlx::query(&sql)
            .bind(reporter.0)
            .fetch_all(self.pool())
            .await
            .map_err(storage)?
            .iter()
            .map(report_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage)
    }

    /// Absent text fields keep their stored value; the photo list is written as given.
    async fn update(&self, id: ReportId, changes: ReportChanges) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE lost_found_reports
             SET report_type = COALESCE($2, report_type),
                 description = COALESCE($3, description),
                 location    = COALESCE($4, location),
                 status      = COALESCE($5, status),
                 photo       = $6
             WHERE report_id = $1",
        )
        .bind(id.0)
        .bind(changes.report_type)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.status)
        .bind(changes.photos.to_json())
        .execute(self.pool())
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn delete(&self, id: ReportId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM lost_found_reports WHERE report_id = $1")
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }
}
