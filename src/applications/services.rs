use anyhow::Context;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    repo::ApplicationRepo,
    repo_types::{Application, ApplicationStatus, NewApplication},
};
use crate::error::AppError;

/// Query value that disables status filtering.
pub const ALL_STATUSES: &str = "All";

pub const CSV_HEADER: [&str; 5] = ["Name", "Email", "Role", "Message", "Status"];

pub fn parse_status(raw: &str) -> Result<ApplicationStatus, AppError> {
    raw.parse().map_err(|_| {
        warn!(status = %raw, "rejected unknown status");
        AppError::Validation(format!(
            "Invalid status, expected one of: {}",
            ApplicationStatus::ALL.map(ApplicationStatus::as_str).join(", ")
        ))
    })
}

/// `None`, an empty value or `All` means no filter.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ApplicationStatus>, AppError> {
    match raw {
        None | Some("") | Some(ALL_STATUSES) => Ok(None),
        Some(s) => parse_status(s).map(Some),
    }
}

pub async fn submit(
    repo: &dyn ApplicationRepo,
    new: NewApplication,
) -> Result<Application, AppError> {
    let app = repo.create(new).await?;
    info!(application_id = %app.id, "application submitted");
    Ok(app)
}

pub async fn list(
    repo: &dyn ApplicationRepo,
    status: Option<ApplicationStatus>,
) -> Result<Vec<Application>, AppError> {
    Ok(repo.list(status).await?)
}

pub async fn update_status(
    repo: &dyn ApplicationRepo,
    raw_id: &str,
    status: ApplicationStatus,
) -> Result<Application, AppError> {
    // An id that cannot exist resolves the same way as one that does not.
    let id = Uuid::parse_str(raw_id).map_err(|_| AppError::NotFound("Application"))?;

    let updated = repo
        .update_status(id, status)
        .await?
        .ok_or(AppError::NotFound("Application"))?;

    info!(application_id = %id, %status, "application status updated");
    Ok(updated)
}

pub async fn export_csv(repo: &dyn ApplicationRepo) -> Result<Vec<u8>, AppError> {
    let apps = repo.list(None).await?;
    Ok(render_csv(&apps)?)
}

/// Header plus one row per application, joined by `\n` with no trailing
/// terminator. Fields are quoted only when they contain a delimiter, quote or
/// line break.
pub fn render_csv(apps: &[Application]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER).context("write csv header")?;
    for app in apps {
        wtr.write_record([
            app.name.as_deref().unwrap_or_default(),
            app.email.as_deref().unwrap_or_default(),
            app.role.as_deref().unwrap_or_default(),
            app.message.as_deref().unwrap_or_default(),
            app.status.as_str(),
        ])
        .with_context(|| format!("write csv row for {}", app.id))?;
    }

    let mut out = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flush csv: {}", e.error()))?;
    if out.last() == Some(&b'\n') {
        out.pop();
    }
    Ok(out)
}
