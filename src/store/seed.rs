//! Loading configured reference data into a repository.

use tracing::info;

use crate::config::{PayrollConfig, TemplateConfig};
use crate::error::EngineResult;
use crate::models::{LeaveTemplate, LeaveTemplateId, LeaveType, LeaveTypeId};

use super::{Repository, Sequence};

/// What [`seed_reference_data`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Templates created.
    pub templates: usize,
    /// Leave types created.
    pub leave_types: usize,
    /// Holidays written.
    pub holidays: usize,
}

/// Writes the configured leave templates, leave types and holidays.
///
/// Templates are matched by name and leave types by code within their
/// template, so seeding twice adds nothing the second time. Existing leave
/// types are never modified.
pub fn seed_reference_data(
    repo: &mut dyn Repository,
    config: &PayrollConfig,
) -> EngineResult<SeedReport> {
    let mut report = SeedReport::default();

    for template in config.templates() {
        let template_id = match repo.leave_template_by_name(&template.name) {
            Some(existing) => existing.id,
            None => {
                let id = LeaveTemplateId(repo.reserve_sequence(Sequence::LeaveTemplate));
                repo.insert_leave_template(LeaveTemplate {
                    id,
                    name: template.name.clone(),
                })?;
                report.templates += 1;
                id
            }
        };
        report.leave_types += seed_leave_types(repo, template_id, template)?;
    }

    for holiday in config.holidays() {
        repo.insert_holiday(holiday.clone());
        report.holidays += 1;
    }

    info!(
        templates = report.templates,
        leave_types = report.leave_types,
        holidays = report.holidays,
        "reference data seeded"
    );
    Ok(report)
}

fn seed_leave_types(
    repo: &mut dyn Repository,
    template_id: LeaveTemplateId,
    template: &TemplateConfig,
) -> EngineResult<usize> {
    let existing = repo.leave_types_for_template(template_id);
    let mut added = 0;

    for declared in &template.leave_types {
        if existing.iter().any(|lt| lt.code == declared.code) {
            continue;
        }
        let id = LeaveTypeId(repo.reserve_sequence(Sequence::LeaveType));
        repo.insert_leave_type(LeaveType {
            id,
            template_id,
            code: declared.code.clone(),
            name: declared.name.clone(),
            annual_quota: declared.annual_quota,
            is_paid: declared.is_paid,
            carry_forward: declared.carry_forward,
        })?;
        added += 1;
    }

    Ok(added)
}
