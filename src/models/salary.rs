//! Salary structure models.
//!
//! Components are stored as monthly amounts. Every component is optional
//! because legacy rows may carry nulls; readers treat a missing component
//! as zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, SalaryHistoryId};

/// The monthly earning and deduction components of a salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Basic salary.
    #[serde(default)]
    pub basic: Option<Decimal>,
    /// House rent allowance.
    #[serde(default)]
    pub hra: Option<Decimal>,
    /// Dearness allowance.
    #[serde(default)]
    pub da: Option<Decimal>,
    /// Travel allowance.
    #[serde(default)]
    pub ta: Option<Decimal>,
    /// Special allowance.
    #[serde(default)]
    pub special_allowance: Option<Decimal>,
    /// Any other recurring allowances.
    #[serde(default)]
    pub other_allowances: Option<Decimal>,
    /// Provident fund contribution.
    #[serde(default)]
    pub provident_fund: Option<Decimal>,
    /// Employee state insurance.
    #[serde(default)]
    pub esi: Option<Decimal>,
    /// Professional tax.
    #[serde(default)]
    pub professional_tax: Option<Decimal>,
    /// Income tax withheld.
    #[serde(default)]
    pub income_tax: Option<Decimal>,
    /// Any other recurring deductions.
    #[serde(default)]
    pub other_deductions: Option<Decimal>,
}

/// The largest monthly amount accepted for a single component.
pub const MAX_COMPONENT_AMOUNT: i64 = 1_000_000_000_000;

impl SalaryComponents {
    fn named(&self) -> [(&'static str, Option<Decimal>); 11] {
        [
            ("basic", self.basic),
            ("hra", self.hra),
            ("da", self.da),
            ("ta", self.ta),
            ("special_allowance", self.special_allowance),
            ("other_allowances", self.other_allowances),
            ("provident_fund", self.provident_fund),
            ("esi", self.esi),
            ("professional_tax", self.professional_tax),
            ("income_tax", self.income_tax),
            ("other_deductions", self.other_deductions),
        ]
    }

    /// Returns every component that is present but negative, by name.
    pub fn negative_components(&self) -> Vec<&'static str> {
        self.named()
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()))
            .map(|(name, _)| name)
            .collect()
    }

    /// Returns every component above [`MAX_COMPONENT_AMOUNT`], by name.
    pub fn oversized_components(&self) -> Vec<&'static str> {
        let limit = Decimal::from(MAX_COMPONENT_AMOUNT);
        self.named()
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| v > limit))
            .map(|(name, _)| name)
            .collect()
    }
}

/// The live salary structure of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// The employee this structure belongs to.
    pub employee_id: EmployeeId,
    /// Monthly components.
    pub components: SalaryComponents,
    /// The first day this structure applies.
    pub effective_from: NaiveDate,
    /// The last day this structure applies, if closed.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Derived: monthly gross × 12. May be null on legacy rows.
    #[serde(default)]
    pub ctc_annual: Option<Decimal>,
    /// Derived: monthly net × 12. May be null on legacy rows.
    #[serde(default)]
    pub net_salary_annual: Option<Decimal>,
    /// Derived: gross − deductions. May be null on legacy rows.
    #[serde(default)]
    pub net_salary_monthly: Option<Decimal>,
}

/// An archived salary structure, written once by an increment.
///
/// Unlike [`SalaryStructure`] the derived totals are always present: the
/// archiver recomputes any that were null on the live row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryHistory {
    /// Unique identifier for the history row.
    pub id: SalaryHistoryId,
    /// The employee this structure belonged to.
    pub employee_id: EmployeeId,
    /// Monthly components as they were.
    pub components: SalaryComponents,
    /// Annual cost to company.
    pub ctc_annual: Decimal,
    /// Annual net salary.
    pub net_salary_annual: Decimal,
    /// Monthly net salary.
    pub net_salary_monthly: Decimal,
    /// The first day the archived structure applied.
    pub effective_from: NaiveDate,
    /// The day the replacing structure took effect.
    pub effective_to: NaiveDate,
    /// Why the structure was replaced.
    pub reason: String,
}

/// Input for a salary increment or revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRevision {
    /// The new monthly components.
    pub components: SalaryComponents,
    /// The day the new structure takes effect.
    pub effective_from: NaiveDate,
    /// Free-text remarks recorded on the archived row.
    #[serde(default)]
    pub remarks: Option<String>,
    /// The hike percentage, if this is a percentage increment.
    #[serde(default)]
    pub increment_percentage: Option<Decimal>,
}

impl SalaryRevision {
    /// Builds the reason recorded on the archived structure, e.g.
    /// `"Annual appraisal - 10% Hike"` or `"Revision - Flat Revision"`.
    pub fn archive_reason(&self) -> String {
        let label = match self.increment_percentage {
            Some(pct) => format!("{}% Hike", pct.normalize()),
            None => "Flat Revision".to_string(),
        };
        let remarks = self
            .remarks
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("Revision");
        format!("{} - {}", remarks, label)
    }
}
