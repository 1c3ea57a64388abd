//! Salary resolution functionality.
//!
//! This module converts a stored [`SalaryComponents`] set into monthly pay
//! figures. All components are monthly amounts; a missing component counts
//! as zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{SalaryComponents, SalaryStructure};

/// Months in a salary year.
const MONTHS_PER_YEAR: i64 = 12;

/// Monthly pay derived from a salary structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// basic + hra + da + ta + special allowance.
    pub base_earnings: Decimal,
    /// Base earnings plus other allowances.
    pub gross: Decimal,
    /// PF + ESI + professional tax + income tax + other deductions.
    pub total_deductions: Decimal,
    /// Gross less total deductions.
    pub net: Decimal,
}

/// Resolves a salary structure into monthly gross, deductions and net.
///
/// # Examples
///
/// ```
/// use payroll_ledger::models::SalaryComponents;
/// use payroll_ledger::salary::resolve_salary;
/// use rust_decimal::Decimal;
///
/// let components = SalaryComponents {
///     basic: Some(Decimal::from(30000)),
///     hra: Some(Decimal::from(12000)),
///     provident_fund: Some(Decimal::from(1800)),
///     ..Default::default()
/// };
///
/// let breakdown = resolve_salary(&components);
/// assert_eq!(breakdown.gross, Decimal::from(42000));
/// assert_eq!(breakdown.total_deductions, Decimal::from(1800));
/// assert_eq!(breakdown.net, Decimal::from(40200));
/// ```
pub fn resolve_salary(components: &SalaryComponents) -> SalaryBreakdown {
    let amount = |value: Option<Decimal>| value.unwrap_or(Decimal::ZERO);

    let base_earnings = amount(components.basic)
        + amount(components.hra)
        + amount(components.da)
        + amount(components.ta)
        + amount(components.special_allowance);
    let gross = base_earnings + amount(components.other_allowances);

    let total_deductions = amount(components.provident_fund)
        + amount(components.esi)
        + amount(components.professional_tax)
        + amount(components.income_tax)
        + amount(components.other_deductions);

    SalaryBreakdown {
        base_earnings,
        gross,
        total_deductions,
        net: gross - total_deductions,
    }
}

/// Annual and monthly totals stored alongside a salary structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySnapshot {
    /// Gross x 12.
    pub ctc_annual: Decimal,
    /// Net x 12.
    pub net_salary_annual: Decimal,
    /// Monthly net.
    pub net_salary_monthly: Decimal,
}

/// Derives the stored totals for a set of components.
pub fn salary_snapshot(components: &SalaryComponents) -> SalarySnapshot {
    let breakdown = resolve_salary(components);
    let months = Decimal::from(MONTHS_PER_YEAR);
    SalarySnapshot {
        ctc_annual: breakdown.gross * months,
        net_salary_annual: breakdown.net * months,
        net_salary_monthly: breakdown.net,
    }
}

/// The totals to archive for a structure.
///
/// Stored totals are kept when all three are present; legacy rows missing
/// any of them are recomputed from the components.
pub fn archived_snapshot(structure: &SalaryStructure) -> SalarySnapshot {
    match (
        structure.ctc_annual,
        structure.net_salary_annual,
        structure.net_salary_monthly,
    ) {
        (Some(ctc_annual), Some(net_salary_annual), Some(net_salary_monthly)) => SalarySnapshot {
            ctc_annual,
            net_salary_annual,
            net_salary_monthly,
        },
        _ => salary_snapshot(&structure.components),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeId;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_components() -> SalaryComponents {
        SalaryComponents {
            basic: Some(dec("25000")),
            hra: Some(dec("10000")),
            da: Some(dec("2500")),
            ta: Some(dec("1600")),
            special_allowance: Some(dec("5900")),
            other_allowances: Some(dec("1000")),
            provident_fund: Some(dec("1800")),
            esi: Some(dec("0")),
            professional_tax: Some(dec("200")),
            income_tax: Some(dec("2500")),
            other_deductions: Some(dec("500")),
        }
    }

    #[test]
    fn test_resolve_full_structure() {
        let breakdown = resolve_salary(&create_test_components());

        assert_eq!(breakdown.base_earnings, dec("45000"));
        assert_eq!(breakdown.gross, dec("46000"));
        assert_eq!(breakdown.total_deductions, dec("5000"));
        assert_eq!(breakdown.net, dec("41000"));
    }

    #[test]
    fn test_resolve_treats_missing_components_as_zero() {
        let components = SalaryComponents {
            basic: Some(dec("15000.50")),
            ..Default::default()
        };
        let breakdown = resolve_salary(&components);

        assert_eq!(breakdown.gross, dec("15000.50"));
        assert_eq!(breakdown.total_deductions, Decimal::ZERO);
        assert_eq!(breakdown.net, dec("15000.50"));
    }

    #[test]
    fn test_resolve_empty_structure_is_zero() {
        let breakdown = resolve_salary(&SalaryComponents::default());
        assert_eq!(breakdown.gross, Decimal::ZERO);
        assert_eq!(breakdown.net, Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_annualises_gross_and_net() {
        let snapshot = salary_snapshot(&create_test_components());

        assert_eq!(snapshot.ctc_annual, dec("552000"));
        assert_eq!(snapshot.net_salary_monthly, dec("41000"));
        assert_eq!(snapshot.net_salary_annual, dec("492000"));
    }

    #[test]
    fn test_archived_snapshot_recomputes_when_stored_totals_missing() {
        let structure = SalaryStructure {
            employee_id: EmployeeId(1),
            components: create_test_components(),
            effective_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            effective_to: None,
            ctc_annual: Some(dec("1")),
            net_salary_annual: None,
            net_salary_monthly: None,
        };

        let snapshot = archived_snapshot(&structure);
        assert_eq!(snapshot.ctc_annual, dec("552000"));
    }

    #[test]
    fn test_archived_snapshot_keeps_stored_totals() {
        let structure = SalaryStructure {
            employee_id: EmployeeId(1),
            components: create_test_components(),
            effective_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            effective_to: None,
            ctc_annual: Some(dec("500000")),
            net_salary_annual: Some(dec("450000")),
            net_salary_monthly: Some(dec("37500")),
        };

        let snapshot = archived_snapshot(&structure);
        assert_eq!(snapshot.ctc_annual, dec("500000"));
        assert_eq!(snapshot.net_salary_monthly, dec("37500"));
    }
}
