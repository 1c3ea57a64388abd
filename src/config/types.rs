//! Configuration types for the payroll and leave engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Holiday;

/// Payroll cycle policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Working days recorded on every payroll record.
    pub total_working_days: Decimal,
    /// Divisor turning base monthly earnings into the LOP daily rate.
    pub lop_divisor: Decimal,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            total_working_days: Decimal::from(26),
            lop_divisor: Decimal::from(30),
        }
    }
}

/// What leave approval does when the balance row to debit does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBalancePolicy {
    /// Log a warning and keep the approval without a ledger entry.
    #[default]
    Warn,
    /// Fail the approval with an insufficient-balance error.
    Reject,
}

/// Leave application and accrual policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeavePolicy {
    /// Days subtracted for each half-day flag.
    pub half_day_value: Decimal,
    /// Employees joining after this day of the month lose that month's accrual.
    pub pro_rata_cutoff_day: u32,
    /// Handling of approvals against a missing balance row.
    pub missing_balance: MissingBalancePolicy,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            half_day_value: Decimal::new(5, 1),
            pro_rata_cutoff_day: 15,
            missing_balance: MissingBalancePolicy::Warn,
        }
    }
}

/// Longest comp-off expiry the engine accepts, ten years.
pub const MAX_COMP_OFF_EXPIRY_DAYS: i64 = 3650;

/// Comp-off policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompOffPolicy {
    /// Days from the claim until the earned comp-off expires.
    pub expiry_days: i64,
    /// Days credited per approved claim.
    pub credit_days: Decimal,
}

impl Default for CompOffPolicy {
    fn default() -> Self {
        Self {
            expiry_days: 90,
            credit_days: Decimal::ONE,
        }
    }
}

/// Leave type codes with engine-defined behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeaveCodes {
    /// Earned leave: accrued monthly by payroll, never pro-rated up front.
    pub earned_leave: String,
    /// Comp-off: credited by comp-off approval.
    pub comp_off: String,
    /// Loss of pay.
    pub loss_of_pay: String,
}

impl LeaveCodes {
    /// Returns true if the code receives its full quota on initialisation.
    pub fn is_full_quota(&self, code: &str) -> bool {
        code == self.loss_of_pay || code == self.comp_off
    }
}

impl Default for LeaveCodes {
    fn default() -> Self {
        Self {
            earned_leave: "EL".to_string(),
            comp_off: "CO".to_string(),
            loss_of_pay: "LOP".to_string(),
        }
    }
}

/// Format of generated employee codes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmployeeCodeFormat {
    /// Leading text, e.g. `EMP`.
    pub prefix: String,
    /// Minimum number of digits; longer numbers are not truncated.
    pub width: usize,
}

impl EmployeeCodeFormat {
    /// Formats a sequence value as an employee code.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_ledger::config::EmployeeCodeFormat;
    ///
    /// let format = EmployeeCodeFormat::default();
    /// assert_eq!(format.format(7), "EMP007");
    /// assert_eq!(format.format(1000), "EMP1000");
    /// ```
    pub fn format(&self, value: u64) -> String {
        format!("{}{:0width$}", self.prefix, value, width = self.width)
    }
}

impl Default for EmployeeCodeFormat {
    fn default() -> Self {
        Self {
            prefix: "EMP".to_string(),
            width: 3,
        }
    }
}

/// Engine policy loaded from `engine.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Payroll cycle policy.
    pub payroll: PayrollPolicy,
    /// Leave policy.
    pub leave: LeavePolicy,
    /// Comp-off policy.
    pub comp_off: CompOffPolicy,
    /// Special leave type codes.
    pub codes: LeaveCodes,
    /// Employee code format.
    pub employee_code: EmployeeCodeFormat,
}

impl EngineConfig {
    /// Checks policy values that would make calculations meaningless.
    ///
    /// Returns a description of the first problem found.
    pub fn problems(&self) -> Option<String> {
        if self.payroll.total_working_days <= Decimal::ZERO {
            return Some("payroll.total_working_days must be positive".to_string());
        }
        if self.payroll.lop_divisor <= Decimal::ZERO {
            return Some("payroll.lop_divisor must be positive".to_string());
        }
        if self.leave.half_day_value <= Decimal::ZERO || self.leave.half_day_value > Decimal::ONE {
            return Some("leave.half_day_value must be in (0, 1]".to_string());
        }
        if !(1..=31).contains(&self.leave.pro_rata_cutoff_day) {
            return Some("leave.pro_rata_cutoff_day must be between 1 and 31".to_string());
        }
        if !(0..=MAX_COMP_OFF_EXPIRY_DAYS).contains(&self.comp_off.expiry_days) {
            return Some(format!(
                "comp_off.expiry_days must be between 0 and {}",
                MAX_COMP_OFF_EXPIRY_DAYS
            ));
        }
        if self.comp_off.credit_days <= Decimal::ZERO {
            return Some("comp_off.credit_days must be positive".to_string());
        }
        None
    }
}

/// A leave type declared in `leave_templates.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveTypeConfig {
    /// Short code, e.g. `CL`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Days granted per year.
    pub annual_quota: Decimal,
    /// Whether the leave is paid.
    #[serde(default = "default_true")]
    pub is_paid: bool,
    /// Whether unused days roll into the next year.
    #[serde(default)]
    pub carry_forward: bool,
}

fn default_true() -> bool {
    true
}

/// A leave template declared in `leave_templates.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateConfig {
    /// Template name, unique within the file.
    pub name: String,
    /// Leave types granted by the template.
    pub leave_types: Vec<LeaveTypeConfig>,
}

/// Leave templates configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// All templates.
    pub templates: Vec<TemplateConfig>,
}

/// Holiday file structure (`holidays/<year>.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayFile {
    /// The calendar year of the file.
    pub year: i32,
    /// Holidays in that year.
    pub holidays: Vec<Holiday>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct PayrollConfig {
    engine: EngineConfig,
    templates: Vec<TemplateConfig>,
    /// Sorted by date.
    holidays: Vec<Holiday>,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(engine: EngineConfig, templates: Vec<TemplateConfig>, holidays: Vec<Holiday>) -> Self {
        let mut sorted_holidays = holidays;
        sorted_holidays.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            engine,
            templates,
            holidays: sorted_holidays,
        }
    }

    /// Returns the engine policy.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns all leave templates.
    pub fn templates(&self) -> &[TemplateConfig] {
        &self.templates
    }

    /// Returns all holidays, oldest first.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.payroll.total_working_days, Decimal::from(26));
        assert_eq!(config.payroll.lop_divisor, Decimal::from(30));
        assert_eq!(config.leave.half_day_value, Decimal::new(5, 1));
        assert_eq!(config.leave.pro_rata_cutoff_day, 15);
        assert_eq!(config.leave.missing_balance, MissingBalancePolicy::Warn);
        assert_eq!(config.comp_off.expiry_days, 90);
        assert_eq!(config.codes.earned_leave, "EL");
        assert!(config.problems().is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "leave:\n  missing_balance: reject\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.leave.missing_balance, MissingBalancePolicy::Reject);
        assert_eq!(config.leave.pro_rata_cutoff_day, 15);
        assert_eq!(config.payroll.total_working_days, Decimal::from(26));
    }

    #[test]
    fn test_problems_reports_zero_divisor() {
        let mut config = EngineConfig::default();
        config.payroll.lop_divisor = Decimal::ZERO;
        assert!(config.problems().unwrap().contains("lop_divisor"));
    }

    #[test]
    fn test_problems_reports_out_of_range_expiry() {
        for days in [-1, MAX_COMP_OFF_EXPIRY_DAYS + 1, 1_000_000_000] {
            let mut config = EngineConfig::default();
            config.comp_off.expiry_days = days;
            assert!(config.problems().unwrap().contains("expiry_days"));
        }

        let mut config = EngineConfig::default();
        config.comp_off.expiry_days = MAX_COMP_OFF_EXPIRY_DAYS;
        assert!(config.problems().is_none());
    }

    #[test]
    fn test_full_quota_codes() {
        let codes = LeaveCodes::default();
        assert!(codes.is_full_quota("LOP"));
        assert!(codes.is_full_quota("CO"));
        assert!(!codes.is_full_quota("CL"));
        assert!(!codes.is_full_quota("EL"));
    }

    #[test]
    fn test_employee_code_format_pads_to_width() {
        let format = EmployeeCodeFormat::default();
        assert_eq!(format.format(1), "EMP001");
        assert_eq!(format.format(42), "EMP042");
        assert_eq!(format.format(999), "EMP999");
        assert_eq!(format.format(1000), "EMP1000");
    }

    #[test]
    fn test_leave_type_config_defaults_to_paid() {
        let yaml = "code: CL\nname: Casual Leave\nannual_quota: 12\n";
        let config: LeaveTypeConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.is_paid);
        assert!(!config.carry_forward);
        assert_eq!(config.annual_quota, Decimal::from(12));
    }
}
