//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use chrono::Datelike;
use std::fs;
use std::path::Path;

use tracing::error;

use crate::error::{EngineError, EngineResult};
use crate::models::Holiday;

use super::types::{EngineConfig, HolidayFile, PayrollConfig, TemplateConfig, TemplatesConfig};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query policy, leave templates and holidays.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/standard/
/// ├── engine.yaml            # Payroll, leave and comp-off policy
/// ├── leave_templates.yaml   # Leave templates and their leave types
/// └── holidays/
///     └── 2026.yaml          # Holidays for one calendar year
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
///
/// let template = loader.get_template("Standard").unwrap();
/// println!("Template {} has {} leave types", template.name, template.leave_types.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/standard")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A policy value is out of range
    /// - A template repeats a leave type code
    ///
    /// The `holidays/` directory is optional; without it no holidays apply.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine = Self::load_yaml::<EngineConfig>(&engine_path)?;
        if let Some(problem) = engine.problems() {
            error!(path = %engine_path.display(), %problem, "invalid engine policy");
            return Err(EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: problem,
            });
        }

        let templates_path = path.join("leave_templates.yaml");
        let templates = Self::load_yaml::<TemplatesConfig>(&templates_path)?.templates;
        Self::check_templates(&templates_path, &templates)?;

        let holidays = Self::load_holidays(&path.join("holidays"))?;

        Ok(Self {
            config: PayrollConfig::new(engine, templates, holidays),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| {
            error!(path = %path_str, "configuration file not found");
            EngineError::ConfigNotFound {
                path: path_str.clone(),
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            error!(path = %path_str, error = %e, "configuration file is not valid");
            EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            }
        })
    }

    fn check_templates(path: &Path, templates: &[TemplateConfig]) -> EngineResult<()> {
        for (index, template) in templates.iter().enumerate() {
            let duplicate_name = templates[..index].iter().any(|t| t.name == template.name);
            let duplicate_code = template
                .leave_types
                .iter()
                .enumerate()
                .find(|(i, lt)| template.leave_types[..*i].iter().any(|o| o.code == lt.code));

            let message = if duplicate_name {
                Some(format!("template '{}' is declared twice", template.name))
            } else {
                duplicate_code.map(|(_, lt)| {
                    format!(
                        "template '{}' declares leave type '{}' twice",
                        template.name, lt.code
                    )
                })
            };

            if let Some(message) = message {
                error!(path = %path.display(), %message, "invalid leave templates");
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message,
                });
            }
        }
        Ok(())
    }

    /// Loads all holiday files from the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<Vec<Holiday>> {
        if !holidays_dir.exists() {
            return Ok(Vec::new());
        }

        let holidays_dir_str = holidays_dir.display().to_string();
        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: holidays_dir_str.clone(),
        })?;

        let mut holidays = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: holidays_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let file = Self::load_yaml::<HolidayFile>(&path)?;
                if let Some(stray) = file.holidays.iter().find(|h| h.date.year() != file.year) {
                    let message = format!(
                        "holiday '{}' on {} is outside {}",
                        stray.name, stray.date, file.year
                    );
                    error!(path = %path.display(), %message, "invalid holiday file");
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message,
                    });
                }
                holidays.extend(file.holidays);
            }
        }

        Ok(holidays)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }

    /// Returns the engine policy.
    pub fn engine(&self) -> &EngineConfig {
        self.config.engine()
    }

    /// Gets a leave template by name.
    ///
    /// # Returns
    ///
    /// Returns the template if found, or `MissingReferenceData` error.
    pub fn get_template(&self, name: &str) -> EngineResult<&TemplateConfig> {
        self.config
            .templates()
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| {
                EngineError::missing_reference(format!("leave template '{}' is not configured", name))
            })
    }

    /// Returns the holidays falling in `year`.
    pub fn holidays_in(&self, year: i32) -> Vec<&Holiday> {
        self.config
            .holidays()
            .iter()
            .filter(|h| h.date.year() == year)
            .collect()
    }
}
