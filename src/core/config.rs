use crate::core::commit::CommitRecord;
use crate::core::dirs::get_config_file;
use crate::core::error::RevlocError;
use crate::core::formatting::{DEFAULT_DATE_FORMAT, DEFAULT_PATH_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    #[default]
    Relative,
    Absolute,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RevlocConfig {
    pub date_format: String,
    pub date_style: DateStyle,
    pub path_separator: String,
    pub history_limit: usize,
}

impl Default for RevlocConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_style: DateStyle::Relative,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            history_limit: 50,
        }
    }
}

impl RevlocConfig {
    /// Load the user config, falling back to defaults when none exists.
    pub fn load_or_default() -> Result<Self, RevlocError> {
        Self::load_from(&get_config_file()?)
    }

    pub fn load_from(config_file: &Path) -> Result<Self, RevlocError> {
        if !config_file.exists() {
            log::debug!("No config at {}, using defaults", config_file.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_file)?;
        serde_json::from_str(&content)
            .map_err(|e| RevlocError::config_parse_failed(config_file, e))
    }

    pub fn save(&self) -> Result<(), RevlocError> {
        self.save_to(&get_config_file()?)
    }

    pub fn save_to(&self, config_file: &Path) -> Result<(), RevlocError> {
        if let Some(parent) = config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_file, content)?;
        Ok(())
    }

    /// Render a commit's date the way the user asked for.
    pub fn format_commit_date(&self, commit: &CommitRecord) -> String {
        match self.date_style {
            DateStyle::Relative => commit.from_now().to_string(),
            DateStyle::Absolute => commit.format_date(&self.date_format),
        }
    }
}
