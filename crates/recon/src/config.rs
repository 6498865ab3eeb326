use serde::Deserialize;

use crate::error::ReconError;
use crate::layout::Layout;

// ---------------------------------------------------------------------------
// Run config
// ---------------------------------------------------------------------------

/// Run configuration, deserialized from TOML. Every field has a default, so
/// an empty document (or no config file at all) is valid; CLI flags override
/// whatever the file says.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Optional run label carried into the result metadata.
    pub name: Option<String>,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Forced column layout; absent means detect from the column count.
    pub layout: Option<Layout>,
    /// Leading rows to ignore before any cleanup.
    pub skip_rows: usize,
    /// Excel sheet to read; absent means the first sheet.
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sort matched/unmatched outputs ascending by amount.
    pub sort_by_amount: bool,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn from_toml(input: &str) -> Result<RunConfig, ReconError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "name must not be blank".into(),
                ));
            }
        }
        if let Some(sheet) = &self.input.sheet {
            if sheet.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "input.sheet must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config.name, None);
        assert_eq!(config.input.layout, None);
        assert_eq!(config.input.skip_rows, 0);
        assert_eq!(config.input.sheet, None);
        assert!(!config.output.sort_by_amount);
    }

    #[test]
    fn full_document_parses() {
        let config = RunConfig::from_toml(
            r#"
name = "july closing"

[input]
layout = "five_column"
skip_rows = 2
sheet = "Transfers"

[output]
sort_by_amount = true
"#,
        )
        .unwrap();
        assert_eq!(config.name.as_deref(), Some("july closing"));
        assert_eq!(config.input.layout, Some(Layout::FiveColumn));
        assert_eq!(config.input.skip_rows, 2);
        assert_eq!(config.input.sheet.as_deref(), Some("Transfers"));
        assert!(config.output.sort_by_amount);
    }

    #[test]
    fn sections_are_individually_optional() {
        let config = RunConfig::from_toml("[output]\nsort_by_amount = true\n").unwrap();
        assert!(config.output.sort_by_amount);
        assert_eq!(config.input.skip_rows, 0);
        assert_eq!(config.input.layout, None);
    }

    #[test]
    fn unknown_layout_is_a_parse_error() {
        let err = RunConfig::from_toml("[input]\nlayout = \"seven_column\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = RunConfig::from_toml("name = \"  \"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn blank_sheet_is_rejected() {
        let err = RunConfig::from_toml("[input]\nsheet = \"\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }
}
