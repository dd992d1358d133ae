//! Form configuration via `formwork.toml`
//!
//! Settings that change how owner outcomes are folded into a form. A schema
//! picks up a config through `SchemaBuilder::config`; child schemas inherit
//! their parent's config unless they set their own.

use formwork_core::error::{FormError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up by applications embedding formwork.
pub const CONFIG_FILE_NAME: &str = "formwork.toml";

/// How an invalid owner is reported when `require_owner_valid` also fires
/// for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerErrorMode {
    /// Copy the owner's field-level errors and add the whole-owner error
    #[default]
    Both,
    /// Only the whole-owner error; field-level copies are suppressed for
    /// owners whose `require_owner_valid` rule is engaged
    OwnerOnly,
}

/// Form configuration loaded from `formwork.toml`.
///
/// # Example
///
/// ```toml
/// owner_errors = "both"
/// invalid_owner_on_base = false
/// validate_on_save = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Reporting of owners covered by `require_owner_valid`.
    #[serde(default)]
    pub owner_errors: OwnerErrorMode,
    /// Add `"<slot> of type <T> is invalid"` under `base` for each invalid
    /// bound owner.
    #[serde(default)]
    pub invalid_owner_on_base: bool,
    /// Validate before saving when neither the call nor the form's options
    /// say otherwise.
    #[serde(default = "default_validate_on_save")]
    pub validate_on_save: bool,
}

fn default_validate_on_save() -> bool {
    true
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            owner_errors: OwnerErrorMode::default(),
            invalid_owner_on_base: false,
            validate_on_save: default_validate_on_save(),
        }
    }
}

impl FormConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Formwork configuration
#
# Reporting for owners covered by require_owner_valid: "both" (default) or "owner_only"
#   "both"       = owner's field errors are copied AND one error is added under the owner's key
#   "owner_only" = only the error under the owner's key
owner_errors = "both"

# Add "<owner> of type <T> is invalid" under `base` for every invalid owner (default: false)
invalid_owner_on_base = false

# Validate before save unless told otherwise (default: true)
validate_on_save = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Config` on malformed TOML or unknown enum values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FormError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FormError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            FormError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                FormError::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FormError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            FormError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
