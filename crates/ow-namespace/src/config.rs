use std::path::{Path, PathBuf};

use ow_types::WideString;
use serde::{Deserialize, Serialize};

use crate::error::{read_file, ConfigError, ConfigResult};

/// Ranks are 16-bit, so no snapshot can hold more records than this.
pub const RANK_SPACE: usize = u16::MAX as usize + 1;

/// Which path, if any, marks the reserved placeholder entry.
///
/// Records at the placeholder path are never listed, and the root reports it
/// as its parsing name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderPolicy {
    /// The process temporary directory.
    #[default]
    TempDir,
    /// No placeholder: nothing is filtered and the root has no parsing name.
    Disabled,
    /// An explicit path.
    Fixed(PathBuf),
}

impl PlaceholderPolicy {
    /// The placeholder as a wide string, or `None` when disabled.
    pub fn resolve(&self) -> Option<WideString> {
        match self {
            Self::TempDir => Some(WideString::from(
                std::env::temp_dir().to_string_lossy().into_owned(),
            )),
            Self::Disabled => None,
            Self::Fixed(path) => Some(WideString::from(path.to_string_lossy().into_owned())),
        }
    }
}

/// Provider configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Placeholder path handling.
    pub placeholder: PlaceholderPolicy,
    /// Upper bound on records per snapshot (clamped to [`RANK_SPACE`]).
    pub max_records: usize,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderPolicy::TempDir,
            max_records: RANK_SPACE,
        }
    }
}

impl NamespaceConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_toml_str(&read_file(path)?)
    }

    /// Effective per-snapshot record limit.
    pub fn record_limit(&self) -> usize {
        self.max_records.min(RANK_SPACE)
    }

    fn validate(&self) -> ConfigResult<()> {
        if let PlaceholderPolicy::Fixed(path) = &self.placeholder {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "fixed placeholder path must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
