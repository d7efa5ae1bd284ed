//! Explorer configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::filter::PickerFilter;

/// Configuration shared by every explorer session.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ExplorerConfig {
    /// Directory opened when no saved location is usable (None = home directory).
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub start_directory: Option<PathBuf>,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub show_hidden: bool,

    /// Only show files matching this MIME pattern (picker mode).
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub picker_filter: Option<PickerFilter>,

    /// Mount point used for the storage summary (None = volume of the current directory).
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub storage_root: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl ExplorerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(ref dir)) = self.start_directory {
            if dir.as_os_str().is_empty() {
                return Err("Start directory cannot be empty".to_string());
            }
        }
        if let Some(Some(ref root)) = self.storage_root {
            if root.as_os_str().is_empty() {
                return Err("Storage root cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ExplorerConfig {
    /// Create a new config builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            start_directory: None,
            show_hidden: true,
            picker_filter: None,
            storage_root: None,
        }
    }
}
