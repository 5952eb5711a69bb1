//! Dataset configuration.

use cocoql_core::IdPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default JSON indentation, in spaces.
pub const DEFAULT_INDENT: usize = 4;

///
/// DatasetConfig
///

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory holding the dataset's image files.
    pub images_dir: Option<PathBuf>,
    /// Id policy of every collection the dataset creates.
    pub id_policy: IdPolicy,
    /// Indentation of saved documents.
    pub indent: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            images_dir: None,
            id_policy: IdPolicy::default(),
            indent: DEFAULT_INDENT,
        }
    }
}

impl DatasetConfig {
    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(dir.into());
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
