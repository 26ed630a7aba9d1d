use std::path::{Path, PathBuf};

use crate::constants::import::{
    DEFAULT_BATCH_THRESHOLD, ITEMS_PATH_ENV, RATINGS_PATH_ENV,
};
use crate::errors::AccessError;

/// Settings for the import and backfill jobs.
///
/// Paths are optional at construction time so callers can run a single job;
/// a job that needs a missing path fails fast with a configuration error
/// before any table or store work happens.
#[derive(Clone, Debug)]
pub struct ImportConfig {
    /// CSV file holding item records (`itemId,title,categories`).
    pub items_path: Option<PathBuf>,
    /// CSV file holding rating records (`userId,itemId,score,observedAt`).
    pub ratings_path: Option<PathBuf>,
    /// Staged mutations per table before a batch is flushed.
    pub batch_threshold: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            items_path: None,
            ratings_path: None,
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
        }
    }
}

impl ImportConfig {
    /// Resolve paths from the `WIDETABLE_ITEMS_PATH` / `WIDETABLE_RATINGS_PATH`
    /// environment variables where set.
    pub fn from_env() -> Self {
        Self {
            items_path: std::env::var_os(ITEMS_PATH_ENV).map(PathBuf::from),
            ratings_path: std::env::var_os(RATINGS_PATH_ENV).map(PathBuf::from),
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
        }
    }

    /// Validate settings that every job depends on.
    pub fn validated(self) -> Result<Self, AccessError> {
        if self.batch_threshold == 0 {
            return Err(AccessError::Configuration(
                "batch threshold must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// Items path, or a configuration error naming the missing setting.
    pub fn items_path(&self) -> Result<&Path, AccessError> {
        self.items_path
            .as_deref()
            .ok_or_else(|| missing_setting("items path", ITEMS_PATH_ENV))
    }

    /// Ratings path, or a configuration error naming the missing setting.
    pub fn ratings_path(&self) -> Result<&Path, AccessError> {
        self.ratings_path
            .as_deref()
            .ok_or_else(|| missing_setting("ratings path", RATINGS_PATH_ENV))
    }
}

fn missing_setting(what: &str, env_var: &str) -> AccessError {
    AccessError::Configuration(format!(
        "missing required setting: {what} (set {env_var} or pass the path explicitly)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold_is_rejected() {
        let config = ImportConfig {
            batch_threshold: 0,
            ..ImportConfig::default()
        };
        assert!(matches!(
            config.validated(),
            Err(AccessError::Configuration(_))
        ));
    }

    #[test]
    fn missing_paths_fail_fast() {
        let config = ImportConfig::default();
        assert!(matches!(
            config.items_path(),
            Err(AccessError::Configuration(_))
        ));
        assert!(matches!(
            config.ratings_path(),
            Err(AccessError::Configuration(_))
        ));
    }
}
