use std::path::PathBuf;

use crate::core::{Result, Version};

/// Environment variable naming a JSON catalog file.
pub const CATALOG_ENV: &str = "DBUPGRADE_CATALOG";
/// Environment variable holding the default upgrade target.
pub const TARGET_ENV: &str = "DBUPGRADE_TARGET";
/// Environment variable that turns catalog validation off when set to
/// `false`, `0` or `no`.
pub const VALIDATE_ENV: &str = "DBUPGRADE_VALIDATE_CATALOG";

/// Resolver configuration
///
/// Selects where upgrade steps come from and which version to upgrade to when
/// the caller does not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// JSON catalog to load instead of the builtin one
    pub catalog_path: Option<PathBuf>,

    /// Target used when none is given (defaults to the newest known version)
    pub default_target: Option<Version>,

    /// Check a loaded catalog for gaps and ordering mistakes (default: true)
    pub validate_catalog: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_target: None,
            validate_catalog: true,
        }
    }
}

impl ResolverConfig {
    /// Create a configuration using the builtin catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load steps from a catalog file
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Set the default target version
    pub fn default_target(mut self, target: Version) -> Self {
        self.default_target = Some(target);
        self
    }

    /// Enable or disable catalog validation on load
    pub fn validate_catalog(mut self, validate: bool) -> Self {
        self.validate_catalog = validate;
        self
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup(CATALOG_ENV).filter(|p| !p.trim().is_empty()) {
            config = config.catalog_path(path);
        }
        if let Some(target) = lookup(TARGET_ENV).filter(|t| !t.trim().is_empty()) {
            config = config.default_target(Version::parse(&target)?);
        }
        if let Some(flag) = lookup(VALIDATE_ENV) {
            let flag = flag.trim().to_ascii_lowercase();
            if matches!(flag.as_str(), "false" | "0" | "no") {
                config = config.validate_catalog(false);
            }
        }

        Ok(config)
    }

    /// Override settings with values that were given explicitly
    pub fn merge(
        mut self,
        catalog_path: Option<PathBuf>,
        default_target: Option<Version>,
    ) -> Self {
        if catalog_path.is_some() {
            self.catalog_path = catalog_path;
        }
        if default_target.is_some() {
            self.default_target = default_target;
        }
        self
    }
}
