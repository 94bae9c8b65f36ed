use serde::{Deserialize, Serialize};

use crate::core::{Result, UpgradeError, Version};

/// Name given to synthetic steps that only stamp the schema version.
pub const NOOP_STEP_NAME: &str = "noop";

/// Work carried by an upgrade step. The resolver never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Migration {
    /// Schema scripts run before and after the version is stamped.
    Scripts {
        prepare: Vec<String>,
        cleanup: Vec<String>,
    },
    /// No schema change.
    Noop,
}

impl Migration {
    pub fn scripts() -> Self {
        Self::Scripts {
            prepare: Vec::new(),
            cleanup: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

/// A single transition from a source release range to an exact target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeStep {
    name: String,
    range: (String, String),
    source_low: Version,
    source_high: Version,
    target: Version,
    migration: Migration,
}

impl UpgradeStep {
    /// Creates a step from `from` to `to`, as written in the catalog.
    pub fn new(name: impl Into<String>, from: &str, to: &str) -> Result<Self> {
        let source = Version::parse(from)?;
        let target = Version::parse(to)?;
        Ok(Self {
            name: name.into(),
            range: (from.trim().to_string(), to.trim().to_string()),
            source_low: source,
            source_high: source,
            target,
            migration: Migration::scripts(),
        })
    }

    /// Builds the version-stamping step for one resolution call.
    ///
    /// The documented range is the actual `from -> to` of that call.
    pub fn identity(from: Version, to: Version) -> Self {
        Self {
            name: NOOP_STEP_NAME.to_string(),
            range: (from.to_string(), to.to_string()),
            source_low: from,
            source_high: from,
            target: to,
            migration: Migration::Noop,
        }
    }

    /// Widens the source range so later releases of a line share this step.
    pub fn through(mut self, last_source: &str) -> Result<Self> {
        let source_high = Version::parse(last_source)?;
        if source_high < self.source_low {
            return Err(UpgradeError::InvalidCatalog(format!(
                "Step '{}' ends its source range at {} before it starts at {}",
                self.name, source_high, self.source_low
            )));
        }
        self.source_high = source_high;
        Ok(self)
    }

    pub fn with_migration(mut self, migration: Migration) -> Self {
        self.migration = migration;
        self
    }

    /// Appends a script run before the version is stamped.
    pub fn with_prepare_script(mut self, script: impl Into<String>) -> Self {
        self.migration = match self.migration {
            Migration::Scripts {
                mut prepare,
                cleanup,
            } => {
                prepare.push(script.into());
                Migration::Scripts { prepare, cleanup }
            }
            Migration::Noop => Migration::Scripts {
                prepare: vec![script.into()],
                cleanup: Vec::new(),
            },
        };
        self
    }

    /// Appends a script run after the version is stamped.
    pub fn with_cleanup_script(mut self, script: impl Into<String>) -> Self {
        self.migration = match self.migration {
            Migration::Scripts {
                prepare,
                mut cleanup,
            } => {
                cleanup.push(script.into());
                Migration::Scripts { prepare, cleanup }
            }
            Migration::Noop => Migration::Scripts {
                prepare: Vec::new(),
                cleanup: vec![script.into()],
            },
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `(from, to)` pair this step is documented to cover.
    pub fn upgradable_version_range(&self) -> (&str, &str) {
        (&self.range.0, &self.range.1)
    }

    /// The canonical version string the schema is left at.
    pub fn upgraded_version(&self) -> String {
        self.target.to_string()
    }

    pub fn target_version(&self) -> Version {
        self.target
    }

    pub fn source_range(&self) -> (Version, Version) {
        (self.source_low, self.source_high)
    }

    pub fn migration(&self) -> &Migration {
        &self.migration
    }

    pub fn is_identity(&self) -> bool {
        self.migration.is_noop() && self.name == NOOP_STEP_NAME
    }

    /// Whether an installation at `version` may start from this step.
    ///
    /// Matching ignores the security component.
    pub fn covers(&self, version: &Version) -> bool {
        let release = version.base_release();
        self.source_low.base_release() <= release && release <= self.source_high.base_release()
    }
}
