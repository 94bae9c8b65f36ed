use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::registry::UpgradeRegistry;
use super::step::UpgradeStep;
use crate::config::ResolverConfig;
use crate::core::{Result, UpgradeError, Version};

/// The ordered steps that take a schema from one version to another.
///
/// Never empty: the last step always leaves the schema at the requested target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradePath {
    steps: Vec<UpgradeStep>,
}

impl UpgradePath {
    pub fn steps(&self) -> &[UpgradeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UpgradeStep> {
        self.steps.iter()
    }

    pub fn first(&self) -> Option<&UpgradeStep> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&UpgradeStep> {
        self.steps.last()
    }

    pub fn into_steps(self) -> Vec<UpgradeStep> {
        self.steps
    }
}

impl IntoIterator for UpgradePath {
    type Item = UpgradeStep;
    type IntoIter = std::vec::IntoIter<UpgradeStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a UpgradePath {
    type Item = &'a UpgradeStep;
    type IntoIter = std::slice::Iter<'a, UpgradeStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Resolves upgrade paths against a fixed registry.
///
/// Holds no mutable state; one resolver can serve any number of threads.
#[derive(Debug, Clone)]
pub struct UpgradeResolver {
    registry: Arc<UpgradeRegistry>,
}

impl UpgradeResolver {
    /// Creates a resolver over the builtin catalog.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(UpgradeRegistry::builtin()?))
    }

    pub fn with_registry(registry: Arc<UpgradeRegistry>) -> Self {
        Self { registry }
    }

    /// Creates a resolver over the catalog selected by `config`.
    ///
    /// With `validate_catalog` off a custom catalog is loaded as written, and
    /// the caller is expected to run [`UpgradeRegistry::validate`] itself.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        match &config.catalog_path {
            Some(path) => {
                let entries = super::catalog::load_catalog(path)?;
                let registry = if config.validate_catalog {
                    UpgradeRegistry::from_entries(entries)?
                } else {
                    UpgradeRegistry::from_entries_unchecked(entries)?
                };
                Ok(Self::with_registry(Arc::new(registry)))
            }
            None => Self::new(),
        }
    }

    pub fn registry(&self) -> &UpgradeRegistry {
        &self.registry
    }

    /// The newest version the registry knows how to produce.
    pub fn latest_version(&self) -> Version {
        self.registry.latest_version()
    }

    /// Resolves the ordered steps that take `installed` to `target`.
    ///
    /// An installed release the registry does not know, or a target the
    /// registered steps cannot land on exactly, is finished with a no-op step
    /// that stamps `target`. Fails only when `installed` is newer than `target`.
    pub fn calculate_upgrade_path(
        &self,
        installed: &Version,
        target: &Version,
    ) -> Result<UpgradePath> {
        if installed > target {
            return Err(UpgradeError::Downgrade {
                installed: *installed,
                target: *target,
            });
        }

        let Some(start) = self.registry.position_covering(installed, 0) else {
            warn!(
                %installed,
                target_version = %target,
                "installed version is not in the upgrade registry"
            );
            return Ok(UpgradePath {
                steps: vec![UpgradeStep::identity(*installed, *target)],
            });
        };

        let mut steps = Vec::new();
        let mut current = *installed;
        let mut cursor = Some(start);

        while let Some(index) = cursor {
            let Some(step) = self.registry.get(index) else {
                break;
            };
            if step.target_version() > *target {
                debug!(
                    step = step.name(),
                    target_version = %target,
                    "next step overshoots target"
                );
                break;
            }

            debug!(
                step = step.name(),
                from = %current,
                to = %step.target_version(),
                "adding upgrade step"
            );
            steps.push(step.clone());
            current = step.target_version();
            if current == *target {
                break;
            }
            cursor = self.registry.position_covering(&current, index + 1);
        }

        if steps.is_empty() || current != *target {
            debug!(
                from = %current,
                target_version = %target,
                "finishing path with no-op step"
            );
            steps.push(UpgradeStep::identity(current, *target));
        }

        Ok(UpgradePath { steps })
    }
}
