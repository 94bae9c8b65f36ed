use std::collections::HashSet;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::info;

use super::catalog::{CatalogEntry, builtin_entries};
use super::step::UpgradeStep;
use crate::core::{Result, UpgradeError, Version};

lazy_static! {
    // Built once per process and shared by every resolver using the builtin catalog.
    static ref BUILTIN_REGISTRY: Result<Arc<UpgradeRegistry>> =
        UpgradeRegistry::from_entries(builtin_entries()).map(Arc::new);
}

/// Ordered, immutable list of upgrade steps.
///
/// Steps are kept in ascending source order. A release may have more than one
/// outgoing step (a patch branch next to a direct jump); resolution follows
/// whichever later step covers the version just reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRegistry {
    steps: Vec<UpgradeStep>,
    latest: Version,
}

impl UpgradeRegistry {
    /// Returns the shared registry built from the builtin catalog.
    pub fn builtin() -> Result<Arc<UpgradeRegistry>> {
        BUILTIN_REGISTRY.clone()
    }

    /// Builds a registry from catalog entries, validating the result.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let registry = Self::from_entries_unchecked(entries)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Builds a registry from catalog entries without checking the chain.
    ///
    /// Versions must still parse and the catalog must not be empty; call
    /// [`UpgradeRegistry::validate`] before resolving against the result.
    pub fn from_entries_unchecked<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let steps = entries
            .into_iter()
            .map(CatalogEntry::into_step)
            .collect::<Result<Vec<_>>>()?;
        let registry = Self::from_steps_unchecked(steps)?;
        info!(
            steps = registry.len(),
            latest = %registry.latest_version(),
            "built upgrade registry"
        );
        Ok(registry)
    }

    /// Builds a registry from already constructed steps, validating the result.
    pub fn from_steps(steps: Vec<UpgradeStep>) -> Result<Self> {
        let registry = Self::from_steps_unchecked(steps)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Builds a registry from already constructed steps without validating them.
    pub fn from_steps_unchecked(steps: Vec<UpgradeStep>) -> Result<Self> {
        let latest = steps
            .iter()
            .map(UpgradeStep::target_version)
            .max()
            .ok_or_else(|| {
                UpgradeError::InvalidCatalog("Catalog has no upgrade steps".to_string())
            })?;

        Ok(Self { steps, latest })
    }

    pub fn steps(&self) -> &[UpgradeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The newest version any registered step produces.
    pub fn latest_version(&self) -> Version {
        self.latest
    }

    pub fn get(&self, index: usize) -> Option<&UpgradeStep> {
        self.steps.get(index)
    }

    /// Finds the first step at or after `from_index` whose source covers `version`.
    pub fn position_covering(&self, version: &Version, from_index: usize) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .skip(from_index)
            .find(|(_, step)| step.covers(version))
            .map(|(index, _)| index)
    }

    /// Validates the integrity of the registry.
    ///
    /// Checks for:
    /// - unique step names,
    /// - step direction (target release beyond the source range),
    /// - ascending, non-overlapping source ranges,
    /// - gaps (a target no later step picks up, other than the last step's).
    pub fn validate(&self) -> Result<()> {
        let mut seen_names = HashSet::<&str>::new();
        let mut previous: Option<&UpgradeStep> = None;

        for step in &self.steps {
            let (low, high) = step.source_range();

            if !seen_names.insert(step.name()) {
                return Err(UpgradeError::InvalidCatalog(format!(
                    "Duplicate upgrade step '{}'",
                    step.name()
                )));
            }
            if step.target_version().base_release() <= high.base_release() {
                return Err(UpgradeError::InvalidCatalog(format!(
                    "Upgrade step '{}' {} -> {} does not move past its source release",
                    step.name(),
                    high,
                    step.target_version()
                )));
            }
            if let Some(prev) = previous {
                let (_, prev_high) = prev.source_range();
                if low.base_release() <= prev_high.base_release() {
                    return Err(UpgradeError::InvalidCatalog(format!(
                        "Upgrade step '{}' starting at {} overlaps or precedes '{}'",
                        step.name(),
                        low,
                        prev.name()
                    )));
                }
            }
            previous = Some(step);
        }

        let last_index = self.steps.len().saturating_sub(1);
        for (index, step) in self.steps.iter().enumerate().take(last_index) {
            let target = step.target_version();
            if self.position_covering(&target, index + 1).is_none() {
                return Err(UpgradeError::InvalidCatalog(format!(
                    "No upgrade step continues from {} reached by '{}'",
                    target,
                    step.name()
                )));
            }
        }

        Ok(())
    }
}
