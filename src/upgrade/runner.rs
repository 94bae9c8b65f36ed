use tracing::{info, warn};

use super::resolver::UpgradeResolver;
use super::step::UpgradeStep;
use crate::core::{Result, UpgradeError, Version};

/// The engine that actually touches the database.
///
/// `apply` runs a step's migration; `record_version` persists the schema
/// version once the step succeeded.
pub trait StepExecutor {
    fn apply(&mut self, step: &UpgradeStep) -> Result<()>;

    fn record_version(&mut self, version: &Version) -> Result<()>;
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeReport {
    pub from: Version,
    pub reached: Version,
    pub applied: Vec<String>,
}

/// Drives an executor through a resolved path, one step at a time.
pub struct UpgradeRunner<'a> {
    resolver: &'a UpgradeResolver,
}

impl<'a> UpgradeRunner<'a> {
    pub fn new(resolver: &'a UpgradeResolver) -> Self {
        Self { resolver }
    }

    /// Upgrades from `installed` to `target`.
    ///
    /// Stops at the first failing step. The error carries the last version
    /// that was recorded, which is where a later run resumes from.
    pub fn run(
        &self,
        executor: &mut dyn StepExecutor,
        installed: &Version,
        target: &Version,
    ) -> Result<UpgradeReport> {
        let path = self.resolver.calculate_upgrade_path(installed, target)?;
        info!(
            %installed,
            target_version = %target,
            steps = path.len(),
            "starting schema upgrade"
        );

        let mut reached = *installed;
        let mut applied = Vec::with_capacity(path.len());

        for step in &path {
            let outcome = executor
                .apply(step)
                .and_then(|_| executor.record_version(&step.target_version()));

            if let Err(err) = outcome {
                warn!(step = step.name(), %reached, error = %err, "upgrade step failed");
                return Err(UpgradeError::StepFailed {
                    step: step.name().to_string(),
                    reached,
                    reason: err.to_string(),
                });
            }

            reached = step.target_version();
            applied.push(step.name().to_string());
        }

        info!(%reached, applied = applied.len(), "schema upgrade complete");
        Ok(UpgradeReport {
            from: *installed,
            reached,
            applied,
        })
    }
}
