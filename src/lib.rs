// ============================================================================
// dbupgrade Library
// ============================================================================

pub mod config;
pub mod core;
pub mod upgrade;

// Re-export main types for convenience
pub use crate::config::ResolverConfig;
pub use crate::core::{Result, UpgradeError, Version};
pub use crate::upgrade::{
    CatalogEntry, Migration, StepExecutor, UpgradePath, UpgradeRegistry, UpgradeReport,
    UpgradeResolver, UpgradeRunner, UpgradeStep,
};

/// Resolves an upgrade path over the builtin catalog.
///
/// # Examples
///
/// ```
/// use dbupgrade::{Version, calculate_upgrade_path};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let installed = Version::parse("4.10.0.0")?;
/// let target = Version::parse("4.12.0.0")?;
///
/// let path = calculate_upgrade_path(&installed, &target)?;
/// assert_eq!(path.len(), 5);
/// assert_eq!(path.steps()[4].upgraded_version(), "4.12.0.0");
/// # Ok(())
/// # }
/// ```
pub fn calculate_upgrade_path(installed: &Version, target: &Version) -> Result<UpgradePath> {
    UpgradeResolver::new()?.calculate_upgrade_path(installed, target)
}
