pub mod catalog;
pub mod registry;
pub mod resolver;
pub mod runner;
pub mod step;

pub use catalog::{CatalogEntry, CatalogFile, builtin_entries, load_catalog};
pub use registry::UpgradeRegistry;
pub use resolver::{UpgradePath, UpgradeResolver};
pub use runner::{StepExecutor, UpgradeReport, UpgradeRunner};
pub use step::{Migration, NOOP_STEP_NAME, UpgradeStep};
