pub mod error;
pub mod version;

pub use error::{Result, UpgradeError};
pub use version::Version;
