use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{Result, UpgradeError};

const MIN_COMPONENTS: usize = 2;
const MAX_COMPONENTS: usize = 4;

/// A release identifier of the form `major.minor.patch.security`.
///
/// Versions are parsed from two to four dot-separated numeric components;
/// missing trailing components are zero, so `4.9.0` and `4.9.0.0` are the
/// same version. Ordering is lexicographic over the four components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    security: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32, security: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            security,
        }
    }

    /// Parses a dotted version string such as `4.9.1` or `4.11.0.0`.
    pub fn parse(input: &str) -> Result<Self> {
        let components = input.trim().split('.').collect::<Vec<_>>();
        if components.len() < MIN_COMPONENTS || components.len() > MAX_COMPONENTS {
            return Err(UpgradeError::ParseError(format!(
                "Version '{}' must have between {} and {} components",
                input, MIN_COMPONENTS, MAX_COMPONENTS
            )));
        }

        let mut parts = [0u32; MAX_COMPONENTS];
        for (slot, component) in parts.iter_mut().zip(&components) {
            *slot = parse_component(input, component)?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn security(&self) -> u32 {
        self.security
    }

    /// The release this version belongs to, with the security component cleared.
    pub fn base_release(&self) -> Self {
        Self::new(self.major, self.minor, self.patch, 0)
    }

    /// Returns true when both versions share major, minor and patch.
    pub fn same_release(&self, other: &Version) -> bool {
        self.base_release() == other.base_release()
    }

    /// Returns this release with the given security component.
    pub fn with_security(&self, security: u32) -> Self {
        Self::new(self.major, self.minor, self.patch, security)
    }
}

fn parse_component(input: &str, component: &str) -> Result<u32> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UpgradeError::ParseError(format!(
            "Version '{}' has a non-numeric component '{}'",
            input, component
        )));
    }

    component.parse::<u32>().map_err(|e| {
        UpgradeError::ParseError(format!(
            "Version '{}' component '{}' is out of range: {}",
            input, component, e
        ))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.security
        )
    }
}

impl FromStr for Version {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}
