//! Catalog entries: the serialized shape upgrade steps are declared in.
//!
//! The builtin catalog below records every schema transition the platform has
//! shipped since 2.2.1. JSON catalog files use the same entry shape, wrapped in
//! a top-level `steps` array.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::step::{Migration, UpgradeStep};
use crate::core::Result;

/// One declared transition, as written in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub from: String,
    /// Last release (inclusive) that also starts from this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    pub to: String,
    #[serde(default)]
    pub prepare: Vec<String>,
    #[serde(default)]
    pub cleanup: Vec<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            through: None,
            to: to.into(),
            prepare: Vec::new(),
            cleanup: Vec::new(),
        }
    }

    pub fn through(mut self, last_source: impl Into<String>) -> Self {
        self.through = Some(last_source.into());
        self
    }

    pub fn with_prepare(mut self, script: impl Into<String>) -> Self {
        self.prepare.push(script.into());
        self
    }

    pub fn with_cleanup(mut self, script: impl Into<String>) -> Self {
        self.cleanup.push(script.into());
        self
    }

    /// Parses the entry's versions into an [`UpgradeStep`].
    pub fn into_step(self) -> Result<UpgradeStep> {
        let mut step = UpgradeStep::new(self.name, &self.from, &self.to)?;
        if let Some(through) = &self.through {
            step = step.through(through)?;
        }
        Ok(step.with_migration(Migration::Scripts {
            prepare: self.prepare,
            cleanup: self.cleanup,
        }))
    }
}

/// Top-level layout of a JSON catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub steps: Vec<CatalogEntry>,
}

/// Reads catalog entries from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let raw = fs::read_to_string(path)?;
    let catalog: CatalogFile = serde_json::from_str(&raw)?;
    info!(
        path = %path.display(),
        steps = catalog.steps.len(),
        "loaded upgrade catalog"
    );
    Ok(catalog.steps)
}

// (name, from, through, to)
const BUILTIN_STEPS: &[(&str, &str, Option<&str>, &str)] = &[
    ("221to222", "2.2.1", None, "2.2.2"),
    ("222to224", "2.2.2", Some("2.2.3"), "2.2.4"),
    ("224to225", "2.2.4", None, "2.2.5"),
    ("225to226", "2.2.5", None, "2.2.6"),
    ("227to228", "2.2.6", Some("2.2.7"), "2.2.8"),
    ("228to229", "2.2.8", None, "2.2.9"),
    ("229to2210", "2.2.9", None, "2.2.10"),
    ("2210to2211", "2.2.10", None, "2.2.11"),
    ("2211to2212", "2.2.11", None, "2.2.12"),
    ("2212to2213", "2.2.12", None, "2.2.13"),
    ("2213to2214", "2.2.13", None, "2.2.14"),
    ("2214to30", "2.2.14", Some("2.2.16"), "3.0.0"),
    ("300to301", "3.0.0", None, "3.0.1"),
    ("301to302", "3.0.1", None, "3.0.2"),
    ("302to303", "3.0.2", None, "3.0.3"),
    ("303to304", "3.0.3", None, "3.0.4"),
    ("304to305", "3.0.4", None, "3.0.5"),
    ("305to306", "3.0.5", None, "3.0.6"),
    ("306to307", "3.0.6", None, "3.0.7"),
    // 3.0.7 jumps straight to 4.1.0; the 4.0.x line rejoins there.
    ("307to410", "3.0.7", None, "4.1.0"),
    ("40to41", "4.0.0", Some("4.0.2"), "4.1.0"),
    ("410to420", "4.1.0", Some("4.1.1"), "4.2.0"),
    ("420to421", "4.2.0", None, "4.2.1"),
    ("421to430", "4.2.1", None, "4.3.0"),
    ("430to440", "4.3.0", Some("4.3.2"), "4.4.0"),
    ("440to441", "4.4.0", None, "4.4.1"),
    ("441to442", "4.4.1", None, "4.4.2"),
    // 4.4.3 and 4.4.4 are a patch branch off 4.4.2 that rejoins at 4.5.0.
    ("442to450", "4.4.2", None, "4.5.0"),
    ("443to444", "4.4.3", None, "4.4.4"),
    ("444to450", "4.4.4", None, "4.5.0"),
    ("450to451", "4.5.0", None, "4.5.1"),
    ("451to452", "4.5.1", None, "4.5.2"),
    ("452to453", "4.5.2", None, "4.5.3"),
    ("453to460", "4.5.3", None, "4.6.0"),
    ("460to461", "4.6.0", None, "4.6.1"),
    ("461to470", "4.6.1", Some("4.6.2"), "4.7.0"),
    ("470to471", "4.7.0", None, "4.7.1"),
    ("471to480", "4.7.1", Some("4.7.2"), "4.8.0"),
    ("480to481", "4.8.0", None, "4.8.1"),
    ("481to490", "4.8.1", Some("4.8.2.0"), "4.9.0"),
    ("490to4910", "4.9.0", None, "4.9.1.0"),
    ("4910to4920", "4.9.1.0", None, "4.9.2.0"),
    ("4920to4930", "4.9.2.0", None, "4.9.3.0"),
    ("4930to41000", "4.9.3.0", None, "4.10.0.0"),
    ("41000to41100", "4.10.0.0", None, "4.11.0.0"),
    ("41100to41110", "4.11.0.0", None, "4.11.1.0"),
    ("41110to41120", "4.11.1.0", None, "4.11.2.0"),
    ("41120to41130", "4.11.2.0", None, "4.11.3.0"),
    ("41120to41200", "4.11.3.0", None, "4.12.0.0"),
    ("41200to41300", "4.12.0.0", None, "4.13.0.0"),
    ("41300to41310", "4.13.0.0", None, "4.13.1.0"),
    ("41310to41400", "4.13.1.0", None, "4.14.0.0"),
    ("41400to41500", "4.14.0.0", Some("4.14.1.0"), "4.15.0.0"),
    ("41500to41510", "4.15.0.0", None, "4.15.1.0"),
    ("41510to41520", "4.15.1.0", None, "4.15.2.0"),
    ("41520to41600", "4.15.2.0", None, "4.16.0.0"),
    ("41600to41610", "4.16.0.0", None, "4.16.1.0"),
    ("41610to41700", "4.16.1.0", None, "4.17.0.0"),
    ("41700to41710", "4.17.0.0", None, "4.17.1.0"),
    ("41710to41720", "4.17.1.0", None, "4.17.2.0"),
    ("41720to41800", "4.17.2.0", None, "4.18.0.0"),
    ("41800to41810", "4.18.0.0", None, "4.18.1.0"),
    ("41810to41900", "4.18.1.0", None, "4.19.0.0"),
];

/// Entries of the builtin catalog, oldest first.
pub fn builtin_entries() -> Vec<CatalogEntry> {
    BUILTIN_STEPS
        .iter()
        .map(|(name, from, through, to)| {
            let entry = CatalogEntry::new(*name, *from, *to)
                .with_prepare(format!("db/schema-{name}.sql"))
                .with_cleanup(format!("db/schema-{name}-cleanup.sql"));
            match through {
                Some(last) => entry.through(*last),
                None => entry,
            }
        })
        .collect()
}
