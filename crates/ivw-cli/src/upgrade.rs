//! Bring a workspace file up to the current module versions.

use std::path::{Path, PathBuf};

use ivw_serialization::{
    ConverterRegistry, Deserializer, ModuleUpgrade, Result, Serializer, SerializerOptions,
};
use serde::Serialize;

/// Outcome of [`upgrade_workspace`].
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeReport {
    pub input: PathBuf,
    /// Where the upgraded document went; `None` for a dry run or an
    /// up-to-date file upgraded in place.
    pub written: Option<PathBuf>,
    pub dry_run: bool,
    pub upgrades: Vec<UpgradeEntry>,
}

impl UpgradeReport {
    pub fn changed(&self) -> bool {
        self.upgrades.iter().any(|u| u.changed)
    }

    /// Closing line of the report: where the file went, or that a dry run wrote nothing.
    pub fn outcome(&self) -> Option<String> {
        match (&self.written, self.dry_run) {
            (Some(path), _) => Some(format!("Wrote: {}", path.display())),
            (None, true) => Some("Dry run, nothing written.".to_owned()),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeEntry {
    pub module: String,
    pub from_version: u32,
    pub to_version: u32,
    pub changed: bool,
}

impl From<ModuleUpgrade> for UpgradeEntry {
    fn from(upgrade: ModuleUpgrade) -> Self {
        Self {
            module: upgrade.module,
            from_version: upgrade.from_version,
            to_version: upgrade.to_version,
            changed: upgrade.changed,
        }
    }
}

/// Load `input`, run the converters of outdated modules and write the result.
///
/// The document goes to `output`, or back over `input` when no output is
/// given. A dry run converts in memory and writes nothing. A document with
/// nothing to upgrade is not rewritten.
pub fn upgrade_workspace(
    input: &Path,
    output: Option<&Path>,
    dry_run: bool,
    registry: &ConverterRegistry,
    options: SerializerOptions,
) -> Result<UpgradeReport> {
    let mut deserializer = Deserializer::from_file(input)?;
    let upgrades = deserializer.apply_converters(registry);
    let mut report = UpgradeReport {
        input: input.to_path_buf(),
        written: None,
        dry_run,
        upgrades: upgrades.into_iter().map(UpgradeEntry::from).collect(),
    };

    let target = output.unwrap_or(input);
    if dry_run || (report.upgrades.is_empty() && output.is_none()) {
        tracing::debug!(dry_run, "Skipping write of {}", target.display());
        return Ok(report);
    }

    let serializer = Serializer::from_document(deserializer.into_document(), options);
    serializer.write_to_path(target)?;
    report.written = Some(target.to_path_buf());
    Ok(report)
}
