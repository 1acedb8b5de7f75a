//! Per-module version tracking and document upgrades.
//!
//! Every document carries a table of the module versions that wrote it:
//!
//! ```xml
//! <ModuleVersions>
//!   <Module name="ABufferGL" version="1"/>
//! </ModuleVersions>
//! ```
//!
//! On load, each registered module whose persisted version is behind gets
//! its converter run against the raw document before any value is read.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{MODULE_ELEMENT, MODULE_VERSIONS, NAME_ATTRIBUTE, VERSION_ATTRIBUTE};
use crate::document::{Document, NodeId};

/// Rewrites a document written by an older version of one module.
pub trait VersionConverter {
    /// Upgrade `document` from `from_version`. Returns whether anything changed.
    fn convert(&self, document: &mut Document, from_version: u32) -> bool;
}

impl<F> VersionConverter for F
where
    F: Fn(&mut Document, u32) -> bool,
{
    fn convert(&self, document: &mut Document, from_version: u32) -> bool {
        self(document, from_version)
    }
}

struct RegisteredModule {
    version: u32,
    converter: Option<Box<dyn VersionConverter>>,
}

/// Outcome of upgrading one module's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleUpgrade {
    pub module: String,
    pub from_version: u32,
    pub to_version: u32,
    pub changed: bool,
}

/// Known modules with their current version and optional converter.
#[derive(Default)]
pub struct ConverterRegistry {
    modules: BTreeMap<String, RegisteredModule>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.modules.iter().map(|(name, m)| (name, m.version)))
            .finish()
    }
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` at `version` with a converter for older data.
    pub fn register(
        &mut self,
        module: impl Into<String>,
        version: u32,
        converter: impl VersionConverter + 'static,
    ) -> &mut Self {
        self.modules.insert(
            module.into(),
            RegisteredModule {
                version,
                converter: Some(Box::new(converter)),
            },
        );
        self
    }

    /// Register a module that has a version but nothing to convert.
    pub fn register_version(&mut self, module: impl Into<String>, version: u32) -> &mut Self {
        self.modules.insert(
            module.into(),
            RegisteredModule {
                version,
                converter: None,
            },
        );
        self
    }

    pub fn current_version(&self, module: &str) -> Option<u32> {
        self.modules.get(module).map(|m| m.version)
    }

    /// Registered modules and their current versions, sorted by name.
    pub fn modules(&self) -> impl Iterator<Item = (&str, u32)> {
        self.modules.iter().map(|(name, m)| (name.as_str(), m.version))
    }

    /// Version of `module` recorded in `document`, 0 when not recorded.
    pub fn persisted_version(document: &Document, module: &str) -> u32 {
        module_entry(document, module)
            .and_then(|node| document.attribute(node, VERSION_ATTRIBUTE))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Every module version recorded in `document`.
    pub fn persisted_versions(document: &Document) -> BTreeMap<String, u32> {
        let Some(table) = document.find_child(document.root(), MODULE_VERSIONS) else {
            return BTreeMap::new();
        };
        document
            .children_named(table, MODULE_ELEMENT)
            .filter_map(|node| {
                let name = document.attribute(node, NAME_ATTRIBUTE)?;
                let version = document
                    .attribute(node, VERSION_ATTRIBUTE)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0);
                Some((name.to_string(), version))
            })
            .collect()
    }

    /// Write the current version of every registered module into `document`.
    ///
    /// Entries for modules this registry does not know are left untouched.
    pub fn stamp(&self, document: &mut Document) {
        let root = document.root();
        let table = match document.find_child(root, MODULE_VERSIONS) {
            Some(table) => table,
            None => document.append_child(root, MODULE_VERSIONS),
        };
        for (name, module) in &self.modules {
            let entry = match module_entry(document, name) {
                Some(entry) => entry,
                None => {
                    let entry = document.append_child(table, MODULE_ELEMENT);
                    document.set_attribute(entry, NAME_ATTRIBUTE, name.as_str());
                    entry
                }
            };
            document.set_attribute(entry, VERSION_ATTRIBUTE, module.version.to_string());
        }
    }

    /// Run the converter of every module whose persisted version is behind,
    /// then stamp the current versions.
    pub fn upgrade(&self, document: &mut Document) -> Vec<ModuleUpgrade> {
        let mut upgrades = Vec::new();
        for (name, module) in &self.modules {
            let from_version = Self::persisted_version(document, name);
            if from_version >= module.version {
                continue;
            }
            let changed = module
                .converter
                .as_ref()
                .is_some_and(|c| c.convert(document, from_version));
            tracing::debug!(module = %name, from_version, changed, "Ran version converter");
            upgrades.push(ModuleUpgrade {
                module: name.clone(),
                from_version,
                to_version: module.version,
                changed,
            });
        }
        self.stamp(document);
        upgrades
    }
}

fn module_entry(document: &Document, module: &str) -> Option<NodeId> {
    let table = document.find_child(document.root(), MODULE_VERSIONS)?;
    document
        .children_named(table, MODULE_ELEMENT)
        .find(|&node| document.attribute(node, NAME_ATTRIBUTE) == Some(module))
}
