//! Read-only summaries of a workspace document.

use std::path::{Path, PathBuf};

use ivw_serialization::constants::{
    CONTENT_ATTRIBUTE, IDENTIFIER_ATTRIBUTE, MATRIX_COLUMN_PREFIX, TYPE_ATTRIBUTE,
};
use ivw_serialization::{ConverterRegistry, Deserializer, Document, NodeId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub root: String,
    pub workspace_version: u32,
    pub node_count: usize,
    pub modules: Vec<ModuleStatus>,
    pub properties: Vec<PropertySummary>,
}

impl WorkspaceSummary {
    pub fn needs_upgrade(&self) -> bool {
        self.modules.iter().any(|m| m.needs_upgrade)
    }
}

/// Persisted and current version of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStatus {
    pub name: String,
    pub persisted_version: u32,
    /// `None` when the tool has no converter registered for the module.
    pub current_version: Option<u32>,
    pub needs_upgrade: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySummary {
    /// Dot-separated identifiers of the enclosing objects.
    pub owner: String,
    pub class_identifier: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Summarize a loaded workspace against the versions in `registry`.
pub fn summarize(deserializer: &Deserializer, registry: &ConverterRegistry) -> WorkspaceSummary {
    let document = deserializer.document();
    WorkspaceSummary {
        path: deserializer.path().map(Path::to_path_buf),
        root: document.name(document.root()).to_string(),
        workspace_version: deserializer.workspace_version(),
        node_count: document.len(),
        modules: module_statuses(document, registry),
        properties: property_summaries(document),
    }
}

fn module_statuses(document: &Document, registry: &ConverterRegistry) -> Vec<ModuleStatus> {
    let persisted = ConverterRegistry::persisted_versions(document);
    let mut statuses: Vec<ModuleStatus> = registry
        .modules()
        .map(|(name, current)| {
            let persisted_version = persisted.get(name).copied().unwrap_or(0);
            ModuleStatus {
                name: name.to_string(),
                persisted_version,
                current_version: Some(current),
                needs_upgrade: persisted_version < current,
            }
        })
        .collect();
    for (name, &version) in &persisted {
        if registry.current_version(name).is_none() {
            statuses.push(ModuleStatus {
                name: name.clone(),
                persisted_version: version,
                current_version: None,
                needs_upgrade: false,
            });
        }
    }
    statuses.sort_by(|a, b| a.name.cmp(&b.name));
    statuses
}

fn property_summaries(document: &Document) -> Vec<PropertySummary> {
    document
        .descendants(document.root())
        .filter(|&node| document.name(node) == "Property")
        .filter_map(|node| {
            let identifier = document.attribute(node, IDENTIFIER_ATTRIBUTE)?;
            Some(PropertySummary {
                owner: owner_path(document, node),
                class_identifier: document
                    .attribute(node, TYPE_ATTRIBUTE)
                    .unwrap_or_default()
                    .to_string(),
                identifier: identifier.to_string(),
                value: document
                    .find_child(node, "value")
                    .map(|value| value_text(document, value)),
            })
        })
        .collect()
}

fn owner_path(document: &Document, node: NodeId) -> String {
    let mut owners = Vec::new();
    let mut current = document.parent(node);
    while let Some(id) = current {
        if let Some(identifier) = document.attribute(id, IDENTIFIER_ATTRIBUTE) {
            owners.push(identifier);
        }
        current = document.parent(id);
    }
    owners.reverse();
    owners.join(".")
}

/// Render a stored value: scalar content, vector components or matrix columns.
pub fn value_text(document: &Document, node: NodeId) -> String {
    if let Some(content) = document.attribute(node, CONTENT_ATTRIBUTE) {
        return content.to_string();
    }
    let columns: Vec<String> = document
        .children(node)
        .iter()
        .filter(|&&child| document.name(child).starts_with(MATRIX_COLUMN_PREFIX))
        .map(|&child| format!("({})", components(document, child)))
        .collect();
    if columns.is_empty() {
        format!("({})", components(document, node))
    } else {
        columns.join(" ")
    }
}

fn components(document: &Document, node: NodeId) -> String {
    document
        .attributes(node)
        .iter()
        .map(|attribute| attribute.value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSPACE: &str = r#"<InviwoWorkspace version="2">
  <ModuleVersions>
    <Module name="ABufferGL" version="0"/>
    <Module name="Python3" version="3"/>
  </ModuleVersions>
  <Processors>
    <Processor type="org.inviwo.Background" identifier="Background">
      <Properties>
        <Property type="org.inviwo.FloatProperty" identifier="opacity">
          <value content="0.5"/>
        </Property>
        <Property type="org.inviwo.FloatVec4Property" identifier="bgColor1">
          <value x="0" y="0" z="0" w="1"/>
        </Property>
        <Property type="org.inviwo.FloatMat2Property" identifier="transform">
          <value>
            <col0 x="1" y="0"/>
            <col1 x="0" y="1"/>
          </value>
        </Property>
      </Properties>
    </Processor>
  </Processors>
</InviwoWorkspace>"#;

    fn registry() -> ConverterRegistry {
        let mut registry = ConverterRegistry::new();
        registry.register_version("ABufferGL", 1);
        registry.register_version("Base", 2);
        registry
    }

    #[test]
    fn test_module_statuses() {
        let d = Deserializer::parse(WORKSPACE).unwrap();
        let summary = summarize(&d, &registry());
        let names: Vec<_> = summary.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["ABufferGL", "Base", "Python3"]);
        assert!(summary.modules[0].needs_upgrade);
        assert_eq!(summary.modules[1].persisted_version, 0);
        assert_eq!(summary.modules[2].current_version, None);
        assert!(summary.needs_upgrade());
    }

    #[test]
    fn test_property_values() {
        let d = Deserializer::parse(WORKSPACE).unwrap();
        let summary = summarize(&d, &registry());
        let values: Vec<_> = summary
            .properties
            .iter()
            .map(|p| (p.identifier.as_str(), p.value.as_deref().unwrap_or("")))
            .collect();
        assert_eq!(
            values,
            [
                ("opacity", "0.5"),
                ("bgColor1", "(0, 0, 0, 1)"),
                ("transform", "(1, 0) (0, 1)"),
            ]
        );
        assert_eq!(summary.properties[0].owner, "Background");
        assert_eq!(summary.workspace_version, 2);
    }
}
