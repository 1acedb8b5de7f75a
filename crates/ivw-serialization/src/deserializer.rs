//! Reading values back out of a parsed document.
//!
//! Lookups are by child name under the current node. A missing node or
//! attribute leaves the target untouched and reports "no change", which keeps
//! documents from older and newer versions loadable.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::codec::{VectorComponents, read_vector};
use crate::constants::{VERSION_ATTRIBUTE, WORKSPACE_VERSION};
use crate::document::{Document, NodeId};
use crate::error::{Result, SerializationError};
use crate::scope::{NodeStack, NodeSwitch};
use crate::traits::DeserializeValue;
use crate::version::{ConverterRegistry, ModuleUpgrade};

/// Reads values from a [`Document`] under a movable current node.
#[derive(Debug)]
pub struct Deserializer {
    document: Document,
    nodes: Vec<NodeId>,
    path: Option<PathBuf>,
}

impl Deserializer {
    /// Wrap an existing document.
    ///
    /// Fails with [`SerializationError::UnsupportedVersion`] when the root
    /// declares a format version newer than this library writes.
    pub fn from_document(document: Document) -> Result<Self> {
        let root = document.root();
        if let Some(text) = document.attribute(root, VERSION_ATTRIBUTE) {
            let found: u32 = text.trim().parse().map_err(|_| {
                SerializationError::invalid_value(VERSION_ATTRIBUTE, text, "version number")
            })?;
            if found > WORKSPACE_VERSION {
                return Err(SerializationError::UnsupportedVersion {
                    found,
                    max_supported: WORKSPACE_VERSION,
                });
            }
        }
        Ok(Self {
            document,
            nodes: vec![root],
            path: None,
        })
    }

    /// Parse a document from XML text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_document(Document::parse_str(text)?)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_document(Document::parse_reader(reader)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| SerializationError::Io {
            operation: "open",
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut deserializer = Self::from_reader(BufReader::new(file))?;
        deserializer.path = Some(path.to_path_buf());
        tracing::info!("Loaded workspace from {}", path.display());
        Ok(deserializer)
    }

    /// Path the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Format version declared on the root, 0 when absent.
    pub fn workspace_version(&self) -> u32 {
        self.document
            .attribute(self.document.root(), VERSION_ATTRIBUTE)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Run every registered converter whose module is behind in this document.
    pub fn apply_converters(&mut self, registry: &ConverterRegistry) -> Vec<ModuleUpgrade> {
        let upgrades = registry.upgrade(&mut self.document);
        for upgrade in &upgrades {
            tracing::info!(
                module = %upgrade.module,
                from = upgrade.from_version,
                to = upgrade.to_version,
                changed = upgrade.changed,
                "Upgraded module data"
            );
        }
        upgrades
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Make `node` current until the returned guard drops.
    pub fn switch_to(&mut self, node: NodeId) -> NodeSwitch<'_, Self> {
        NodeSwitch::new(self, node)
    }

    /// Make the child named `key` current, `None` when there is no such child.
    pub fn switch_to_child(&mut self, key: &str) -> Option<NodeSwitch<'_, Self>> {
        let node = self.find(key)?;
        Some(NodeSwitch::new(self, node))
    }

    /// Whether the current node has a child named `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    fn find(&self, key: &str) -> Option<NodeId> {
        self.document.find_child(self.current_node(), key)
    }

    /// Read the child named `key` into `value`.
    pub fn deserialize<T: DeserializeValue + ?Sized>(
        &mut self,
        key: &str,
        value: &mut T,
    ) -> Result<bool> {
        match self.find(key) {
            Some(node) => value.deserialize_from(self, node),
            None => Ok(false),
        }
    }

    /// Read the attribute `key` of the current node.
    pub fn deserialize_attribute(&mut self, key: &str, value: &mut String) -> Result<bool> {
        let Some(text) = self.document.attribute(self.current_node(), key) else {
            return Ok(false);
        };
        if *value == text {
            return Ok(false);
        }
        text.clone_into(value);
        Ok(true)
    }

    /// Read a vector written with color component names.
    pub fn deserialize_color<V: VectorComponents>(
        &mut self,
        key: &str,
        value: &mut V,
    ) -> Result<bool> {
        match self.find(key) {
            Some(node) => read_vector(&self.document, node, value, true),
            None => Ok(false),
        }
    }

    /// Read a list node into `items`, growing with `T::default()`.
    pub fn deserialize_seq<T: DeserializeValue + Default>(
        &mut self,
        key: &str,
        items: &mut Vec<T>,
        item_key: &str,
    ) -> Result<bool> {
        self.deserialize_seq_with(key, items, item_key, T::default)
    }

    /// Read a list node into `items`, creating new elements with `factory`.
    ///
    /// The vector ends up with exactly as many elements as the list has
    /// `item_key` children. Existing elements are updated in place.
    pub fn deserialize_seq_with<T, F>(
        &mut self,
        key: &str,
        items: &mut Vec<T>,
        item_key: &str,
        mut factory: F,
    ) -> Result<bool>
    where
        T: DeserializeValue,
        F: FnMut() -> T,
    {
        let Some(list) = self.find(key) else {
            return Ok(false);
        };
        let children: Vec<NodeId> = self.document.children_named(list, item_key).collect();
        let mut changed = children.len() != items.len();
        items.truncate(children.len());
        for (index, child) in children.into_iter().enumerate() {
            if index == items.len() {
                items.push(factory());
            }
            changed |= items[index].deserialize_from(self, child)?;
        }
        Ok(changed)
    }

    /// Read an optional, pointer-like value.
    ///
    /// An absent node leaves `value` alone. An empty node without a
    /// `reference` tag (written for `None` with references allowed) clears it.
    /// Otherwise the value is created with `T::default()` if needed and read
    /// in place.
    pub fn deserialize_ref<T: DeserializeValue + Default>(
        &mut self,
        key: &str,
        value: &mut Option<T>,
    ) -> Result<bool> {
        let Some(node) = self.find(key) else {
            return Ok(false);
        };
        let empty =
            self.document.attributes(node).is_empty() && self.document.children(node).is_empty();
        if empty {
            return Ok(value.take().is_some());
        }
        match value {
            Some(existing) => existing.deserialize_from(self, node),
            None => {
                let mut created = T::default();
                created.deserialize_from(self, node)?;
                *value = Some(created);
                Ok(true)
            }
        }
    }
}

impl NodeStack for Deserializer {
    fn current_node(&self) -> NodeId {
        self.nodes.last().copied().unwrap_or_else(|| self.document.root())
    }

    fn push_node(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    fn pop_node(&mut self) {
        if self.nodes.len() > 1 {
            self.nodes.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat2, Vec2, Vec4};

    const SCENE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<InviwoWorkspace version="2">
  <count content="3"/>
  <label content="volume &amp; mesh"/>
  <offset x="0.5" y="-1"/>
  <tint r="255" g="128" b="0" a="255"/>
  <transform>
    <col0 x="2" y="0"/>
    <col1 x="0" y="2"/>
  </transform>
  <values>
    <item content="4"/>
    <item content="5"/>
  </values>
</InviwoWorkspace>"#;

    #[test]
    fn test_reads_primitives() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        let mut count = 0i32;
        let mut label = String::new();
        assert!(d.deserialize("count", &mut count).unwrap());
        assert!(d.deserialize("label", &mut label).unwrap());
        assert_eq!(count, 3);
        assert_eq!(label, "volume & mesh");
    }

    #[test]
    fn test_missing_key_leaves_value() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        let mut speed = 7.5f32;
        assert!(!d.deserialize("speed", &mut speed).unwrap());
        assert_eq!(speed, 7.5);
    }

    #[test]
    fn test_unchanged_value_reports_false() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        let mut count = 3i32;
        assert!(!d.deserialize("count", &mut count).unwrap());
    }

    #[test]
    fn test_bad_content_is_invalid_value() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        let mut count = 0u8;
        let err = d.deserialize("label", &mut count).unwrap_err();
        assert!(matches!(err, SerializationError::InvalidValue { .. }));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_reads_vector_color_and_matrix() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        let mut offset = Vec2::ZERO;
        let mut tint = Vec4::ZERO;
        let mut transform = Mat2::IDENTITY;
        assert!(d.deserialize("offset", &mut offset).unwrap());
        assert!(d.deserialize_color("tint", &mut tint).unwrap());
        assert!(d.deserialize("transform", &mut transform).unwrap());
        assert_eq!(offset, Vec2::new(0.5, -1.0));
        assert_eq!(tint, Vec4::new(255.0, 128.0, 0.0, 255.0));
        assert_eq!(transform, Mat2::from_diagonal(Vec2::splat(2.0)));
    }

    #[test]
    fn test_sequence_resizes() {
        let mut d = Deserializer::parse(SCENE).unwrap();

        let mut grow: Vec<i32> = vec![9];
        assert!(d.deserialize_seq("values", &mut grow, "item").unwrap());
        assert_eq!(grow, [4, 5]);

        let mut shrink: Vec<i32> = vec![4, 5, 6];
        assert!(d.deserialize_seq("values", &mut shrink, "item").unwrap());
        assert_eq!(shrink, [4, 5]);

        let mut same: Vec<i32> = vec![4, 5];
        assert!(!d.deserialize_seq("values", &mut same, "item").unwrap());
    }

    #[test]
    fn test_sequence_with_factory() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        let mut values: Vec<i64> = Vec::new();
        let mut created = 0;
        d.deserialize_seq_with("values", &mut values, "item", || {
            created += 1;
            -1
        })
        .unwrap();
        assert_eq!(created, 2);
        assert_eq!(values, [4, 5]);
    }

    #[test]
    fn test_switch_to_child() {
        let mut d = Deserializer::parse(SCENE).unwrap();
        assert!(d.switch_to_child("nothing").is_none());
        {
            let mut list = d.switch_to_child("values").unwrap();
            assert!(list.has_key("item"));
            let mut first = 0i32;
            list.deserialize("item", &mut first).unwrap();
            assert_eq!(first, 4);
        }
        assert!(d.has_key("count"));
    }

    #[test]
    fn test_reference_read() {
        let xml = r#"<InviwoWorkspace version="2"><a reference="i32" content="7"/><b/></InviwoWorkspace>"#;
        let mut d = Deserializer::parse(xml).unwrap();

        let mut a: Option<i32> = None;
        assert!(d.deserialize_ref("a", &mut a).unwrap());
        assert_eq!(a, Some(7));

        let mut b: Option<i32> = Some(1);
        assert!(d.deserialize_ref("b", &mut b).unwrap());
        assert_eq!(b, None);

        let mut c: Option<i32> = Some(2);
        assert!(!d.deserialize_ref("c", &mut c).unwrap());
        assert_eq!(c, Some(2));
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = Deserializer::parse(r#"<InviwoWorkspace version="99"/>"#).unwrap_err();
        assert!(matches!(
            err,
            SerializationError::UnsupportedVersion {
                found: 99,
                max_supported: WORKSPACE_VERSION
            }
        ));
    }

    #[test]
    fn test_version_defaults_to_zero() {
        let d = Deserializer::parse("<InviwoWorkspace/>").unwrap();
        assert_eq!(d.workspace_version(), 0);
    }

    #[test]
    fn test_parse_failure() {
        let err = Deserializer::parse("<InviwoWorkspace><a></b></InviwoWorkspace>").unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Deserializer::from_file(Path::new("/nonexistent/scene.inv")).unwrap_err();
        assert!(matches!(err, SerializationError::Io { operation: "open", .. }));
    }
}
