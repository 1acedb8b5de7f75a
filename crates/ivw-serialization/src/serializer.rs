//! Building documents from in-memory values.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::{VectorComponents, write_vector};
use crate::constants::{REFERENCE_ATTRIBUTE, VERSION_ATTRIBUTE, WORKSPACE_VERSION};
use crate::document::{Document, NodeId};
use crate::error::{Result, SerializationError};
use crate::options::SerializerOptions;
use crate::scope::{NodeStack, NodeSwitch};
use crate::traits::SerializeValue;
use crate::version::ConverterRegistry;

/// Writes values into a [`Document`] under a movable current node.
///
/// Every `serialize*` call appends under the current node; objects get their
/// own node and write their fields into it.
#[derive(Debug)]
pub struct Serializer {
    document: Document,
    nodes: Vec<NodeId>,
    options: SerializerOptions,
    path: Option<PathBuf>,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self::with_options(SerializerOptions::default())
    }

    pub fn with_options(options: SerializerOptions) -> Self {
        let mut document = Document::new(options.root_name.clone());
        let root = document.root();
        document.set_attribute(root, VERSION_ATTRIBUTE, WORKSPACE_VERSION.to_string());
        Self {
            document,
            nodes: vec![root],
            options,
            path: None,
        }
    }

    /// Continue writing into an existing document, e.g. one loaded and upgraded
    /// by a [`Deserializer`](crate::Deserializer).
    pub fn from_document(document: Document, options: SerializerOptions) -> Self {
        let root = document.root();
        Self {
            document,
            nodes: vec![root],
            options,
            path: None,
        }
    }

    /// Serializer whose [`write_file`](Self::write_file) targets `path`.
    pub fn for_file(path: impl Into<PathBuf>, options: SerializerOptions) -> Self {
        let mut serializer = Self::with_options(options);
        serializer.path = Some(path.into());
        serializer
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
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

    /// Append a child named `key` and make it current until the guard drops.
    pub fn switch_to_new_node(&mut self, key: &str) -> NodeSwitch<'_, Self> {
        let node = self.append(key);
        NodeSwitch::new(self, node)
    }

    fn append(&mut self, key: &str) -> NodeId {
        let parent = self.current_node();
        self.document.append_child(parent, key)
    }

    /// Write `value` into a new child node named `key`.
    pub fn serialize<T: SerializeValue + ?Sized>(&mut self, key: &str, value: &T) {
        let node = self.append(key);
        value.serialize_into(self, node);
    }

    /// Write a string directly as an attribute of the current node.
    pub fn serialize_attribute(&mut self, key: &str, value: &str) {
        let node = self.current_node();
        self.document.set_attribute(node, key, value);
    }

    /// Write a vector with color component names (`r`, `g`, `b`, `a`).
    ///
    /// Components are written truncated to integers.
    pub fn serialize_color<V: VectorComponents>(&mut self, key: &str, value: &V) {
        let node = self.append(key);
        write_vector(&mut self.document, node, value, true);
    }

    /// Write every element under a list node named `key`, one `item_key`
    /// child per element.
    pub fn serialize_seq<'a, T, I>(&mut self, key: &str, items: I, item_key: &str)
    where
        T: SerializeValue + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut list = self.switch_to_new_node(key);
        for item in items {
            list.serialize(item_key, item);
        }
    }

    /// Write an optional, pointer-like value.
    ///
    /// A present value gets its own node tagged with a `reference` attribute
    /// naming its type, so that even a value without fields is told apart from
    /// `None`. With `allow_reference` a `None` is written as an empty, untagged
    /// node; without it `None` writes nothing.
    pub fn serialize_ref<T: SerializeValue + ?Sized>(&mut self, key: &str, value: Option<&T>) {
        match value {
            Some(value) => {
                let node = self.append(key);
                self.document
                    .set_attribute(node, REFERENCE_ATTRIBUTE, std::any::type_name::<T>());
                value.serialize_into(self, node);
            }
            None if self.options.allow_reference => {
                self.append(key);
            }
            None => {}
        }
    }

    /// Record the current module versions of `registry` in the document.
    pub fn stamp_module_versions(&mut self, registry: &ConverterRegistry) {
        registry.stamp(&mut self.document);
    }

    /// Emit the document as XML.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        self.document.write_to(writer, self.options.indent)
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        String::from_utf8(bytes)
            .map_err(|e| SerializationError::invalid_document(format!("non UTF-8 output: {e}")))
    }

    /// Write to the path given at construction.
    pub fn write_file(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| SerializationError::invalid_document("serializer has no target file"))?;
        self.write_to_path(path)
    }

    /// Write the document to `path`.
    ///
    /// The XML goes to a sibling temp file which is then renamed over `path`,
    /// so an interrupted write never leaves a truncated document behind.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;

        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(|ext| format!("{ext}.tmp"))
            .unwrap_or_else(|| "tmp".to_string());
        let temp_path = path.with_extension(extension);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SerializationError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = File::create(&temp_path).map_err(|e| SerializationError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        let written = file
            .write_all(&bytes)
            .map_err(|e| SerializationError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })
            .and_then(|()| {
                file.sync_all().map_err(|e| SerializationError::Io {
                    operation: "sync",
                    path: temp_path.clone(),
                    source: e,
                })
            });
        drop(file);

        let result = written.and_then(|()| {
            fs::rename(&temp_path, path).map_err(|e| SerializationError::AtomicWriteFailed {
                temp_path: temp_path.clone(),
                target_path: path.to_path_buf(),
                source: e,
            })
        });
        if let Err(error) = result {
            discard_temp_file(&temp_path);
            return Err(error);
        }

        tracing::info!("Saved workspace to {}", path.display());
        Ok(())
    }
}

fn discard_temp_file(temp_path: &Path) {
    if let Err(error) = fs::remove_file(temp_path) {
        tracing::warn!(
            path = %temp_path.display(),
            %error,
            "Failed to remove temporary file"
        );
    }
}

impl NodeStack for Serializer {
    fn current_node(&self) -> NodeId {
        self.nodes.last().copied().unwrap_or_else(|| self.document.root())
    }

    fn push_node(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    fn pop_node(&mut self) {
        // The root entry is never popped.
        if self.nodes.len() > 1 {
            self.nodes.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CONTENT_ATTRIBUTE;
    use crate::deserializer::Deserializer;
    use crate::traits::Serializable;
    use glam::{IVec2, Vec3, Vec4};

    struct Camera {
        fov: f32,
        position: Vec3,
    }

    impl Serializable for Camera {
        fn serialize(&self, s: &mut Serializer) {
            s.serialize_attribute("identifier", "camera");
            s.serialize("fov", &self.fov);
            s.serialize("position", &self.position);
        }

        fn deserialize(&mut self, d: &mut Deserializer) -> Result<bool> {
            let mut changed = d.deserialize("fov", &mut self.fov)?;
            changed |= d.deserialize("position", &mut self.position)?;
            Ok(changed)
        }
    }

    #[test]
    fn test_root_carries_version() {
        let s = Serializer::new();
        let doc = s.document();
        assert_eq!(doc.name(doc.root()), "InviwoWorkspace");
        assert_eq!(doc.attribute(doc.root(), VERSION_ATTRIBUTE), Some("2"));
    }

    #[test]
    fn test_primitive_uses_content_attribute() {
        let mut s = Serializer::new();
        s.serialize("value", &5);
        insta::assert_snapshot!(s.to_xml_string().unwrap(), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <InviwoWorkspace version="2">
          <value content="5"/>
        </InviwoWorkspace>
        "#);
    }

    #[test]
    fn test_object_gets_own_node() {
        let mut s = Serializer::new();
        let camera = Camera {
            fov: 38.5,
            position: Vec3::new(1.0, 2.0, 3.0),
        };
        s.serialize("Camera", &camera);
        insta::assert_snapshot!(s.to_xml_string().unwrap(), @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <InviwoWorkspace version="2">
          <Camera identifier="camera">
            <fov content="38.5"/>
            <position x="1" y="2" z="3"/>
          </Camera>
        </InviwoWorkspace>
        "#);
        assert_eq!(s.current_node(), s.document().root());
    }

    #[test]
    fn test_color_truncates_components() {
        let mut s = Serializer::new();
        s.serialize_color("color", &Vec4::new(255.9, 128.2, 0.0, 255.0));
        let doc = s.document();
        let node = doc.find_child(doc.root(), "color").unwrap();
        assert_eq!(doc.attribute(node, "r"), Some("255"));
        assert_eq!(doc.attribute(node, "g"), Some("128"));
        assert_eq!(doc.attribute(node, "a"), Some("255"));
        assert_eq!(doc.attribute(node, "x"), None);
    }

    #[test]
    fn test_sequence_keeps_primitive_elements() {
        let mut s = Serializer::new();
        let values = vec![1, 2, 3];
        s.serialize_seq("values", &values, "item");
        let doc = s.document();
        let list = doc.find_child(doc.root(), "values").unwrap();
        let contents: Vec<_> = doc
            .children_named(list, "item")
            .map(|n| doc.attribute(n, CONTENT_ATTRIBUTE).unwrap().to_string())
            .collect();
        assert_eq!(contents, ["1", "2", "3"]);
    }

    #[test]
    fn test_sequence_of_vectors() {
        let mut s = Serializer::new();
        let points = [IVec2::new(1, 2), IVec2::new(-3, 4)];
        s.serialize_seq("points", &points, "point");
        let doc = s.document();
        let list = doc.find_child(doc.root(), "points").unwrap();
        let second = doc.children(list)[1];
        assert_eq!(doc.attribute(second, "x"), Some("-3"));
    }

    #[test]
    fn test_reference_without_allow_reference() {
        let mut s = Serializer::new();
        s.serialize_ref::<i32>("missing", None);
        s.serialize_ref("present", Some(&7));
        let doc = s.document();
        assert!(doc.find_child(doc.root(), "missing").is_none());
        let present = doc.find_child(doc.root(), "present").unwrap();
        assert_eq!(doc.attribute(present, REFERENCE_ATTRIBUTE), Some("i32"));
        assert_eq!(doc.attribute(present, CONTENT_ATTRIBUTE), Some("7"));
    }

    #[test]
    fn test_reference_with_allow_reference() {
        let mut s = Serializer::with_options(SerializerOptions::default().with_allow_reference(true));
        s.serialize_ref::<i32>("missing", None);
        s.serialize_ref("present", Some(&7));
        let doc = s.document();
        let missing = doc.find_child(doc.root(), "missing").unwrap();
        assert!(doc.attributes(missing).is_empty());
        let present = doc.find_child(doc.root(), "present").unwrap();
        assert_eq!(doc.attribute(present, REFERENCE_ATTRIBUTE), Some("i32"));
        assert_eq!(doc.attribute(present, CONTENT_ATTRIBUTE), Some("7"));
    }

    #[derive(Debug, Default, PartialEq)]
    struct Marker;

    impl Serializable for Marker {
        fn serialize(&self, _s: &mut Serializer) {}

        fn deserialize(&mut self, _d: &mut Deserializer) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_fieldless_reference_survives_round_trip() {
        for allow_reference in [false, true] {
            let options = SerializerOptions::default().with_allow_reference(allow_reference);
            let mut s = Serializer::with_options(options);
            s.serialize_ref("marker", Some(&Marker));
            let xml = s.to_xml_string().unwrap();

            let mut d = Deserializer::parse(&xml).unwrap();
            let mut loaded = Some(Marker);
            assert!(!d.deserialize_ref("marker", &mut loaded).unwrap());
            assert_eq!(loaded, Some(Marker), "allow_reference = {allow_reference}");

            let mut created: Option<Marker> = None;
            assert!(d.deserialize_ref("marker", &mut created).unwrap());
            assert_eq!(created, Some(Marker));
        }
    }

    #[test]
    fn test_reference_tag_is_kept_beside_type() {
        struct Typed;

        impl Serializable for Typed {
            fn serialize(&self, s: &mut Serializer) {
                s.serialize_attribute("type", "org.inviwo.FloatProperty");
            }

            fn deserialize(&mut self, _d: &mut Deserializer) -> Result<bool> {
                Ok(false)
            }
        }

        let mut s = Serializer::with_options(SerializerOptions::default().with_allow_reference(true));
        s.serialize_ref("property", Some(&Typed));
        let doc = s.document();
        let node = doc.find_child(doc.root(), "property").unwrap();
        assert_eq!(doc.attribute(node, "type"), Some("org.inviwo.FloatProperty"));
        assert!(
            doc.attribute(node, REFERENCE_ATTRIBUTE)
                .is_some_and(|name| name.ends_with("Typed"))
        );
    }

    #[test]
    fn test_switch_to_new_node_nests() {
        let mut s = Serializer::new();
        {
            let mut network = s.switch_to_new_node("ProcessorNetwork");
            network.serialize("count", &2usize);
        }
        s.serialize("after", &true);
        let doc = s.document();
        let network = doc.find_child(doc.root(), "ProcessorNetwork").unwrap();
        assert!(doc.find_child(network, "count").is_some());
        assert!(doc.find_child(doc.root(), "after").is_some());
    }

    #[test]
    fn test_write_file_without_path_fails() {
        let s = Serializer::new();
        assert!(s.write_file().is_err());
    }

    #[test]
    fn test_write_to_path_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scene.inv");
        let mut s = Serializer::for_file(&path, SerializerOptions::default());
        s.serialize("value", &1.5f64);
        s.write_file().unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("inv.tmp").exists());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#"<value content="1.5"/>"#));
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.inv");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "occupied").unwrap();

        let s = Serializer::new();
        let err = s.write_to_path(&path).unwrap_err();
        assert!(matches!(err, SerializationError::AtomicWriteFailed { .. }));
        assert!(!path.with_extension("inv.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
