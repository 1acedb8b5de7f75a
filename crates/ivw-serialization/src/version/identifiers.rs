//! Identifier renames for converters.
//!
//! Workspace objects live in typed lists: a `Processor` of some type inside a
//! `Processors` list, its `InPort`s inside `InPorts`, and so on. A
//! [`IdentifierReplacement`] walks a path of such kinds and renames the
//! `identifier` attribute of the objects it ends on.

use crate::constants::{IDENTIFIER_ATTRIBUTE, TYPE_ATTRIBUTE};
use crate::document::{Document, NodeId};

/// One step of an object path: an element `name` with a `type` attribute,
/// held inside a `list` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kind {
    pub name: String,
    pub list: String,
    pub type_id: String,
}

impl Kind {
    pub fn new(name: impl Into<String>, list: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            list: list.into(),
            type_id: type_id.into(),
        }
    }

    pub fn processor(type_id: impl Into<String>) -> Self {
        Self::new("Processor", "Processors", type_id)
    }

    pub fn inport(type_id: impl Into<String>) -> Self {
        Self::new("InPort", "InPorts", type_id)
    }

    pub fn outport(type_id: impl Into<String>) -> Self {
        Self::new("OutPort", "OutPorts", type_id)
    }

    pub fn property(type_id: impl Into<String>) -> Self {
        Self::new("Property", "Properties", type_id)
    }

    fn matches(&self, document: &Document, node: NodeId) -> bool {
        document.name(node) == self.name
            && document.attribute(node, TYPE_ATTRIBUTE) == Some(self.type_id.as_str())
            && document
                .parent(node)
                .is_some_and(|parent| document.name(parent) == self.list)
    }

    /// Matching objects below `scope`, excluding `scope` itself.
    fn find_below(&self, document: &Document, scope: NodeId) -> Vec<NodeId> {
        document
            .descendants(scope)
            .filter(|&node| node != scope && self.matches(document, node))
            .collect()
    }
}

/// Rename objects at the end of `path` from `old` to `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierReplacement {
    pub path: Vec<Kind>,
    pub old: String,
    pub new: String,
}

impl IdentifierReplacement {
    pub fn new(path: Vec<Kind>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            path,
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Apply every replacement. Returns whether any identifier was renamed.
pub fn change_identifiers(document: &mut Document, replacements: &[IdentifierReplacement]) -> bool {
    let mut changed = false;
    for replacement in replacements {
        let mut scope = vec![document.root()];
        for kind in &replacement.path {
            let doc = &*document;
            scope = scope
                .iter()
                .flat_map(|&node| kind.find_below(doc, node))
                .collect();
        }
        for node in scope {
            if document.attribute(node, IDENTIFIER_ATTRIBUTE) == Some(replacement.old.as_str()) {
                document.set_attribute(node, IDENTIFIER_ATTRIBUTE, replacement.new.as_str());
                tracing::debug!(
                    from = %replacement.old,
                    to = %replacement.new,
                    "Renamed identifier"
                );
                changed = true;
            }
        }
    }
    changed
}
