//! Serializer configuration.

use crate::constants::{DEFAULT_INDENT, WORKSPACE_ROOT};

/// Options controlling how a [`Serializer`](crate::Serializer) builds and writes documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Keep a node for pointer-like values and tag it with the value's type.
    ///
    /// Object identity is not tracked: two references to the same object are
    /// written, and later loaded, as independent copies.
    pub allow_reference: bool,

    /// Spaces per indentation level when writing XML (0 writes a single line).
    pub indent: usize,

    /// Name of the root element.
    pub root_name: String,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            allow_reference: false,
            indent: DEFAULT_INDENT,
            root_name: WORKSPACE_ROOT.to_string(),
        }
    }
}

impl SerializerOptions {
    #[must_use]
    pub fn with_allow_reference(mut self, enable: bool) -> Self {
        self.allow_reference = enable;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }
}
