//! Fixed vocabulary of element and attribute names used by the workspace format.

/// Attribute holding the textual value of a primitive node.
pub const CONTENT_ATTRIBUTE: &str = "content";

/// Attribute naming the concrete type of a polymorphic node.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Attribute marking a present optional value, holding its Rust type name.
pub const REFERENCE_ATTRIBUTE: &str = "reference";

/// Attribute holding an object's identifier.
pub const IDENTIFIER_ATTRIBUTE: &str = "identifier";

/// Attribute holding a format or module version.
pub const VERSION_ATTRIBUTE: &str = "version";

/// Attribute holding a module name inside the module version table.
pub const NAME_ATTRIBUTE: &str = "name";

pub const VECTOR_X_ATTRIBUTE: &str = "x";
pub const VECTOR_Y_ATTRIBUTE: &str = "y";
pub const VECTOR_Z_ATTRIBUTE: &str = "z";
pub const VECTOR_W_ATTRIBUTE: &str = "w";

pub const COLOR_R_ATTRIBUTE: &str = "r";
pub const COLOR_G_ATTRIBUTE: &str = "g";
pub const COLOR_B_ATTRIBUTE: &str = "b";
pub const COLOR_A_ATTRIBUTE: &str = "a";

/// Coordinate attribute names in component order.
pub const VECTOR_ATTRIBUTES: [&str; 4] = [
    VECTOR_X_ATTRIBUTE,
    VECTOR_Y_ATTRIBUTE,
    VECTOR_Z_ATTRIBUTE,
    VECTOR_W_ATTRIBUTE,
];

/// Color attribute names in component order.
pub const COLOR_ATTRIBUTES: [&str; 4] = [
    COLOR_R_ATTRIBUTE,
    COLOR_G_ATTRIBUTE,
    COLOR_B_ATTRIBUTE,
    COLOR_A_ATTRIBUTE,
];

/// Prefix of the per-column child nodes of a matrix (`col0`, `col1`, ...).
pub const MATRIX_COLUMN_PREFIX: &str = "col";

/// Root element of a workspace document.
pub const WORKSPACE_ROOT: &str = "InviwoWorkspace";

/// Current workspace format version, stored on the root element.
pub const WORKSPACE_VERSION: u32 = 2;

/// Element listing the module versions a document was written with.
pub const MODULE_VERSIONS: &str = "ModuleVersions";

/// Child element of [`MODULE_VERSIONS`].
pub const MODULE_ELEMENT: &str = "Module";

/// Default number of spaces per indentation level when writing XML.
pub const DEFAULT_INDENT: usize = 2;
