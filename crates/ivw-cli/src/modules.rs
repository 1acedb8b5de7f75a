//! Version converters shipped with the command line tool.

use ivw_serialization::{
    ConverterRegistry, Document, IdentifierReplacement, Kind, change_identifiers,
};

pub const ABUFFER_GL_MODULE: &str = "ABufferGL";

/// Current persisted version of the [`ABUFFER_GL_MODULE`] state.
pub const ABUFFER_GL_VERSION: u32 = 1;

const ABUFFER_GEOMETRY_PROCESSOR: &str = "org.inviwo.ABufferGeometryGLProcessor";

/// Port identifiers of the A-buffer geometry processor lost their type
/// suffix in version 1.
pub fn abuffer_gl_converter(document: &mut Document, from_version: u32) -> bool {
    if from_version >= 1 {
        return false;
    }
    let processor = Kind::processor(ABUFFER_GEOMETRY_PROCESSOR);
    let replacements = [
        IdentifierReplacement::new(
            vec![
                processor.clone(),
                Kind::inport("org.inviwo.MeshFlatMultiInport"),
            ],
            "geometry.inport",
            "geometry",
        ),
        IdentifierReplacement::new(
            vec![processor, Kind::outport("org.inviwo.ImageOutport")],
            "image.outport",
            "image",
        ),
    ];
    change_identifiers(document, &replacements)
}

/// Registry with every converter this tool knows.
pub fn builtin_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry.register(ABUFFER_GL_MODULE, ABUFFER_GL_VERSION, abuffer_gl_converter);
    registry
}
