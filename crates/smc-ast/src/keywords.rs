//! GLSL keyword tables.

/// Words that can never name a user symbol: keywords, builtin type names and
/// words reserved for future use by GLSL ES 1.00 and 3.00.
pub const RESERVED_WORDS: &[&str] = &[
    // keywords
    "attribute", "const", "uniform", "varying", "buffer", "shared", "coherent", "volatile",
    "restrict", "readonly", "writeonly", "layout", "centroid", "flat", "smooth", "noperspective",
    "patch", "sample", "break", "continue", "do", "for", "while", "switch", "case", "default",
    "if", "else", "subroutine", "in", "out", "inout", "true", "false", "invariant", "precise",
    "discard", "return", "lowp", "mediump", "highp", "precision", "struct",
    // types
    "void", "bool", "int", "uint", "float", "double", "vec2", "vec3", "vec4", "dvec2", "dvec3",
    "dvec4", "bvec2", "bvec3", "bvec4", "ivec2", "ivec3", "ivec4", "uvec2", "uvec3", "uvec4",
    "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4", "mat3x2", "mat3x3", "mat3x4",
    "mat4x2", "mat4x3", "mat4x4", "sampler2D", "sampler3D", "samplerCube", "sampler2DShadow",
    "samplerCubeShadow", "sampler2DArray", "sampler2DArrayShadow", "isampler2D", "isampler3D",
    "isamplerCube", "isampler2DArray", "usampler2D", "usampler3D", "usamplerCube",
    "usampler2DArray",
    // reserved for future use
    "asm", "class", "union", "enum", "typedef", "template", "this", "packed", "goto", "inline",
    "noinline", "public", "static", "extern", "external", "interface", "long", "short", "half",
    "fixed", "unsigned", "superp", "input", "output", "hvec2", "hvec3", "hvec4", "fvec2",
    "fvec3", "fvec4", "sampler1D", "sampler1DShadow", "sampler2DRect", "sampler2DRectShadow",
    "sampler3DRect", "sizeof", "cast", "namespace", "using", "resource", "filter", "active",
];

/// Words the parser never accepts as a type or symbol name.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "attribute", "const", "uniform", "varying", "buffer", "shared", "layout", "centroid", "flat",
    "smooth", "noperspective", "break", "continue", "do", "for", "while", "switch", "case",
    "default", "if", "else", "in", "out", "inout", "true", "false", "invariant", "precise",
    "discard", "return", "lowp", "mediump", "highp", "precision", "struct",
];

/// Storage, interpolation and invariance qualifiers accepted on declarations.
pub const STORAGE_QUALIFIERS: &[&str] = &[
    "const", "uniform", "attribute", "varying", "in", "out", "centroid", "flat", "smooth",
    "invariant",
];

/// Qualifiers accepted on function parameters.
pub const PARAMETER_QUALIFIERS: &[&str] = &["const", "in", "out", "inout"];

/// Precision qualifiers.
pub const PRECISION_QUALIFIERS: &[&str] = &["lowp", "mediump", "highp"];

/// Qualifiers that make a global visible to the host application or to the
/// other shader stage.
pub const INTERFACE_QUALIFIERS: &[&str] = &["uniform", "attribute", "varying", "in", "out"];

/// True if `word` can never be used as a generated symbol.
pub fn is_reserved_word(word: &str) -> bool {
    word.starts_with("gl_") || word.contains("__") || RESERVED_WORDS.contains(&word)
}

/// True if `word` can not appear where the grammar expects a name.
pub fn is_structural_keyword(word: &str) -> bool {
    STRUCTURAL_KEYWORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_keywords_are_reserved() {
        for word in ["do", "if", "in"] {
            assert!(is_reserved_word(word));
        }
        assert!(!is_reserved_word("a"));
        assert!(!is_reserved_word("ab"));
    }

    #[test]
    fn test_builtin_prefix_is_reserved() {
        assert!(is_reserved_word("gl_Position"));
        assert!(is_reserved_word("a__b"));
    }

    #[test]
    fn test_type_names_are_not_structural() {
        assert!(!is_structural_keyword("vec3"));
        assert!(!is_structural_keyword("float"));
        assert!(is_structural_keyword("return"));
    }
}
