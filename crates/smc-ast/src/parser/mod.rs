//! GLSL parser.
//!
//! Hand-written `nom` grammar for the GLSL ES subset the compiler works on.
//! Every token parser consumes the whitespace and comments after it, so the
//! entry points only skip leading blanks.

mod decl;
mod error;
mod expr;
mod primitives;
mod stmt;
mod whitespace;

use alloc::vec::Vec;

use decl::external_declaration;
use error::{parse_error, syntax_error, unexpected};
pub use error::ParseError;
use whitespace::blank;

use crate::{build, node::NodeRef, tag::Tag};

/// Grammar entry point for [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    TranslationUnit,
    VertexShader,
    /// A translation unit without `attribute` declarations
    FragmentShader,
    Expression,
    Statement,
}

/// Parse `source` from the given start rule.
///
/// The whole input must be consumed; trailing input is an error.
pub fn parse(source: &str, rule: StartRule) -> Result<NodeRef, ParseError> {
    match rule {
        StartRule::TranslationUnit | StartRule::VertexShader => translation_unit(source, false),
        StartRule::FragmentShader => translation_unit(source, true),
        StartRule::Expression => complete(source, expr::expression, "an expression"),
        StartRule::Statement => complete(source, stmt::statement, "a statement"),
    }
}

fn skip_blank(input: &str) -> &str {
    match blank(input) {
        Ok((rest, ())) => rest,
        Err(_) => input,
    }
}

fn complete(
    source: &str,
    mut parser: impl FnMut(&str) -> error::IResult<&str, NodeRef>,
    expected: &str,
) -> Result<NodeRef, ParseError> {
    let input = skip_blank(source);
    match parser(input) {
        Ok(("", node)) => Ok(node),
        Ok((remaining, _)) => Err(unexpected(source, remaining, "end of input")),
        Err(error) => Err(syntax_error(source, input, error, expected)),
    }
}

fn translation_unit(source: &str, fragment: bool) -> Result<NodeRef, ParseError> {
    let mut rest = skip_blank(source);
    let mut declarations = Vec::new();
    while !rest.is_empty() {
        let (next, declaration) = external_declaration(rest)
            .map_err(|error| syntax_error(source, rest, error, "a declaration"))?;
        if fragment
            && declaration.tag() == Tag::Declaration
            && declaration.has_qualifier("attribute")
        {
            return Err(parse_error(
                source,
                rest,
                "attribute declarations are not allowed in a fragment shader",
            ));
        }
        declarations.push(declaration);
        rest = next;
    }
    Ok(build::translation_unit(declarations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translation_unit() {
        let source = "
            // lighting
            precision mediump float;
            uniform vec3 lightDir;
            float diffuse(vec3 n) { return max(dot(n, lightDir), 0.0); }
            void main() { gl_FragColor = vec4(diffuse(vec3(0.0, 1.0, 0.0))); }
        ";
        let unit = parse(source, StartRule::FragmentShader).unwrap();
        assert_eq!(unit.tag(), Tag::TranslationUnit);
        assert_eq!(unit.list(0).len(), 4);
    }

    #[test]
    fn test_empty_translation_unit() {
        let unit = parse("  /* nothing */ ", StartRule::TranslationUnit).unwrap();
        assert!(unit.list(0).is_empty());
    }

    #[test]
    fn test_fragment_rejects_attribute() {
        let source = "precision highp float;\nattribute vec3 position;\n";
        assert!(parse(source, StartRule::VertexShader).is_ok());
        let error = parse(source, StartRule::FragmentShader).unwrap_err();
        assert_eq!(error.line_col(source), (2, 1));
    }

    #[test]
    fn test_error_points_at_failing_token() {
        let source = "void main() {\n  x = ;\n}";
        let error = parse(source, StartRule::TranslationUnit).unwrap_err();
        assert_eq!(error.line_col(source), (2, 7));
        assert_eq!(error.message, "unexpected ';'");

        let source = "float a;\nvoid f() { if (a > 1.0) { return; } else { a = (1.0; } }";
        let error = parse(source, StartRule::TranslationUnit).unwrap_err();
        assert_eq!(error.line_col(source), (2, 52));
    }

    #[test]
    fn test_unknown_declaration_start() {
        let source = "float a;\n) float b;";
        let error = parse(source, StartRule::TranslationUnit).unwrap_err();
        assert_eq!(error.line_col(source), (2, 1));
        assert!(error.message.starts_with("expected a declaration"));
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(parse("a + b", StartRule::Expression).is_ok());
        let error = parse("a + b )", StartRule::Expression).unwrap_err();
        assert_eq!(error.position, 6);
        assert!(parse("x = 1; y = 2;", StartRule::Statement).is_err());
    }

    #[test]
    fn test_missing_brace() {
        assert!(parse("void main() {", StartRule::TranslationUnit).is_err());
        assert!(parse("invalid", StartRule::TranslationUnit).is_err());
    }
}
