//! Declaration parsers: variables, structs, precision statements and
//! functions.

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use nom::{
    branch::alt,
    combinator::{map, opt, peek, verify},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};

use super::{
    error::IResult,
    expr::{assignment_expression, conditional_expression},
    primitives::{assign_eq, directive, identifier, int_literal, keyword, punct, word},
    stmt::compound_statement,
};
use crate::{
    build,
    keywords::{PARAMETER_QUALIFIERS, PRECISION_QUALIFIERS, STORAGE_QUALIFIERS},
    node::NodeRef,
    tag::Tag,
};

/// Parse `layout(location = 0, ...)` into a single qualifier token
fn layout_qualifier(input: &str) -> IResult<&str, String> {
    let (input, _) = keyword("layout")(input)?;
    let (input, entries) = delimited(
        punct('('),
        separated_list1(
            punct(','),
            pair(word, opt(preceded(punct('='), int_literal))),
        ),
        punct(')'),
    )(input)?;
    let entries: Vec<String> = entries
        .into_iter()
        .map(|(name, value)| match value {
            Some(value) => format!("{}={}", name, value),
            None => name.to_string(),
        })
        .collect();
    Ok((input, format!("layout({})", entries.join(","))))
}

fn declaration_qualifier(input: &str) -> IResult<&str, String> {
    alt((
        layout_qualifier,
        map(
            verify(word, |w: &str| {
                STORAGE_QUALIFIERS.contains(&w) || PRECISION_QUALIFIERS.contains(&w)
            }),
            |w| w.to_string(),
        ),
    ))(input)
}

fn parameter_qualifier(input: &str) -> IResult<&str, String> {
    map(
        verify(word, |w: &str| {
            PARAMETER_QUALIFIERS.contains(&w) || PRECISION_QUALIFIERS.contains(&w)
        }),
        |w| w.to_string(),
    )(input)
}

fn precision_qualifier(input: &str) -> IResult<&str, String> {
    map(
        verify(word, |w: &str| PRECISION_QUALIFIERS.contains(&w)),
        |w| w.to_string(),
    )(input)
}

/// Parse a type: a struct definition or a type name
pub(crate) fn type_specifier(input: &str) -> IResult<&str, NodeRef> {
    alt((struct_specifier, map(identifier, build::type_name)))(input)
}

fn struct_specifier(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("struct")(input)?;
    let (input, name) = opt(identifier)(input)?;
    let (input, members) = delimited(punct('{'), many1(declaration), punct('}'))(input)?;
    Ok((
        input,
        build::struct_definition(name.unwrap_or_default(), members),
    ))
}

/// Parse `[size]`
fn array_size(input: &str) -> IResult<&str, NodeRef> {
    delimited(punct('['), conditional_expression, punct(']'))(input)
}

fn declarator(input: &str) -> IResult<&str, NodeRef> {
    let (input, name) = identifier(input)?;
    let (input, size) = opt(array_size)(input)?;
    let (input, initializer) = match assign_eq(input) {
        Ok((rest, _)) => {
            let (rest, value) = assignment_expression(rest)?;
            (rest, Some(value))
        }
        Err(_) => (input, None),
    };
    Ok((input, build::declarator(name, size, initializer)))
}

/// Parse a declaration without its terminating `;`.
///
/// Struct definitions may declare no variables; any other type needs at
/// least one declarator.
pub(crate) fn declaration_body(input: &str) -> IResult<&str, NodeRef> {
    let (input, qualifiers) = many0(declaration_qualifier)(input)?;
    let (input, ty) = type_specifier(input)?;
    let (input, declarators) = if ty.tag() == Tag::StructDefinition {
        separated_list0(punct(','), declarator)(input)?
    } else {
        separated_list1(punct(','), declarator)(input)?
    };
    Ok((input, build::declaration(qualifiers, ty, declarators)))
}

/// Parse a declaration statement
pub(crate) fn declaration(input: &str) -> IResult<&str, NodeRef> {
    terminated(declaration_body, punct(';'))(input)
}

/// Parse `precision mediump float;`
fn precision_statement(input: &str) -> IResult<&str, NodeRef> {
    let (input, _) = keyword("precision")(input)?;
    let (input, qualifier) = precision_qualifier(input)?;
    let (input, ty) = map(identifier, build::type_name)(input)?;
    let (input, _) = punct(';')(input)?;
    Ok((input, build::precision(qualifier, ty)))
}

fn parameter(input: &str) -> IResult<&str, NodeRef> {
    let (input, qualifiers) = many0(parameter_qualifier)(input)?;
    let (input, ty) = type_specifier(input)?;
    let (input, name) = opt(identifier)(input)?;
    let (input, size) = opt(array_size)(input)?;
    Ok((
        input,
        build::parameter(qualifiers, ty, name.unwrap_or_default(), size),
    ))
}

fn parameter_list(input: &str) -> IResult<&str, Vec<NodeRef>> {
    delimited(
        punct('('),
        alt((
            map(terminated(keyword("void"), peek(punct(')'))), |_| Vec::new()),
            separated_list0(punct(','), parameter),
        )),
        punct(')'),
    )(input)
}

/// Parse a function prototype or a function definition
fn function(input: &str) -> IResult<&str, NodeRef> {
    let (input, qualifiers) = many0(precision_qualifier)(input)?;
    let (input, return_type) = type_specifier(input)?;
    let (input, name) = identifier(input)?;
    let (input, parameters) = parameter_list(input)?;
    if let Ok((input, _)) = punct(';')(input) {
        let prototype = build::function_prototype(qualifiers, return_type, name, parameters);
        return Ok((input, prototype));
    }
    let (input, body) = compound_statement(input)?;
    Ok((
        input,
        build::function_declaration(qualifiers, return_type, name, parameters, body),
    ))
}

/// Parse one top-level declaration
pub(crate) fn external_declaration(input: &str) -> IResult<&str, NodeRef> {
    alt((
        map(directive, build::preprocessor),
        precision_statement,
        function,
        declaration,
    ))(input)
}
